//! A* search for the fastest path through a [`CorridorGraph`].

use crate::config::HeuristicMode;
use crate::corridor::NodeKey;
use crate::error::{Result, RouteError};
use crate::graph::CorridorGraph;
use crate::models::Point;
use crate::spatial::haversine_distance;
use serde::Serialize;
use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    /// Node keys from start to goal, one per slice.
    pub path: Vec<NodeKey>,
    pub total_hours: f64,
    pub nodes_visited: usize,
}

/// Lower bound on remaining travel time to the goal.
#[derive(Debug, Clone, Copy)]
pub struct Heuristic {
    goal: Point,
    speed_kmh: f64,
}

impl Heuristic {
    pub fn new(graph: &CorridorGraph, mode: HeuristicMode) -> Self {
        let corridor = graph.corridor();
        let goal = corridor
            .node(corridor.goal_key())
            .map(|node| node.point)
            .unwrap_or_else(|| corridor.destination());
        let speed_kmh = match mode {
            HeuristicMode::WindBounded => graph.max_ground_speed_kmh(),
            HeuristicMode::CruiseSpeed => graph.cruise_speed_kmh(),
        };
        Self { goal, speed_kmh }
    }

    /// Speed the estimate assumes for the remaining distance.
    pub fn speed_kmh(&self) -> f64 {
        self.speed_kmh
    }

    pub fn estimate_hours(&self, from: Point) -> f64 {
        haversine_distance(from, self.goal) / self.speed_kmh
    }
}

#[derive(Debug, Clone, Copy)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct OpenNode {
    key: NodeKey,
    g_score: FloatOrd,
    f_score: FloatOrd,
    /// Insertion counter; equal f-scores pop in the order they were pushed.
    seq: u64,
}

impl PartialOrd for OpenNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for OpenNode {
    fn cmp(&self, other: &Self) -> Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then_with(|| self.seq.cmp(&other.seq))
    }
}

/// Fastest path from the corridor's start node to its goal node.
pub fn find_fastest_path(graph: &CorridorGraph, mode: HeuristicMode) -> Result<SearchOutcome> {
    let corridor = graph.corridor();
    if corridor.slice_count() == 0 || corridor.lateral_count() == 0 {
        return Err(RouteError::invalid("corridor has no nodes to search"));
    }

    let heuristic = Heuristic::new(graph, mode);
    let start = corridor.start_key();
    let goal = corridor.goal_key();
    let node_count = corridor.nodes().len();

    let mut g_score = vec![f64::INFINITY; node_count];
    let mut came_from: Vec<Option<NodeKey>> = vec![None; node_count];
    let mut closed = vec![false; node_count];
    let mut open_set: BinaryHeap<Reverse<OpenNode>> = BinaryHeap::new();
    let mut seq = 0u64;

    let start_point = corridor
        .node(start)
        .map(|node| node.point)
        .ok_or_else(|| RouteError::GraphInvariantViolated("start node missing".to_string()))?;
    g_score[corridor.index_of(start)] = 0.0;
    open_set.push(Reverse(OpenNode {
        key: start,
        g_score: FloatOrd(0.0),
        f_score: FloatOrd(heuristic.estimate_hours(start_point)),
        seq,
    }));

    let mut nodes_visited = 0usize;
    let mut reached = None;

    while let Some(Reverse(current)) = open_set.pop() {
        let current_idx = corridor.index_of(current.key);
        if closed[current_idx] {
            continue;
        }
        let best_g = g_score[current_idx];
        if current.g_score.0 > best_g + 1e-12 {
            continue;
        }

        nodes_visited += 1;

        if current.key == goal {
            reached = Some(best_g);
            break;
        }

        closed[current_idx] = true;

        for edge in graph.outgoing(current.key) {
            let next_idx = corridor.index_of(edge.to);
            if closed[next_idx] {
                continue;
            }
            let tentative_g = best_g + edge.travel_time_hours();
            if tentative_g < g_score[next_idx] {
                g_score[next_idx] = tentative_g;
                came_from[next_idx] = Some(current.key);
                let next_point = corridor.nodes()[next_idx].point;
                seq += 1;
                open_set.push(Reverse(OpenNode {
                    key: edge.to,
                    g_score: FloatOrd(tentative_g),
                    f_score: FloatOrd(tentative_g + heuristic.estimate_hours(next_point)),
                    seq,
                }));
            }
        }
    }

    let Some(total_hours) = reached else {
        return Err(RouteError::GraphInvariantViolated(format!(
            "A* exhausted {nodes_visited} nodes without reaching slice {} lane {}",
            goal.slice, goal.lateral
        )));
    };

    let mut path = vec![goal];
    let mut cursor = goal;
    while let Some(previous) = came_from[corridor.index_of(cursor)] {
        path.push(previous);
        cursor = previous;
    }
    path.reverse();

    if path.first() != Some(&start) || path.len() != corridor.slice_count() {
        return Err(RouteError::GraphInvariantViolated(format!(
            "reconstructed path has {} nodes for {} slices",
            path.len(),
            corridor.slice_count()
        )));
    }

    tracing::debug!(nodes_visited, total_hours, "A* search finished");

    Ok(SearchOutcome {
        path,
        total_hours,
        nodes_visited,
    })
}
