//! End-to-end corridor optimization: corridor, wind, graph, search, end legs.

use crate::config::{validate_speed, OptimizerConfig};
use crate::corridor::{Corridor, NodeKey};
use crate::error::{Result, RouteError};
use crate::graph::{edge_midpoints, leg_cost, CorridorGraph, LegCost};
use crate::models::{Point, WindVector};
use crate::route_engine::find_fastest_path;
use crate::spatial::{haversine_distance, midpoint};
use crate::wind::{WindModel, WindProvider};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RouteLeg {
    pub from: Point,
    pub to: Point,
    #[serde(flatten)]
    pub cost: LegCost,
}

/// Outcome of one optimization run.
///
/// Every time is in hours. `optimized_hours` includes the approach leg from the origin
/// to the first corridor node and the departure leg from the last node to the
/// destination, so it is directly comparable to `naive_hours`.
#[derive(Debug, Clone, Serialize)]
pub struct PathResult {
    pub nodes: Vec<NodeKey>,
    /// Origin, every corridor node on the path, destination.
    pub points: Vec<Point>,
    pub legs: Vec<RouteLeg>,
    /// Search cost between the first and last corridor node.
    pub corridor_hours: f64,
    pub optimized_hours: f64,
    /// Same wind, but flying the zero-offset lane the whole way.
    pub straight_hours: f64,
    /// Great-circle distance over cruise speed, no wind.
    pub naive_hours: f64,
    pub great_circle_km: f64,
    pub optimized_km: f64,
    pub nodes_visited: usize,
    pub max_wind_speed_kmh: f64,
}

impl PathResult {
    /// Positive when the optimized route beats the no-wind great-circle estimate.
    pub fn time_saved_hours(&self) -> f64 {
        self.naive_hours - self.optimized_hours
    }
}

pub fn naive_time_hours(origin: Point, destination: Point, cruise_speed_kmh: f64) -> Result<f64> {
    validate_speed("cruise speed", cruise_speed_kmh)?;
    Ok(haversine_distance(origin, destination) / cruise_speed_kmh)
}

/// Optimize a route, fetching wind through `wind`.
///
/// Every wind sample the run needs is resolved before the graph is weighted.
pub async fn optimize_route<P: WindProvider>(
    origin: Point,
    destination: Point,
    config: &OptimizerConfig,
    wind: &WindModel<P>,
) -> Result<PathResult> {
    validate_inputs(origin, destination, config)?;
    let corridor = Corridor::build(
        origin,
        destination,
        config.slice_count,
        &config.lateral_offsets_km,
    )?;

    let mut samples = edge_midpoints(&corridor);
    samples.extend(end_leg_midpoints(&corridor)?);
    wind.prefetch(samples).await;

    let result = route_over(corridor, config, |point| {
        wind.cached(point).unwrap_or(WindVector::CALM)
    })?;

    tracing::info!(
        slices = config.slice_count,
        lanes = config.lateral_offsets_km.len(),
        wind_samples = wind.len(),
        provider_calls = wind.provider_calls(),
        fallbacks = wind.fallbacks(),
        optimized_hours = result.optimized_hours,
        naive_hours = result.naive_hours,
        "route optimized"
    );
    Ok(result)
}

/// Optimize a route against a synchronous wind lookup.
pub fn optimize_route_with<F>(
    origin: Point,
    destination: Point,
    config: &OptimizerConfig,
    wind_at: F,
) -> Result<PathResult>
where
    F: Fn(Point) -> WindVector,
{
    validate_inputs(origin, destination, config)?;
    let corridor = Corridor::build(
        origin,
        destination,
        config.slice_count,
        &config.lateral_offsets_km,
    )?;
    route_over(corridor, config, wind_at)
}

fn validate_inputs(origin: Point, destination: Point, config: &OptimizerConfig) -> Result<()> {
    origin.validate()?;
    destination.validate()?;
    config.validate()
}

fn end_leg_midpoints(corridor: &Corridor) -> Result<[Point; 2]> {
    let (first, last) = end_nodes(corridor)?;
    Ok([
        midpoint(corridor.origin(), first),
        midpoint(last, corridor.destination()),
    ])
}

fn end_nodes(corridor: &Corridor) -> Result<(Point, Point)> {
    let first = corridor
        .node(corridor.start_key())
        .ok_or_else(|| RouteError::GraphInvariantViolated("start node missing".to_string()))?;
    let last = corridor
        .node(corridor.goal_key())
        .ok_or_else(|| RouteError::GraphInvariantViolated("goal node missing".to_string()))?;
    Ok((first.point, last.point))
}

fn route_over<F>(corridor: Corridor, config: &OptimizerConfig, wind_at: F) -> Result<PathResult>
where
    F: Fn(Point) -> WindVector,
{
    let cruise = config.cruise_speed_kmh;
    let floor = config.ground_speed_floor_kmh;
    let origin = corridor.origin();
    let destination = corridor.destination();
    let (first, last) = end_nodes(&corridor)?;

    let approach = leg_cost(origin, first, wind_at(midpoint(origin, first)), cruise, floor);
    let departure = leg_cost(
        last,
        destination,
        wind_at(midpoint(last, destination)),
        cruise,
        floor,
    );

    let graph = CorridorGraph::build_with(corridor, cruise, floor, &wind_at)?;
    let outcome = find_fastest_path(&graph, config.heuristic)?;
    let corridor = graph.corridor();

    let mut points = Vec::with_capacity(outcome.path.len() + 2);
    let mut legs = Vec::with_capacity(outcome.path.len() + 1);
    points.push(origin);
    points.push(first);
    legs.push(RouteLeg {
        from: origin,
        to: first,
        cost: approach,
    });
    for pair in outcome.path.windows(2) {
        let edge = graph.edge(pair[0], pair[1]).ok_or_else(|| {
            RouteError::GraphInvariantViolated(format!(
                "path step {:?} -> {:?} is not a graph edge",
                pair[0], pair[1]
            ))
        })?;
        let from = corridor.nodes()[corridor.index_of(pair[0])].point;
        let to = corridor.nodes()[corridor.index_of(pair[1])].point;
        legs.push(RouteLeg {
            from,
            to,
            cost: edge.cost,
        });
        points.push(to);
    }
    points.push(destination);
    legs.push(RouteLeg {
        from: last,
        to: destination,
        cost: departure,
    });

    let end_legs_hours = approach.travel_time_hours + departure.travel_time_hours;
    let straight_hours = end_legs_hours + straight_lane_hours(&graph)?;
    let optimized_hours = end_legs_hours + outcome.total_hours;
    let great_circle_km = haversine_distance(origin, destination);

    tracing::debug!(
        nodes_visited = outcome.nodes_visited,
        corridor_hours = outcome.total_hours,
        straight_hours,
        "corridor search complete"
    );

    Ok(PathResult {
        nodes: outcome.path,
        optimized_km: legs.iter().map(|leg| leg.cost.distance_km).sum(),
        points,
        legs,
        corridor_hours: outcome.total_hours,
        optimized_hours,
        straight_hours,
        naive_hours: great_circle_km / cruise,
        great_circle_km,
        nodes_visited: outcome.nodes_visited,
        max_wind_speed_kmh: graph.max_wind_speed_kmh(),
    })
}

/// Cost of staying in the start lane from the first slice to the last.
fn straight_lane_hours(graph: &CorridorGraph) -> Result<f64> {
    let corridor = graph.corridor();
    let lateral = corridor.center_lateral();
    let mut total = 0.0;
    for slice in 0..corridor.slice_count().saturating_sub(1) {
        let edge = graph
            .edge(
                NodeKey { slice, lateral },
                NodeKey {
                    slice: slice + 1,
                    lateral,
                },
            )
            .ok_or_else(|| {
                RouteError::GraphInvariantViolated(format!("missing lane edge at slice {slice}"))
            })?;
        total += edge.travel_time_hours();
    }
    Ok(total)
}
