//! Wind-weighted layered DAG over a [`Corridor`].
//!
//! Every node in slice `i` connects to every node in slice `i + 1`. Edges live in a
//! flat vector ordered by `(slice, from lateral, to lateral)`, so a node's outgoing
//! edges are one contiguous slice and no adjacency map is needed.

use crate::config::validate_speed;
use crate::corridor::{Corridor, NodeKey};
use crate::error::Result;
use crate::models::{Point, WindVector};
use crate::spatial::{bearing, haversine_distance, midpoint};
use crate::wind::{ground_speed, tailwind_component, WindModel, WindProvider};
use serde::Serialize;

/// Wind-adjusted cost of flying straight from one point to another.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LegCost {
    pub distance_km: f64,
    pub bearing_deg: f64,
    pub wind: WindVector,
    pub tailwind_kmh: f64,
    pub ground_speed_kmh: f64,
    pub travel_time_hours: f64,
}

/// Cost a single leg with wind sampled at its midpoint.
pub fn leg_cost(
    from: Point,
    to: Point,
    wind: WindVector,
    cruise_speed_kmh: f64,
    floor_kmh: f64,
) -> LegCost {
    let distance_km = haversine_distance(from, to);
    let bearing_deg = bearing(from, to);
    let tailwind_kmh = tailwind_component(&wind, bearing_deg);
    let ground_speed_kmh = ground_speed(cruise_speed_kmh, tailwind_kmh, floor_kmh);
    LegCost {
        distance_km,
        bearing_deg,
        wind,
        tailwind_kmh,
        ground_speed_kmh,
        travel_time_hours: distance_km / ground_speed_kmh,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CorridorEdge {
    pub from: NodeKey,
    pub to: NodeKey,
    #[serde(flatten)]
    pub cost: LegCost,
}

impl CorridorEdge {
    pub fn travel_time_hours(&self) -> f64 {
        self.cost.travel_time_hours
    }

    pub fn distance_km(&self) -> f64 {
        self.cost.distance_km
    }
}

/// Midpoints of every corridor edge, in edge order. These are the wind sample points.
pub fn edge_midpoints(corridor: &Corridor) -> Vec<Point> {
    let mut points = Vec::new();
    for slice in 0..corridor.slice_count().saturating_sub(1) {
        for from in corridor.layer(slice) {
            for to in corridor.layer(slice + 1) {
                points.push(midpoint(from.point, to.point));
            }
        }
    }
    points
}

#[derive(Debug, Clone, Serialize)]
pub struct CorridorGraph {
    corridor: Corridor,
    edges: Vec<CorridorEdge>,
    cruise_speed_kmh: f64,
    ground_speed_floor_kmh: f64,
    max_wind_speed_kmh: f64,
}

impl CorridorGraph {
    /// Resolve the wind at every edge midpoint, then weight the edges.
    ///
    /// All lookups complete before any edge is built, so the graph is never
    /// observed partially weighted.
    pub async fn build<P: WindProvider>(
        corridor: Corridor,
        cruise_speed_kmh: f64,
        ground_speed_floor_kmh: f64,
        wind: &WindModel<P>,
    ) -> Result<Self> {
        validate_speed("cruise speed", cruise_speed_kmh)?;
        validate_speed("ground-speed floor", ground_speed_floor_kmh)?;
        wind.prefetch(edge_midpoints(&corridor)).await;
        Self::build_with(corridor, cruise_speed_kmh, ground_speed_floor_kmh, |point| {
            wind.cached(point).unwrap_or(WindVector::CALM)
        })
    }

    /// Weight the edges using an already-resolved wind lookup.
    pub fn build_with<F>(
        corridor: Corridor,
        cruise_speed_kmh: f64,
        ground_speed_floor_kmh: f64,
        wind_at: F,
    ) -> Result<Self>
    where
        F: Fn(Point) -> WindVector,
    {
        validate_speed("cruise speed", cruise_speed_kmh)?;
        validate_speed("ground-speed floor", ground_speed_floor_kmh)?;

        let width = corridor.lateral_count();
        let mut edges =
            Vec::with_capacity(corridor.slice_count().saturating_sub(1) * width * width);
        let mut max_wind_speed_kmh: f64 = 0.0;

        for slice in 0..corridor.slice_count().saturating_sub(1) {
            for from in corridor.layer(slice) {
                for to in corridor.layer(slice + 1) {
                    let wind = wind_at(midpoint(from.point, to.point));
                    max_wind_speed_kmh = max_wind_speed_kmh.max(wind.speed_kmh);
                    edges.push(CorridorEdge {
                        from: from.key,
                        to: to.key,
                        cost: leg_cost(
                            from.point,
                            to.point,
                            wind,
                            cruise_speed_kmh,
                            ground_speed_floor_kmh,
                        ),
                    });
                }
            }
        }

        tracing::debug!(
            slices = corridor.slice_count(),
            lanes = width,
            edges = edges.len(),
            max_wind_speed_kmh,
            "corridor graph built"
        );

        Ok(Self {
            corridor,
            edges,
            cruise_speed_kmh,
            ground_speed_floor_kmh,
            max_wind_speed_kmh,
        })
    }

    pub fn corridor(&self) -> &Corridor {
        &self.corridor
    }

    pub fn edges(&self) -> &[CorridorEdge] {
        &self.edges
    }

    /// Edges leaving `from`, ordered by destination lane. Empty for the last slice.
    pub fn outgoing(&self, from: NodeKey) -> &[CorridorEdge] {
        let width = self.corridor.lateral_count();
        if from.slice + 1 >= self.corridor.slice_count() || from.lateral >= width {
            return &[];
        }
        let start = (from.slice * width + from.lateral) * width;
        &self.edges[start..start + width]
    }

    pub fn edge(&self, from: NodeKey, to: NodeKey) -> Option<&CorridorEdge> {
        if to.slice != from.slice + 1 {
            return None;
        }
        self.outgoing(from).get(to.lateral)
    }

    pub fn cruise_speed_kmh(&self) -> f64 {
        self.cruise_speed_kmh
    }

    pub fn ground_speed_floor_kmh(&self) -> f64 {
        self.ground_speed_floor_kmh
    }

    /// Strongest wind sampled on any edge.
    pub fn max_wind_speed_kmh(&self) -> f64 {
        self.max_wind_speed_kmh
    }

    /// Upper bound on the ground speed of any edge in this graph.
    pub fn max_ground_speed_kmh(&self) -> f64 {
        ground_speed(
            self.cruise_speed_kmh,
            self.max_wind_speed_kmh,
            self.ground_speed_floor_kmh,
        )
    }
}
