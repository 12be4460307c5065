pub mod config;
pub mod corridor;
pub mod error;
pub mod eta;
pub mod graph;
pub mod models;
pub mod optimizer;
pub mod route_engine;
pub mod spatial;
pub mod wind;

pub use config::{symmetric_offsets, HeuristicMode, OptimizerConfig};
pub use corridor::{Corridor, CorridorNode, NodeKey};
pub use error::{Result, RouteError, WindProviderError};
pub use eta::{estimate_great_circle_eta, estimate_great_circle_eta_with, EtaConfig, EtaEstimate};
pub use graph::{edge_midpoints, leg_cost, CorridorEdge, CorridorGraph, LegCost};
pub use models::{normalize_lon, Point, WindVector};
pub use optimizer::{naive_time_hours, optimize_route, optimize_route_with, PathResult, RouteLeg};
pub use route_engine::{find_fastest_path, Heuristic, SearchOutcome};
pub use spatial::{
    bearing, destination_point, great_circle_points, haversine_distance, midpoint, GreatCircle,
    EARTH_RADIUS_KM,
};
pub use wind::{
    ground_speed, tailwind_component, CalmWind, FnWindProvider, UniformWind, WindKey, WindModel,
    WindProvider,
};
