//! Human-readable summaries for the binaries.

use flightopt_core::{EtaEstimate, PathResult};
use std::fmt::Write as _;

fn minutes(hours: f64) -> f64 {
    hours * 60.0
}

pub fn route_report(result: &PathResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Great-circle distance: {:.1} km", result.great_circle_km);
    let _ = writeln!(out, "Optimized distance: {:.1} km", result.optimized_km);
    let _ = writeln!(out, "Naive ETA: {:.0} min", minutes(result.naive_hours));
    let _ = writeln!(
        out,
        "Straight-corridor ETA: {:.0} min",
        minutes(result.straight_hours)
    );
    let _ = writeln!(
        out,
        "Optimized ETA: {:.0} min ({:.2} h)",
        minutes(result.optimized_hours),
        result.optimized_hours
    );
    let _ = writeln!(
        out,
        "Delta vs naive: {:+.0} min",
        minutes(result.optimized_hours - result.naive_hours)
    );
    let _ = write!(
        out,
        "Search: {} nodes visited, strongest wind {:.0} km/h",
        result.nodes_visited, result.max_wind_speed_kmh
    );
    out
}

/// ETA summary; the wind line is only printed when wind was actually fetched.
pub fn eta_report(estimate: &EtaEstimate, cruise_speed_kmh: f64, with_wind: bool) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Distance: {:.1} km", estimate.distance_km);
    let _ = write!(
        out,
        "Naive ETA (@{:.0} km/h): {:.0} min ({:.2} h)",
        cruise_speed_kmh,
        minutes(estimate.naive_hours),
        estimate.naive_hours
    );
    if with_wind {
        let _ = write!(
            out,
            "\nWind-adjusted ETA: {:.0} min ({:.2} h)  (difference {:.0} min, {} wind samples)",
            minutes(estimate.wind_hours),
            estimate.wind_hours,
            minutes(estimate.wind_hours - estimate.naive_hours),
            estimate.wind_samples
        );
    }
    out
}
