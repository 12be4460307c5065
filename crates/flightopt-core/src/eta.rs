//! Wind-adjusted ETA along the plain great-circle track, without a corridor search.

use crate::config::validate_speed;
use crate::error::{Result, RouteError};
use crate::graph::leg_cost;
use crate::models::{Point, WindVector};
use crate::spatial::{great_circle_points, midpoint};
use crate::wind::{WindModel, WindProvider};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EtaConfig {
    /// Number of great-circle segments to walk.
    pub segments: usize,
    /// Sample wind on every n-th segment and hold it for the ones in between.
    pub sample_every: usize,
    pub cruise_speed_kmh: f64,
    pub ground_speed_floor_kmh: f64,
}

impl Default for EtaConfig {
    fn default() -> Self {
        Self {
            segments: 200,
            sample_every: 8,
            cruise_speed_kmh: 900.0,
            ground_speed_floor_kmh: 40.0,
        }
    }
}

impl EtaConfig {
    pub fn validate(&self) -> Result<()> {
        if self.segments < 1 {
            return Err(RouteError::invalid("ETA needs at least one segment"));
        }
        if self.sample_every < 1 {
            return Err(RouteError::invalid("wind sample rate must be at least 1"));
        }
        validate_speed("cruise speed", self.cruise_speed_kmh)?;
        validate_speed("ground-speed floor", self.ground_speed_floor_kmh)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EtaEstimate {
    pub distance_km: f64,
    pub naive_hours: f64,
    pub wind_hours: f64,
    pub segments: usize,
    pub wind_samples: usize,
}

impl EtaEstimate {
    /// Positive when wind shortens the flight.
    pub fn wind_effect_hours(&self) -> f64 {
        self.naive_hours - self.wind_hours
    }
}

/// Midpoints of the segments whose wind is sampled, in track order.
fn sample_points(points: &[Point], sample_every: usize) -> Vec<Point> {
    points
        .windows(2)
        .step_by(sample_every)
        .map(|pair| midpoint(pair[0], pair[1]))
        .collect()
}

pub async fn estimate_great_circle_eta<P: WindProvider>(
    origin: Point,
    destination: Point,
    config: &EtaConfig,
    wind: &WindModel<P>,
) -> Result<EtaEstimate> {
    origin.validate()?;
    destination.validate()?;
    config.validate()?;

    let track: Vec<Point> = great_circle_points(origin, destination, config.segments)?.collect();
    wind.prefetch(sample_points(&track, config.sample_every)).await;

    let estimate = estimate_great_circle_eta_with(origin, destination, config, |point| {
        wind.cached(point).unwrap_or(WindVector::CALM)
    })?;
    tracing::info!(
        distance_km = estimate.distance_km,
        naive_hours = estimate.naive_hours,
        wind_hours = estimate.wind_hours,
        wind_samples = estimate.wind_samples,
        "great-circle ETA estimated"
    );
    Ok(estimate)
}

pub fn estimate_great_circle_eta_with<F>(
    origin: Point,
    destination: Point,
    config: &EtaConfig,
    wind_at: F,
) -> Result<EtaEstimate>
where
    F: Fn(Point) -> WindVector,
{
    origin.validate()?;
    destination.validate()?;
    config.validate()?;

    let track: Vec<Point> = great_circle_points(origin, destination, config.segments)?.collect();
    let mut held = WindVector::CALM;
    let mut wind_samples = 0;
    let mut distance_km = 0.0;
    let mut wind_hours = 0.0;

    for (index, pair) in track.windows(2).enumerate() {
        if index % config.sample_every == 0 {
            held = wind_at(midpoint(pair[0], pair[1]));
            wind_samples += 1;
        }
        let cost = leg_cost(
            pair[0],
            pair[1],
            held,
            config.cruise_speed_kmh,
            config.ground_speed_floor_kmh,
        );
        distance_km += cost.distance_km;
        wind_hours += cost.travel_time_hours;
    }

    Ok(EtaEstimate {
        distance_km,
        naive_hours: distance_km / config.cruise_speed_kmh,
        wind_hours,
        segments: config.segments,
        wind_samples,
    })
}
