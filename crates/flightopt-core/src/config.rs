//! Tunables for one optimization run.

use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};

/// Which lower bound A* uses for the remaining travel time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeuristicMode {
    /// Remaining distance over the fastest ground speed any edge can reach
    /// (`max(floor, cruise + strongest sampled wind)`). Never overestimates.
    #[default]
    WindBounded,
    /// Remaining distance over plain cruise speed. Overestimates when tailwinds
    /// push ground speed above cruise, so optimality is not guaranteed.
    CruiseSpeed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizerConfig {
    pub cruise_speed_kmh: f64,
    /// Number of corridor layers between origin and destination.
    pub slice_count: usize,
    /// Lateral node offsets in km, negative = left of track. Should contain 0.
    pub lateral_offsets_km: Vec<f64>,
    pub ground_speed_floor_kmh: f64,
    /// Decimal places kept in wind cache keys.
    pub cache_precision: u32,
    /// Maximum wind lookups in flight at once.
    pub wind_concurrency: usize,
    /// Upper bound for a single wind lookup; `None` waits for the provider.
    pub wind_timeout_s: Option<f64>,
    pub heuristic: HeuristicMode,
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self {
            cruise_speed_kmh: 900.0,
            slice_count: 40,
            lateral_offsets_km: vec![-100.0, 0.0, 100.0],
            ground_speed_floor_kmh: 40.0,
            cache_precision: 4,
            wind_concurrency: 8,
            wind_timeout_s: Some(10.0),
            heuristic: HeuristicMode::WindBounded,
        }
    }
}

impl OptimizerConfig {
    /// Replace the lateral offsets with a symmetric set built by [`symmetric_offsets`].
    pub fn with_symmetric_offsets(mut self, radius_km: f64, spacing_km: f64) -> Self {
        self.lateral_offsets_km = symmetric_offsets(radius_km, spacing_km);
        self
    }

    pub fn validate(&self) -> Result<()> {
        validate_speed("cruise speed", self.cruise_speed_kmh)?;
        validate_speed("ground-speed floor", self.ground_speed_floor_kmh)?;
        if self.slice_count < 1 {
            return Err(RouteError::invalid("slice count must be at least 1"));
        }
        validate_offsets(&self.lateral_offsets_km)?;
        if self.cache_precision > 9 {
            return Err(RouteError::invalid(format!(
                "cache precision {} exceeds 9 decimal places",
                self.cache_precision
            )));
        }
        if self.wind_concurrency == 0 {
            return Err(RouteError::invalid("wind concurrency must be at least 1"));
        }
        if let Some(timeout) = self.wind_timeout_s {
            if !timeout.is_finite() || timeout <= 0.0 {
                return Err(RouteError::invalid(format!(
                    "wind timeout must be positive, got {timeout}"
                )));
            }
        }
        Ok(())
    }
}

pub(crate) fn validate_speed(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(RouteError::invalid(format!(
            "{name} must be a positive number of km/h, got {value}"
        )));
    }
    Ok(())
}

pub(crate) fn validate_offsets(offsets_km: &[f64]) -> Result<()> {
    if offsets_km.is_empty() {
        return Err(RouteError::invalid("lateral offsets must not be empty"));
    }
    if let Some(bad) = offsets_km.iter().find(|value| !value.is_finite()) {
        return Err(RouteError::invalid(format!(
            "lateral offset {bad} is not finite"
        )));
    }
    Ok(())
}

/// Evenly spaced offsets from `-radius_km` to `radius_km`, sorted, always including 0.
pub fn symmetric_offsets(radius_km: f64, spacing_km: f64) -> Vec<f64> {
    let spacing = spacing_km.max(1.0);
    let steps = (radius_km.max(0.0) / spacing).floor() as i32;
    let mut offsets = Vec::new();
    for i in -steps..=steps {
        offsets.push(i as f64 * spacing);
    }
    if !offsets.iter().any(|value| value.abs() < f64::EPSILON) {
        offsets.push(0.0);
    }
    offsets.sort_by(|a, b| a.total_cmp(b));
    offsets
}
