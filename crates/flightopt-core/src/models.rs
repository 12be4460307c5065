//! Core value types shared by geometry, wind and search.

use crate::error::{Result, RouteError};
use serde::{Deserialize, Serialize};

/// A position on the sphere in decimal degrees.
///
/// Latitude lies in [-90, 90] and longitude is kept in (-180, 180].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    /// Create a point, rejecting latitudes outside [-90, 90].
    ///
    /// Longitude is wrapped into (-180, 180]; latitude is never clamped here.
    pub fn new(lat: f64, lon: f64) -> Result<Self> {
        if !lat.is_finite() || !lon.is_finite() {
            return Err(RouteError::invalid(format!(
                "coordinates must be finite, got ({lat}, {lon})"
            )));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(RouteError::invalid(format!(
                "latitude {lat} outside [-90, 90]"
            )));
        }
        Ok(Self {
            lat,
            lon: normalize_lon(lon),
        })
    }

    /// Check a point that may have been built field-by-field or deserialized.
    pub fn validate(&self) -> Result<()> {
        Self::new(self.lat, self.lon).map(|_| ())
    }

    /// Build an output point from computed coordinates.
    pub(crate) fn clamped(lat: f64, lon: f64) -> Self {
        Self {
            lat: lat.clamp(-90.0, 90.0),
            lon: normalize_lon(lon),
        }
    }

    /// True when both coordinates agree within `tolerance_deg`, treating ±180° as equal.
    pub fn approx_eq(&self, other: &Point, tolerance_deg: f64) -> bool {
        let dlat = (self.lat - other.lat).abs();
        let dlon = (self.lon - other.lon).abs();
        let dlon = dlon.min(360.0 - dlon);
        dlat <= tolerance_deg && dlon <= tolerance_deg
    }
}

/// Wrap a longitude into (-180, 180].
pub fn normalize_lon(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped <= -180.0 {
        180.0
    } else {
        wrapped
    }
}

/// Wind observation in the meteorological convention.
///
/// `direction_from_deg` is where the wind blows FROM, clockwise from north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindVector {
    pub speed_kmh: f64,
    pub direction_from_deg: f64,
}

impl WindVector {
    pub const CALM: WindVector = WindVector {
        speed_kmh: 0.0,
        direction_from_deg: 0.0,
    };

    /// Returns `None` for negative or non-finite speeds; the direction is wrapped into [0, 360).
    pub fn new(speed_kmh: f64, direction_from_deg: f64) -> Option<Self> {
        if !speed_kmh.is_finite() || speed_kmh < 0.0 || !direction_from_deg.is_finite() {
            return None;
        }
        let mut direction = direction_from_deg.rem_euclid(360.0);
        if direction >= 360.0 {
            direction = 0.0;
        }
        Some(Self {
            speed_kmh,
            direction_from_deg: direction,
        })
    }

    pub fn is_calm(&self) -> bool {
        self.speed_kmh <= f64::EPSILON
    }
}

impl Default for WindVector {
    fn default() -> Self {
        Self::CALM
    }
}
