//! Wind lookup with a per-run, single-flight cache.
//!
//! Providers report failures as [`WindProviderError`]; [`WindModel`] turns every failure
//! into calm wind so nothing above it ever sees a provider error.

use crate::config::OptimizerConfig;
use crate::error::WindProviderError;
use crate::models::{Point, WindVector};
use crate::spatial::signed_angle_diff;
use dashmap::DashMap;
use futures::{stream, StreamExt};
use std::collections::HashSet;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::OnceCell;

/// Signed wind component along the aircraft track in km/h.
///
/// Positive values are tailwind, negative values headwind; the magnitude never
/// exceeds the wind speed.
pub fn tailwind_component(wind: &WindVector, aircraft_bearing_deg: f64) -> f64 {
    let wind_to = (wind.direction_from_deg + 180.0).rem_euclid(360.0);
    let diff = signed_angle_diff(wind_to, aircraft_bearing_deg);
    wind.speed_kmh * diff.to_radians().cos()
}

/// Ground speed with the floor applied so headwinds never yield zero or negative speeds.
pub fn ground_speed(cruise_speed_kmh: f64, tailwind_kmh: f64, floor_kmh: f64) -> f64 {
    (cruise_speed_kmh + tailwind_kmh).max(floor_kmh)
}

/// Source of wind observations.
pub trait WindProvider {
    fn fetch(
        &self,
        point: Point,
    ) -> impl Future<Output = Result<WindVector, WindProviderError>> + Send;
}

/// Provider that always reports still air.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalmWind;

impl WindProvider for CalmWind {
    async fn fetch(&self, _point: Point) -> Result<WindVector, WindProviderError> {
        Ok(WindVector::CALM)
    }
}

/// Provider returning the same wind everywhere.
#[derive(Debug, Clone, Copy)]
pub struct UniformWind(pub WindVector);

impl WindProvider for UniformWind {
    async fn fetch(&self, _point: Point) -> Result<WindVector, WindProviderError> {
        Ok(self.0)
    }
}

/// Adapts a synchronous closure into a provider.
pub struct FnWindProvider<F>(pub F);

impl<F> WindProvider for FnWindProvider<F>
where
    F: Fn(Point) -> Result<WindVector, WindProviderError> + Sync,
{
    async fn fetch(&self, point: Point) -> Result<WindVector, WindProviderError> {
        (self.0)(point)
    }
}

/// Cache key: coordinates scaled by 10^precision and rounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WindKey {
    lat_e: i64,
    lon_e: i64,
}

impl WindKey {
    pub fn new(point: Point, precision: u32) -> Self {
        let scale = 10f64.powi(precision as i32);
        let half_turn = (180.0 * scale).round() as i64;
        let mut lon_e = (point.lon * scale).round() as i64;
        if lon_e == -half_turn {
            lon_e = half_turn;
        }
        Self {
            lat_e: (point.lat * scale).round() as i64,
            lon_e,
        }
    }
}

/// Wind field for one optimization run.
///
/// Each rounded coordinate is fetched at most once, even under concurrent lookups;
/// failures are cached as calm wind for the rest of the run.
pub struct WindModel<P> {
    provider: P,
    cache: DashMap<WindKey, Arc<OnceCell<WindVector>>>,
    precision: u32,
    concurrency: usize,
    timeout: Option<Duration>,
    provider_calls: AtomicUsize,
    fallbacks: AtomicUsize,
}

impl<P: WindProvider> WindModel<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            cache: DashMap::new(),
            precision: 4,
            concurrency: 8,
            timeout: None,
            provider_calls: AtomicUsize::new(0),
            fallbacks: AtomicUsize::new(0),
        }
    }

    pub fn from_config(provider: P, config: &OptimizerConfig) -> Self {
        let model = Self::new(provider)
            .with_precision(config.cache_precision)
            .with_concurrency(config.wind_concurrency);
        match config.wind_timeout_s {
            Some(secs) if secs.is_finite() && secs > 0.0 => {
                model.with_timeout(Duration::from_secs_f64(secs))
            }
            _ => model,
        }
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision.min(9);
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn key_for(&self, point: Point) -> WindKey {
        WindKey::new(point, self.precision)
    }

    /// Wind at `point`, fetched once per rounded key.
    pub async fn query(&self, point: Point) -> WindVector {
        let key = self.key_for(point);
        let cell = self
            .cache
            .entry(key)
            .or_insert_with(|| Arc::new(OnceCell::new()))
            .clone();
        *cell.get_or_init(|| self.fetch_or_calm(point)).await
    }

    /// Resolve every distinct key among `points`, at most `concurrency` at a time.
    ///
    /// Returns once all of them are cached.
    pub async fn prefetch<I>(&self, points: I)
    where
        I: IntoIterator<Item = Point>,
    {
        let mut seen = HashSet::new();
        let pending: Vec<Point> = points
            .into_iter()
            .filter(|point| seen.insert(self.key_for(*point)))
            .filter(|point| self.cached(*point).is_none())
            .collect();
        if pending.is_empty() {
            return;
        }

        let requested = pending.len();
        let _resolved: Vec<WindVector> = stream::iter(pending)
            .map(|point| self.query(point))
            .buffer_unordered(self.concurrency)
            .collect()
            .await;

        tracing::debug!(
            requested,
            cached = self.cache.len(),
            provider_calls = self.provider_calls(),
            fallbacks = self.fallbacks(),
            "wind prefetch complete"
        );
    }

    /// Cached wind for `point`, if its key has been resolved.
    pub fn cached(&self, point: Point) -> Option<WindVector> {
        self.cache
            .get(&self.key_for(point))
            .and_then(|cell| cell.value().get().copied())
    }

    pub fn len(&self) -> usize {
        self.cache.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Number of times the provider has actually been called.
    pub fn provider_calls(&self) -> usize {
        self.provider_calls.load(Ordering::Relaxed)
    }

    /// Number of lookups that fell back to calm wind.
    pub fn fallbacks(&self) -> usize {
        self.fallbacks.load(Ordering::Relaxed)
    }

    async fn fetch_or_calm(&self, point: Point) -> WindVector {
        self.provider_calls.fetch_add(1, Ordering::Relaxed);
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, self.provider.fetch(point))
                .await
                .unwrap_or(Err(WindProviderError::Timeout)),
            None => self.provider.fetch(point).await,
        };
        let outcome = outcome.and_then(|wind| {
            WindVector::new(wind.speed_kmh, wind.direction_from_deg).ok_or_else(|| {
                WindProviderError::Malformed(format!(
                    "wind speed {} or direction {} out of range",
                    wind.speed_kmh, wind.direction_from_deg
                ))
            })
        });
        match outcome {
            Ok(wind) => wind,
            Err(err) => {
                self.fallbacks.fetch_add(1, Ordering::Relaxed);
                tracing::warn!(
                    lat = point.lat,
                    lon = point.lon,
                    error = %err,
                    "wind lookup failed, using calm wind"
                );
                WindVector::CALM
            }
        }
    }
}
