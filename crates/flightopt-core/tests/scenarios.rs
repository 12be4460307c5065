//! End-to-end optimizer runs over the equatorial reference route.
//!
//! Run with: cargo test -p flightopt-core --test scenarios

use flightopt_core::{
    haversine_distance, optimize_route, optimize_route_with, CalmWind, FnWindProvider,
    OptimizerConfig, Point, UniformWind, WindModel, WindProvider, WindProviderError, WindVector,
};
use std::time::Duration;

fn origin() -> Point {
    Point::new(0.0, 0.0).unwrap()
}

fn destination() -> Point {
    Point::new(0.0, 10.0).unwrap()
}

fn route_km() -> f64 {
    haversine_distance(origin(), destination())
}

/// Calm air: the corridor cannot beat the great circle and follows it exactly.
#[tokio::test]
async fn test_calm_air_matches_naive_time() {
    let config = OptimizerConfig::default();
    let wind = WindModel::from_config(CalmWind, &config);

    let result = optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();

    assert!((result.naive_hours - 1.237).abs() < 0.002, "{}", result.naive_hours);
    assert!((result.optimized_hours - result.naive_hours).abs() < 1e-9);
    assert!((result.straight_hours - result.naive_hours).abs() < 1e-9);
    assert!(result.nodes.iter().all(|key| key.lateral == 1));
    assert_eq!(result.nodes.len(), config.slice_count);
    assert!((result.optimized_km - route_km()).abs() < 1e-6);
    assert_eq!(result.max_wind_speed_kmh, 0.0);
}

/// Uniform westerly: every leg gains the full 100 km/h.
#[tokio::test]
async fn test_uniform_tailwind_speeds_up_route() {
    let config = OptimizerConfig::default();
    let westerly = WindVector::new(100.0, 270.0).unwrap();
    let wind = WindModel::from_config(UniformWind(westerly), &config);

    let result = optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();

    assert!(result.optimized_hours < result.naive_hours);
    assert!((result.optimized_hours - route_km() / 1000.0).abs() < 1e-6);
    assert!(result.time_saved_hours() > 0.1);
    assert!(result.nodes.iter().all(|key| key.lateral == 1));
}

/// Slow aircraft into a strong headwind: ground speed sits on the floor everywhere.
#[test]
fn test_direct_headwind_clamps_to_floor() {
    let config = OptimizerConfig {
        cruise_speed_kmh: 50.0,
        ground_speed_floor_kmh: 40.0,
        ..OptimizerConfig::default()
    };
    let easterly = WindVector::new(200.0, 90.0).unwrap();

    let result = optimize_route_with(origin(), destination(), &config, |_| easterly).unwrap();

    assert!(result
        .legs
        .iter()
        .all(|leg| leg.cost.ground_speed_kmh == 40.0));
    assert!((result.optimized_hours - route_km() / 40.0).abs() < 1e-6);
    assert!(result.optimized_hours.is_finite());
}

/// A constant wind from any direction never makes the corridor worse than flying straight.
#[test]
fn test_constant_wind_never_worse_than_straight() {
    let config = OptimizerConfig {
        slice_count: 20,
        lateral_offsets_km: vec![-150.0, -75.0, 0.0, 75.0, 150.0],
        ..OptimizerConfig::default()
    };
    for step in 0..12 {
        let wind = WindVector::new(120.0, step as f64 * 30.0).unwrap();
        let result = optimize_route_with(
            Point::new(35.0, -40.0).unwrap(),
            Point::new(48.0, 5.0).unwrap(),
            &config,
            |_| wind,
        )
        .unwrap();
        assert!(
            result.optimized_hours <= result.straight_hours + 1e-9,
            "wind from {}: {} > {}",
            wind.direction_from_deg,
            result.optimized_hours,
            result.straight_hours
        );
    }
}

/// A jet stream north of the track pulls the route into the northern lanes.
#[test]
fn test_detours_into_jet_stream() {
    let config = OptimizerConfig {
        slice_count: 20,
        lateral_offsets_km: vec![-100.0, -50.0, 0.0, 50.0, 100.0],
        ..OptimizerConfig::default()
    };
    let jet = WindVector::new(400.0, 270.0).unwrap();

    let result = optimize_route_with(origin(), destination(), &config, |point| {
        if point.lat > 0.6 {
            jet
        } else {
            WindVector::CALM
        }
    })
    .unwrap();

    assert!(result.nodes.iter().any(|key| key.lateral < 2));
    assert!(result.optimized_hours < result.straight_hours);
    assert!(result.optimized_hours < result.naive_hours);
    assert!(result.optimized_km > route_km());
}

/// Every wind lookup fails; the run still completes in calm air.
#[tokio::test]
async fn test_failing_provider_falls_back_to_calm() {
    let config = OptimizerConfig {
        slice_count: 10,
        ..OptimizerConfig::default()
    };
    let wind = WindModel::from_config(
        FnWindProvider(|_: Point| -> Result<WindVector, WindProviderError> {
            Err(WindProviderError::Transport("connection refused".into()))
        }),
        &config,
    );

    let result = optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();

    assert!((result.optimized_hours - result.naive_hours).abs() < 1e-9);
    assert_eq!(wind.fallbacks(), wind.provider_calls());
    assert!(wind.provider_calls() > 0);
}

/// A provider that answers with a NaN speed is treated like a failed lookup.
#[tokio::test]
async fn test_nan_wind_speed_falls_back_to_calm() {
    let config = OptimizerConfig {
        slice_count: 10,
        ..OptimizerConfig::default()
    };
    let wind = WindModel::from_config(
        FnWindProvider(|_: Point| -> Result<WindVector, WindProviderError> {
            Ok(WindVector {
                speed_kmh: f64::NAN,
                direction_from_deg: 270.0,
            })
        }),
        &config,
    );

    let result = optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();

    assert!((result.optimized_hours - result.naive_hours).abs() < 1e-9);
    assert!(result.optimized_hours.is_finite());
    assert_eq!(wind.fallbacks(), wind.provider_calls());
    assert!(wind.fallbacks() > 0);
}

struct StalledProvider;

impl WindProvider for StalledProvider {
    async fn fetch(&self, _point: Point) -> Result<WindVector, WindProviderError> {
        tokio::time::sleep(Duration::from_secs(60)).await;
        Ok(WindVector::new(300.0, 270.0).unwrap())
    }
}

#[tokio::test]
async fn test_stalled_provider_times_out() {
    let config = OptimizerConfig {
        slice_count: 4,
        wind_timeout_s: Some(0.05),
        ..OptimizerConfig::default()
    };
    let wind = WindModel::from_config(StalledProvider, &config);

    let result = optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();

    assert!((result.optimized_hours - result.naive_hours).abs() < 1e-9);
    assert_eq!(wind.fallbacks(), wind.provider_calls());
}

/// Each distinct rounded sample point reaches the provider once.
#[tokio::test]
async fn test_one_provider_call_per_sample_point() {
    let config = OptimizerConfig {
        slice_count: 6,
        ..OptimizerConfig::default()
    };
    let wind = WindModel::from_config(CalmWind, &config);

    optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();
    let first_run_calls = wind.provider_calls();

    // At most 5 inter-layer gaps of 3x3 edges plus the two end legs; crossing
    // diagonals share their midpoint with the straight edge between them.
    assert!(first_run_calls <= 5 * 9 + 2);
    assert_eq!(wind.len(), first_run_calls);

    optimize_route(origin(), destination(), &config, &wind)
        .await
        .unwrap();
    assert_eq!(wind.provider_calls(), first_run_calls);
}
