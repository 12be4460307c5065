//! Spherical geometry on a mean-radius Earth.
//!
//! All functions take and return degrees; trigonometry runs in radians.
//! Outputs are clamped/normalized, inputs are not.

use crate::error::{Result, RouteError};
use crate::models::Point;
use std::f64::consts::PI;

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Angular separation below which two points are treated as identical (radians).
const DEGENERATE_ARC_RAD: f64 = 1e-12;

/// Calculate great-circle distance between two points in kilometers using the haversine formula.
pub fn haversine_distance(a: Point, b: Point) -> f64 {
    EARTH_RADIUS_KM * central_angle(a, b)
}

fn central_angle(a: Point, b: Point) -> f64 {
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let dphi = (b.lat - a.lat).to_radians();
    let dlambda = (b.lon - a.lon).to_radians();
    let h = (dphi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (dlambda / 2.0).sin().powi(2);
    let h = h.clamp(0.0, 1.0);
    2.0 * h.sqrt().atan2((1.0 - h).sqrt())
}

/// Initial bearing from `a` to `b` in degrees, 0 = north, clockwise, in [0, 360).
///
/// Coincident points have no defined bearing; 0 is returned.
pub fn bearing(a: Point, b: Point) -> f64 {
    if central_angle(a, b) <= DEGENERATE_ARC_RAD {
        return 0.0;
    }
    let phi1 = a.lat.to_radians();
    let phi2 = b.lat.to_radians();
    let delta_lambda = (b.lon - a.lon).to_radians();

    let y = delta_lambda.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * delta_lambda.cos();

    normalize_bearing(y.atan2(x).to_degrees())
}

/// Wrap any angle in degrees into [0, 360).
pub fn normalize_bearing(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Signed difference `to - from` in degrees, normalized into [-180, 180).
pub fn signed_angle_diff(to_deg: f64, from_deg: f64) -> f64 {
    (to_deg - from_deg + 180.0).rem_euclid(360.0) - 180.0
}

/// Project a point forward along a great circle.
///
/// # Arguments
/// * `origin` - Starting position
/// * `bearing_deg` - Initial bearing in degrees (0 = north, 90 = east)
/// * `distance_km` - Distance along the great circle in kilometers
pub fn destination_point(origin: Point, bearing_deg: f64, distance_km: f64) -> Point {
    if distance_km.abs() <= f64::EPSILON {
        return origin;
    }

    let lat1 = origin.lat.to_radians();
    let lon1 = origin.lon.to_radians();
    let theta = bearing_deg.to_radians();
    let angular_distance = distance_km / EARTH_RADIUS_KM;

    let sin_lat1 = lat1.sin();
    let cos_lat1 = lat1.cos();
    let sin_ad = angular_distance.sin();
    let cos_ad = angular_distance.cos();

    let sin_lat2 = sin_lat1 * cos_ad + cos_lat1 * sin_ad * theta.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let y = theta.sin() * sin_ad * cos_lat1;
    let x = cos_ad - sin_lat1 * sin_lat2;
    let lon2 = lon1 + y.atan2(x);

    Point::clamped(lat2.to_degrees(), lon2.to_degrees())
}

/// Great-circle midpoint of `a` and `b`.
pub fn midpoint(a: Point, b: Point) -> Point {
    GreatCircle::between(a, b, 2).point_at(1)
}

/// `n + 1` evenly spaced points from `a` to `b` along the great circle.
///
/// The returned iterator is lazy and `Clone`, so it can be restarted by cloning it
/// before consumption.
pub fn great_circle_points(a: Point, b: Point, n: usize) -> Result<GreatCircle> {
    if n == 0 {
        return Err(RouteError::invalid(
            "great-circle interpolation needs at least one segment",
        ));
    }
    Ok(GreatCircle::between(a, b, n))
}

#[derive(Debug, Clone, Copy)]
enum Interpolation {
    /// Endpoints coincide: every point is the start.
    Degenerate,
    Slerp {
        delta: f64,
        sin_delta: f64,
        from: [f64; 3],
        to: [f64; 3],
    },
    /// Antipodal endpoints: the great circle is not unique, follow the meridian through the start.
    Meridian { arc_km: f64 },
}

/// Lazy sequence of interpolated great-circle points.
#[derive(Debug, Clone)]
pub struct GreatCircle {
    start: Point,
    end: Point,
    segments: usize,
    next: usize,
    interpolation: Interpolation,
}

impl GreatCircle {
    fn between(start: Point, end: Point, segments: usize) -> Self {
        let delta = central_angle(start, end);
        let interpolation = if delta <= DEGENERATE_ARC_RAD {
            Interpolation::Degenerate
        } else if PI - delta <= 1e-9 {
            Interpolation::Meridian {
                arc_km: delta * EARTH_RADIUS_KM,
            }
        } else {
            Interpolation::Slerp {
                delta,
                sin_delta: delta.sin(),
                from: to_unit_vector(start),
                to: to_unit_vector(end),
            }
        };
        Self {
            start,
            end,
            segments: segments.max(1),
            next: 0,
            interpolation,
        }
    }

    /// Number of segments; the sequence has one more point than this.
    pub fn segments(&self) -> usize {
        self.segments
    }

    /// Point `index` of the sequence (0 = start, `segments` = end).
    pub fn point_at(&self, index: usize) -> Point {
        if index == 0 {
            return self.start;
        }
        if index >= self.segments {
            return match self.interpolation {
                Interpolation::Degenerate => self.start,
                _ => self.end,
            };
        }
        let fraction = index as f64 / self.segments as f64;
        match self.interpolation {
            Interpolation::Degenerate => self.start,
            Interpolation::Meridian { arc_km } => {
                destination_point(self.start, 0.0, arc_km * fraction)
            }
            Interpolation::Slerp {
                delta,
                sin_delta,
                from,
                to,
            } => {
                let weight_from = ((1.0 - fraction) * delta).sin() / sin_delta;
                let weight_to = (fraction * delta).sin() / sin_delta;
                let x = weight_from * from[0] + weight_to * to[0];
                let y = weight_from * from[1] + weight_to * to[1];
                let z = weight_from * from[2] + weight_to * to[2];
                let lat = z.atan2((x * x + y * y).sqrt());
                let lon = y.atan2(x);
                Point::clamped(lat.to_degrees(), lon.to_degrees())
            }
        }
    }
}

impl Iterator for GreatCircle {
    type Item = Point;

    fn next(&mut self) -> Option<Point> {
        if self.next > self.segments {
            return None;
        }
        let point = self.point_at(self.next);
        self.next += 1;
        Some(point)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.segments + 1).saturating_sub(self.next);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GreatCircle {}

fn to_unit_vector(point: Point) -> [f64; 3] {
    let phi = point.lat.to_radians();
    let lambda = point.lon.to_radians();
    [phi.cos() * lambda.cos(), phi.cos() * lambda.sin(), phi.sin()]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pt(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).unwrap()
    }

    #[test]
    fn test_haversine_known_distance() {
        // 10 degrees along the equator
        let dist = haversine_distance(pt(0.0, 0.0), pt(0.0, 10.0));
        assert!((dist - 1111.95).abs() < 0.1, "got {dist}");
    }

    #[test]
    fn test_haversine_same_point() {
        let p = pt(33.6846, -117.8265);
        assert_eq!(haversine_distance(p, p), 0.0);
    }

    #[test]
    fn test_haversine_is_symmetric_across_antimeridian() {
        let a = pt(-12.5, 179.5);
        let b = pt(8.25, -170.0);
        let ab = haversine_distance(a, b);
        let ba = haversine_distance(b, a);
        assert!((ab - ba).abs() < 1e-9);
        assert!(ab < 3000.0, "should take the short way round, got {ab}");
    }

    #[test]
    fn test_haversine_antipodal_is_half_circumference() {
        let dist = haversine_distance(pt(0.0, 0.0), pt(0.0, 180.0));
        assert!((dist - PI * EARTH_RADIUS_KM).abs() < 1e-6);
        let dist = haversine_distance(pt(90.0, 0.0), pt(-90.0, 0.0));
        assert!((dist - PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = pt(0.0, 0.0);
        assert!((bearing(origin, pt(1.0, 0.0)) - 0.0).abs() < 1e-9);
        assert!((bearing(origin, pt(0.0, 1.0)) - 90.0).abs() < 1e-9);
        assert!((bearing(origin, pt(-1.0, 0.0)) - 180.0).abs() < 1e-9);
        assert!((bearing(origin, pt(0.0, -1.0)) - 270.0).abs() < 1e-9);
    }

    #[test]
    fn test_bearing_of_identical_points_is_zero() {
        let p = pt(51.47, -0.45);
        assert_eq!(bearing(p, p), 0.0);
    }

    #[test]
    fn test_destination_point_inverts_distance_and_bearing() {
        let origin = pt(40.6413, -73.7781);
        let target = destination_point(origin, 52.0, 750.0);
        assert!((haversine_distance(origin, target) - 750.0).abs() < 1e-6);
        assert!((bearing(origin, target) - 52.0).abs() < 1e-6);
    }

    #[test]
    fn test_destination_point_normalizes_longitude() {
        let target = destination_point(pt(0.0, 179.0), 90.0, 500.0);
        assert!(target.lon > -180.0 && target.lon <= 180.0);
        assert!(target.lon < 0.0, "expected to wrap west of the antimeridian: {target:?}");
    }

    #[test]
    fn test_great_circle_points_hit_both_endpoints() {
        let a = pt(51.47, -0.45);
        let b = pt(40.64, -73.78);
        let points: Vec<Point> = great_circle_points(a, b, 16).unwrap().collect();
        assert_eq!(points.len(), 17);
        assert_eq!(points[0], a);
        assert_eq!(points[16], b);

        let total: f64 = points
            .windows(2)
            .map(|pair| haversine_distance(pair[0], pair[1]))
            .sum();
        assert!((total - haversine_distance(a, b)).abs() < 1e-6);
    }

    #[test]
    fn test_great_circle_points_are_evenly_spaced() {
        let points: Vec<Point> = great_circle_points(pt(10.0, 20.0), pt(-30.0, 100.0), 8)
            .unwrap()
            .collect();
        let first = haversine_distance(points[0], points[1]);
        for pair in points.windows(2) {
            assert!((haversine_distance(pair[0], pair[1]) - first).abs() < 1e-6);
        }
    }

    #[test]
    fn test_great_circle_points_degenerate_repeats_start() {
        let a = pt(-33.95, 151.18);
        let points: Vec<Point> = great_circle_points(a, a, 5).unwrap().collect();
        assert_eq!(points, vec![a; 6]);
    }

    #[test]
    fn test_great_circle_points_rejects_zero_segments() {
        assert!(great_circle_points(pt(0.0, 0.0), pt(0.0, 1.0), 0).is_err());
    }

    #[test]
    fn test_great_circle_points_is_restartable() {
        let arc = great_circle_points(pt(0.0, 0.0), pt(0.0, 10.0), 4).unwrap();
        let replay = arc.clone();
        assert_eq!(arc.len(), 5);
        let first: Vec<Point> = arc.collect();
        let second: Vec<Point> = replay.collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_antipodal_interpolation_stays_finite() {
        let a = pt(0.0, 0.0);
        let b = pt(0.0, 180.0);
        let points: Vec<Point> = great_circle_points(a, b, 4).unwrap().collect();
        assert!(points.iter().all(|p| p.lat.is_finite() && p.lon.is_finite()));
        assert_eq!(points[4], b);
        let total: f64 = points
            .windows(2)
            .map(|pair| haversine_distance(pair[0], pair[1]))
            .sum();
        assert!((total - PI * EARTH_RADIUS_KM).abs() < 1e-6);
    }

    #[test]
    fn test_midpoint_across_antimeridian() {
        let mid = midpoint(pt(0.0, 170.0), pt(0.0, -170.0));
        assert!(mid.lat.abs() < 1e-9);
        assert!((mid.lon.abs() - 180.0).abs() < 1e-9, "got {mid:?}");
    }

    #[test]
    fn test_signed_angle_diff_wraps() {
        assert!((signed_angle_diff(10.0, 350.0) - 20.0).abs() < 1e-12);
        assert!((signed_angle_diff(350.0, 10.0) + 20.0).abs() < 1e-12);
        assert!((signed_angle_diff(90.0, 90.0)).abs() < 1e-12);
    }
}
