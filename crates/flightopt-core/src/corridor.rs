//! Layered lattice of candidate waypoints around the great-circle track.

use crate::config::validate_offsets;
use crate::error::{Result, RouteError};
use crate::models::Point;
use crate::spatial::{bearing, destination_point, great_circle_points, midpoint};
use serde::{Deserialize, Serialize};

/// Position of a node in the lattice: layer along track, then lane across it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeKey {
    pub slice: usize,
    pub lateral: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CorridorNode {
    pub key: NodeKey,
    pub point: Point,
    /// Signed distance from the track in km (positive = right of track).
    pub offset_km: f64,
}

/// Lattice of `slice_count` layers with one node per lateral offset.
///
/// Nodes are stored row-major by slice, so `(slice, lateral)` maps to a fixed index.
#[derive(Debug, Clone, Serialize)]
pub struct Corridor {
    origin: Point,
    destination: Point,
    slice_count: usize,
    offsets_km: Vec<f64>,
    nodes: Vec<CorridorNode>,
}

impl Corridor {
    /// Lay out one layer per great-circle segment, centred on the segment midpoint.
    ///
    /// Offsets are projected perpendicular to the local track: positive offsets at
    /// bearing + 90°, negative at bearing − 90°, zero is the midpoint itself.
    pub fn build(
        origin: Point,
        destination: Point,
        slice_count: usize,
        lateral_offsets_km: &[f64],
    ) -> Result<Self> {
        origin.validate()?;
        destination.validate()?;
        if slice_count < 1 {
            return Err(RouteError::invalid("slice count must be at least 1"));
        }
        validate_offsets(lateral_offsets_km)?;

        let track: Vec<Point> = great_circle_points(origin, destination, slice_count)?.collect();
        let mut nodes = Vec::with_capacity(slice_count * lateral_offsets_km.len());

        for (slice, segment) in track.windows(2).enumerate() {
            let center = midpoint(segment[0], segment[1]);
            let heading = bearing(center, segment[1]);

            for (lateral, offset) in lateral_offsets_km.iter().copied().enumerate() {
                let point = if offset == 0.0 {
                    center
                } else {
                    let lateral_bearing = if offset > 0.0 {
                        heading + 90.0
                    } else {
                        heading - 90.0
                    };
                    destination_point(center, lateral_bearing, offset.abs())
                };
                nodes.push(CorridorNode {
                    key: NodeKey { slice, lateral },
                    point,
                    offset_km: offset,
                });
            }
        }

        Ok(Self {
            origin,
            destination,
            slice_count,
            offsets_km: lateral_offsets_km.to_vec(),
            nodes,
        })
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn destination(&self) -> Point {
        self.destination
    }

    pub fn slice_count(&self) -> usize {
        self.slice_count
    }

    pub fn lateral_count(&self) -> usize {
        self.offsets_km.len()
    }

    pub fn offsets_km(&self) -> &[f64] {
        &self.offsets_km
    }

    pub fn nodes(&self) -> &[CorridorNode] {
        &self.nodes
    }

    /// Flat arena index of `key`.
    pub fn index_of(&self, key: NodeKey) -> usize {
        key.slice * self.lateral_count() + key.lateral
    }

    pub fn node(&self, key: NodeKey) -> Option<&CorridorNode> {
        if key.slice >= self.slice_count || key.lateral >= self.lateral_count() {
            return None;
        }
        self.nodes.get(self.index_of(key))
    }

    pub fn layer(&self, slice: usize) -> &[CorridorNode] {
        let width = self.lateral_count();
        let start = (slice * width).min(self.nodes.len());
        let end = (start + width).min(self.nodes.len());
        &self.nodes[start..end]
    }

    pub fn layers(&self) -> impl Iterator<Item = &[CorridorNode]> {
        self.nodes.chunks(self.lateral_count())
    }

    /// Lane the route starts and ends in: the zero offset, or the middle lane if
    /// the offsets have no exact zero.
    pub fn center_lateral(&self) -> usize {
        self.offsets_km
            .iter()
            .position(|offset| *offset == 0.0)
            .unwrap_or(self.offsets_km.len() / 2)
    }

    pub fn start_key(&self) -> NodeKey {
        NodeKey {
            slice: 0,
            lateral: self.center_lateral(),
        }
    }

    pub fn goal_key(&self) -> NodeKey {
        NodeKey {
            slice: self.slice_count - 1,
            lateral: self.center_lateral(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spatial::haversine_distance;

    fn pt(lat: f64, lon: f64) -> Point {
        Point::new(lat, lon).unwrap()
    }

    #[test]
    fn test_builds_one_layer_per_slice() {
        let corridor = Corridor::build(pt(0.0, 0.0), pt(0.0, 10.0), 10, &[-100.0, 0.0, 100.0])
            .unwrap();
        assert_eq!(corridor.slice_count(), 10);
        assert_eq!(corridor.lateral_count(), 3);
        assert_eq!(corridor.nodes().len(), 30);
        assert_eq!(corridor.layers().count(), 10);
        for (slice, layer) in corridor.layers().enumerate() {
            for (lateral, node) in layer.iter().enumerate() {
                assert_eq!(node.key, NodeKey { slice, lateral });
            }
        }
    }

    #[test]
    fn test_zero_offset_nodes_are_segment_midpoints() {
        let corridor = Corridor::build(pt(0.0, 0.0), pt(0.0, 10.0), 10, &[-100.0, 0.0, 100.0])
            .unwrap();
        for (slice, layer) in corridor.layers().enumerate() {
            let expected_lon = slice as f64 + 0.5;
            let center = layer[1].point;
            assert!(center.lat.abs() < 1e-9);
            assert!((center.lon - expected_lon).abs() < 1e-9, "slice {slice}: {center:?}");
        }
    }

    #[test]
    fn test_offsets_are_perpendicular_to_track() {
        // Eastbound along the equator: right of track is south, left is north.
        let corridor = Corridor::build(pt(0.0, 0.0), pt(0.0, 10.0), 4, &[-100.0, 0.0, 100.0])
            .unwrap();
        for layer in corridor.layers() {
            let (left, center, right) = (layer[0].point, layer[1].point, layer[2].point);
            assert!(left.lat > 0.0);
            assert!(right.lat < 0.0);
            assert!((haversine_distance(center, left) - 100.0).abs() < 1e-6);
            assert!((haversine_distance(center, right) - 100.0).abs() < 1e-6);
            assert!((left.lon - center.lon).abs() < 1e-9);
        }
    }

    #[test]
    fn test_start_and_goal_use_zero_offset_lane() {
        let corridor = Corridor::build(pt(10.0, 10.0), pt(20.0, 30.0), 5, &[0.0, 50.0, 100.0])
            .unwrap();
        assert_eq!(corridor.start_key(), NodeKey { slice: 0, lateral: 0 });
        assert_eq!(corridor.goal_key(), NodeKey { slice: 4, lateral: 0 });
    }

    #[test]
    fn test_falls_back_to_middle_lane_without_zero_offset() {
        let corridor =
            Corridor::build(pt(10.0, 10.0), pt(20.0, 30.0), 5, &[-75.0, -25.0, 25.0, 75.0])
                .unwrap();
        assert_eq!(corridor.center_lateral(), 2);
    }

    #[test]
    fn test_rejects_invalid_input() {
        let origin = pt(0.0, 0.0);
        let destination = pt(0.0, 10.0);
        assert!(matches!(
            Corridor::build(origin, destination, 0, &[0.0]),
            Err(RouteError::InvalidConfiguration(_))
        ));
        assert!(Corridor::build(origin, destination, 3, &[]).is_err());
        let bad = Point { lat: 95.0, lon: 0.0 };
        assert!(Corridor::build(bad, destination, 3, &[0.0]).is_err());
    }

    #[test]
    fn test_node_lookup_is_bounds_checked() {
        let corridor = Corridor::build(pt(0.0, 0.0), pt(0.0, 10.0), 2, &[0.0]).unwrap();
        assert!(corridor.node(NodeKey { slice: 1, lateral: 0 }).is_some());
        assert!(corridor.node(NodeKey { slice: 2, lateral: 0 }).is_none());
        assert!(corridor.node(NodeKey { slice: 0, lateral: 1 }).is_none());
    }
}
