use crate::math::offset_2d::offset_polygon;
use crate::math::polygon_2d::{
    bounding_box, centroid, normalize_winding, point_in_polygon, rotate_to_canonical_start,
    signed_area,
};
use crate::math::Point2;

/// One enclosed region bounded by walls.
///
/// Vertices are counter-clockwise (Y-up), without a repeated closing point,
/// and start at the leftmost (then lowest) vertex.
#[derive(Debug, Clone, PartialEq)]
pub struct RoomPolygon {
    points: Vec<Point2>,
}

impl RoomPolygon {
    /// Normalizes a closed boundary into a room polygon.
    ///
    /// Returns `None` for fewer than 3 vertices or an area below `min_area`.
    #[must_use]
    pub fn from_boundary(points: &[Point2], min_area: f64) -> Option<Self> {
        if points.len() < 3 || signed_area(points).abs() < min_area {
            return None;
        }
        let ccw = normalize_winding(points);
        Some(Self {
            points: rotate_to_canonical_start(&ccw),
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    /// Enclosed area in cm². Always positive.
    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }

    #[must_use]
    pub fn centroid(&self) -> Point2 {
        centroid(&self.points)
    }

    /// Half-open containment test, see [`point_in_polygon`].
    #[must_use]
    pub fn contains(&self, p: &Point2) -> bool {
        point_in_polygon(p, &self.points)
    }

    /// Floor outline shrunk by `distance` (typically half the wall thickness).
    #[must_use]
    pub fn inset(&self, distance: f64) -> Vec<Point2> {
        offset_polygon(&self.points, -distance)
    }

    /// Axis-aligned bounds as `(min, max)`.
    #[must_use]
    pub fn bounding_box(&self) -> (Point2, Point2) {
        bounding_box(&self.points).unwrap_or((Point2::origin(), Point2::origin()))
    }
}
