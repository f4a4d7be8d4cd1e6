use super::intersect_2d::line_line_intersect_2d;
use super::polygon_2d::signed_area;
use super::{Point2, Vector2, TOLERANCE};

/// Determinant below which two adjacent offset lines are treated as parallel.
pub const OFFSET_DET_EPSILON: f64 = 1e-8;

/// Returns the left-pointing normal of a direction vector.
#[must_use]
pub fn left_normal(dir: &Vector2) -> Vector2 {
    Vector2::new(-dir.y, dir.x)
}

/// Unit normal of segment `a`→`b` pointing away from `interior`.
///
/// Returns `None` for a zero-length segment.
#[must_use]
pub fn outward_normal(a: &Point2, b: &Point2, interior: &Point2) -> Option<Vector2> {
    let d = b - a;
    let len = d.norm();
    if len < TOLERANCE {
        return None;
    }
    let n = left_normal(&d) / len;
    if n.dot(&(interior - a)) > 0.0 {
        Some(-n)
    } else {
        Some(n)
    }
}

/// Offsets a closed polygon by `distance`.
///
/// Positive distances grow the polygon, negative distances shrink it,
/// independent of the input winding. Each output vertex is the intersection
/// of the two adjacent edges' offset lines; when those lines are parallel
/// (or the determinant is below [`OFFSET_DET_EPSILON`]) the vertex is pushed
/// along the averaged edge normal instead. Output vertex `i` corresponds to
/// input vertex `i`.
#[must_use]
pub fn offset_polygon(points: &[Point2], distance: f64) -> Vec<Point2> {
    let n = points.len();
    if n < 3 {
        return points.to_vec();
    }

    // Right normal is outward for a counter-clockwise polygon.
    let ccw = signed_area(points) >= 0.0;
    let normals: Vec<Vector2> = (0..n)
        .map(|i| {
            let d = points[(i + 1) % n] - points[i];
            let len = d.norm();
            if len < TOLERANCE {
                return Vector2::zeros();
            }
            let right = Vector2::new(d.y, -d.x) / len;
            if ccw {
                right
            } else {
                -right
            }
        })
        .collect();

    (0..n)
        .map(|i| {
            let prev = (i + n - 1) % n;
            let a = points[prev] + normals[prev] * distance;
            let da = points[i] - points[prev];
            let b = points[i] + normals[i] * distance;
            let db = points[(i + 1) % n] - points[i];

            match line_line_intersect_2d(&a, &da, &b, &db, OFFSET_DET_EPSILON) {
                Some((t, _)) => a + da * t,
                None => {
                    let avg = normals[prev] + normals[i];
                    let len = avg.norm();
                    let dir = if len < TOLERANCE { normals[i] } else { avg / len };
                    points[i] + dir * distance
                }
            }
        })
        .collect()
}
