use super::{cross_2d, Point2, Vector2, TOLERANCE};

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise (Y-up). The last
/// vertex connects back to the first; no closing duplicate is stored.
#[must_use]
pub fn signed_area(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let mut sum = 0.0;
    for i in 0..n {
        let j = (i + 1) % n;
        sum += points[i].x * points[j].y - points[j].x * points[i].y;
    }
    sum * 0.5
}

/// Computes the area-weighted centroid of a polygon.
///
/// Falls back to the first vertex when the polygon is degenerate (near-zero
/// area), and to the origin for an empty slice.
#[must_use]
pub fn centroid(points: &[Point2]) -> Point2 {
    let Some(&first) = points.first() else {
        return Point2::origin();
    };
    let area = signed_area(points);
    if area.abs() < TOLERANCE {
        return first;
    }

    let n = points.len();
    let (mut cx, mut cy) = (0.0, 0.0);
    for i in 0..n {
        let a = points[i];
        let b = points[(i + 1) % n];
        let w = a.x * b.y - b.x * a.y;
        cx += (a.x + b.x) * w;
        cy += (a.y + b.y) * w;
    }
    let k = 1.0 / (6.0 * area);
    Point2::new(cx * k, cy * k)
}

/// Even-odd ray-crossing containment test.
///
/// Edges are half-open in y, so a point lying exactly on a left or bottom
/// edge is inside while a point on a right or top edge is outside. Two
/// polygons that tile the plane therefore never both claim a shared point.
#[must_use]
pub fn point_in_polygon(point: &Point2, polygon: &[Point2]) -> bool {
    let n = polygon.len();
    if n < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let pi = polygon[i];
        let pj = polygon[j];
        if (pi.y > point.y) != (pj.y > point.y) {
            let x_cross = pj.x + (point.y - pj.y) * (pi.x - pj.x) / (pi.y - pj.y);
            if point.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Returns the polygon in counter-clockwise order, reversing it if needed.
#[must_use]
pub fn normalize_winding(points: &[Point2]) -> Vec<Point2> {
    let mut out = points.to_vec();
    if signed_area(&out) < 0.0 {
        out.reverse();
    }
    out
}

/// Rotates a closed polygon so it starts at the leftmost vertex (smallest x),
/// breaking ties by smallest y. Ensures deterministic output.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || ((pt.x - b.x).abs() < TOLERANCE && pt.y < b.y) {
            best = i;
        }
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Removes "spikes": vertices where the boundary immediately doubles back
/// on itself (`a -> b -> a`). A walk around a dangling wall produces these.
///
/// Repeats until stable, so a dangling chain of any length collapses.
#[must_use]
pub fn remove_spikes(points: &[Point2], eps: f64) -> Vec<Point2> {
    let mut out = dedup_consecutive(points, eps);
    loop {
        let n = out.len();
        if n < 3 {
            return out;
        }
        let spike = (0..n).find(|&i| {
            let prev = out[(i + n - 1) % n];
            let next = out[(i + 1) % n];
            (prev - next).norm() < eps
        });
        let Some(i) = spike else {
            return out;
        };
        // Drop the tip and one copy of the repeated base vertex.
        let next = (i + 1) % n;
        let (first, second) = if i < next { (i, next) } else { (next, i) };
        out.remove(second);
        out.remove(first);
        out = dedup_consecutive(&out, eps);
    }
}

/// Drops vertices that lie on the straight line through their neighbours.
#[must_use]
pub fn simplify_collinear(points: &[Point2], eps: f64) -> Vec<Point2> {
    let mut out = dedup_consecutive(points, eps);
    let mut changed = true;
    while changed && out.len() > 3 {
        changed = false;
        let n = out.len();
        for i in 0..n {
            let prev = out[(i + n - 1) % n];
            let cur = out[i];
            let next = out[(i + 1) % n];
            let d1: Vector2 = cur - prev;
            let d2: Vector2 = next - cur;
            let len = d1.norm() * d2.norm();
            if len < TOLERANCE {
                continue;
            }
            if (cross_2d(&d1, &d2) / len).abs() < 1e-9 && d1.dot(&d2) > 0.0 {
                out.remove(i);
                changed = true;
                break;
            }
        }
    }
    out
}

/// Removes consecutive duplicates (including a trailing closing duplicate).
fn dedup_consecutive(points: &[Point2], eps: f64) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for &p in points {
        if out.last().is_none_or(|last| (p - last).norm() >= eps) {
            out.push(p);
        }
    }
    while out.len() > 1 && out.first().zip(out.last()).is_some_and(|(a, b)| (a - b).norm() < eps) {
        out.pop();
    }
    out
}

/// Axis-aligned bounds of a point set as `(min, max)`, or `None` when empty.
#[must_use]
pub fn bounding_box(points: &[Point2]) -> Option<(Point2, Point2)> {
    let first = points.first()?;
    let mut min = *first;
    let mut max = *first;
    for p in &points[1..] {
        min.x = min.x.min(p.x);
        min.y = min.y.min(p.y);
        max.x = max.x.max(p.x);
        max.y = max.y.max(p.y);
    }
    Some((min, max))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn unit_square() -> Vec<Point2> {
        vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]
    }

    #[test]
    fn signed_area_ccw_square() {
        assert_relative_eq!(signed_area(&unit_square()), 1.0);
    }

    #[test]
    fn signed_area_flips_under_reversal() {
        let poly = vec![p(0.0, 0.0), p(7.0, 1.0), p(5.0, 6.0), p(1.0, 4.0)];
        let mut rev = poly.clone();
        rev.reverse();
        let a = signed_area(&poly);
        let b = signed_area(&rev);
        assert_relative_eq!(a.abs(), b.abs());
        assert_eq!(a.signum(), -b.signum());
        assert!(a > 0.0, "listed counter-clockwise in Y-up, got {a}");
    }

    #[test]
    fn signed_area_degenerate() {
        assert!(signed_area(&[]).abs() < TOLERANCE);
        assert!(signed_area(&[p(1.0, 1.0), p(2.0, 2.0)]).abs() < TOLERANCE);
    }

    #[test]
    fn centroid_of_rectangle() {
        let rect = vec![p(0.0, 0.0), p(500.0, 0.0), p(500.0, 400.0), p(0.0, 400.0)];
        let c = centroid(&rect);
        assert_relative_eq!(c.x, 250.0, epsilon = 1e-9);
        assert_relative_eq!(c.y, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn centroid_is_winding_independent() {
        let mut tri = vec![p(0.0, 0.0), p(6.0, 0.0), p(0.0, 3.0)];
        let a = centroid(&tri);
        tri.reverse();
        let b = centroid(&tri);
        assert_relative_eq!(a.x, b.x, epsilon = 1e-9);
        assert_relative_eq!(a.y, b.y, epsilon = 1e-9);
        assert_relative_eq!(a.x, 2.0, epsilon = 1e-9);
        assert_relative_eq!(a.y, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn centroid_degenerate_falls_back_to_first_vertex() {
        let line = vec![p(3.0, 4.0), p(5.0, 4.0), p(9.0, 4.0)];
        assert_eq!(centroid(&line), p(3.0, 4.0));
        assert_eq!(centroid(&[]), Point2::origin());
    }

    #[test]
    fn point_in_polygon_basic() {
        let sq = unit_square();
        assert!(point_in_polygon(&p(0.5, 0.5), &sq));
        assert!(!point_in_polygon(&p(1.5, 0.5), &sq));
        assert!(!point_in_polygon(&p(0.5, -0.5), &sq));
    }

    #[test]
    fn point_in_polygon_boundary_is_half_open() {
        let sq = unit_square();
        // Left and bottom edges are inside, right and top edges are outside.
        assert!(point_in_polygon(&p(0.0, 0.5), &sq));
        assert!(point_in_polygon(&p(0.5, 0.0), &sq));
        assert!(!point_in_polygon(&p(1.0, 0.5), &sq));
        assert!(!point_in_polygon(&p(0.5, 1.0), &sq));
    }

    #[test]
    fn point_in_polygon_concave() {
        // L-shape: notch cut from the top-right.
        let l = vec![p(0.0, 0.0), p(4.0, 0.0), p(4.0, 2.0), p(2.0, 2.0), p(2.0, 4.0), p(0.0, 4.0)];
        assert!(point_in_polygon(&p(1.0, 3.0), &l));
        assert!(point_in_polygon(&p(3.0, 1.0), &l));
        assert!(!point_in_polygon(&p(3.0, 3.0), &l));
    }

    #[test]
    fn normalize_winding_reverses_clockwise() {
        let cw = vec![p(0.0, 0.0), p(0.0, 1.0), p(1.0, 1.0), p(1.0, 0.0)];
        let ccw = normalize_winding(&cw);
        assert!(signed_area(&ccw) > 0.0);
        assert_eq!(normalize_winding(&ccw), ccw);
    }

    #[test]
    fn canonical_start_rotation() {
        let pts = vec![p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(0.0, 0.0)];
        let rotated = rotate_to_canonical_start(&pts);
        assert_eq!(rotated[0], p(0.0, 0.0));
        assert_eq!(rotated[1], p(1.0, 0.0));
    }

    #[test]
    fn spikes_are_removed() {
        // Square with a dangling wall from (1,1) out to (1,2) and back.
        let pts = vec![
            p(0.0, 0.0),
            p(2.0, 0.0),
            p(2.0, 1.0),
            p(1.0, 1.0),
            p(1.0, 2.0),
            p(1.0, 1.0),
            p(0.0, 1.0),
        ];
        let clean = remove_spikes(&pts, 1e-6);
        assert_eq!(clean.len(), 5);
        assert_relative_eq!(signed_area(&clean), 2.0);
    }

    #[test]
    fn pure_spike_collapses() {
        let pts = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0), p(1.0, 0.0)];
        assert!(remove_spikes(&pts, 1e-6).len() < 3);
    }

    #[test]
    fn collinear_vertices_are_dropped() {
        let pts = vec![p(0.0, 0.0), p(250.0, 0.0), p(500.0, 0.0), p(500.0, 400.0), p(0.0, 400.0)];
        let simple = simplify_collinear(&pts, 1e-6);
        assert_eq!(simple.len(), 4);
        assert_relative_eq!(signed_area(&simple), 200_000.0);
    }

    #[test]
    fn bounding_box_of_points() {
        let (min, max) = bounding_box(&[p(3.0, -1.0), p(-2.0, 5.0), p(1.0, 1.0)]).unwrap();
        assert_eq!(min, p(-2.0, -1.0));
        assert_eq!(max, p(3.0, 5.0));
        assert!(bounding_box(&[]).is_none());
    }
}
