use super::{Point2, TOLERANCE};

/// Returns the parameter `t` in `[0, 1]` of the projection of `p` onto
/// segment `a`→`b`. A zero-length segment projects everything to `t = 0`.
#[must_use]
pub fn project_on_segment(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    let d = b - a;
    let len_sq = d.norm_squared();
    if len_sq < TOLERANCE * TOLERANCE {
        return 0.0;
    }
    ((p - a).dot(&d) / len_sq).clamp(0.0, 1.0)
}

/// Returns the point on segment `a`→`b` closest to `p`.
///
/// Projects onto the infinite line and clamps to the segment's extent.
#[must_use]
pub fn closest_point_on_segment(p: &Point2, a: &Point2, b: &Point2) -> Point2 {
    let t = project_on_segment(p, a, b);
    a + (b - a) * t
}

/// Returns the minimum distance from `p` to segment `a`→`b`.
#[must_use]
pub fn point_to_segment_dist(p: &Point2, a: &Point2, b: &Point2) -> f64 {
    (p - closest_point_on_segment(p, a, b)).norm()
}
