use crate::math::Point2;

/// Index of a merged vertex inside a [`VertexPool`] or `WallGraph`.
pub type VertexIndex = usize;

/// Merges nearby points into shared vertices.
///
/// Lookup is a linear scan returning the first stored point closer than
/// `epsilon`, so the same input always resolves to the same vertex for the
/// lifetime of the pool.
#[derive(Debug, Clone)]
pub struct VertexPool {
    points: Vec<Point2>,
    epsilon: f64,
}

impl VertexPool {
    #[must_use]
    pub fn new(epsilon: f64) -> Self {
        Self {
            points: Vec::new(),
            epsilon,
        }
    }

    /// Returns the vertex within `epsilon` of `p`, if any.
    #[must_use]
    pub fn resolve(&self, p: &Point2) -> Option<VertexIndex> {
        self.points.iter().position(|q| (q - p).norm() < self.epsilon)
    }

    /// Returns the vertex within `epsilon` of `p`, inserting `p` as a new
    /// vertex when none exists.
    pub fn resolve_or_insert(&mut self, p: Point2) -> VertexIndex {
        if let Some(i) = self.resolve(&p) {
            return i;
        }
        self.points.push(p);
        self.points.len() - 1
    }

    #[must_use]
    pub fn point(&self, index: VertexIndex) -> Option<&Point2> {
        self.points.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn into_points(self) -> Vec<Point2> {
        self.points
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merges_within_epsilon() {
        let mut pool = VertexPool::new(0.5);
        let a = pool.resolve_or_insert(Point2::new(0.0, 0.0));
        let b = pool.resolve_or_insert(Point2::new(0.3, -0.2));
        let c = pool.resolve_or_insert(Point2::new(0.6, 0.0));
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn first_match_wins() {
        let mut pool = VertexPool::new(0.5);
        pool.resolve_or_insert(Point2::new(0.0, 0.0));
        pool.resolve_or_insert(Point2::new(0.8, 0.0));
        // Within epsilon of both; the earlier vertex is returned.
        assert_eq!(pool.resolve(&Point2::new(0.4, 0.0)), Some(0));
        assert_eq!(pool.point(0), Some(&Point2::new(0.0, 0.0)));
    }

    #[test]
    fn empty_pool() {
        let pool = VertexPool::new(0.5);
        assert!(pool.is_empty());
        assert!(pool.resolve(&Point2::new(1.0, 1.0)).is_none());
    }
}
