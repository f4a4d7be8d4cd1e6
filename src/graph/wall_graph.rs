use tracing::{debug, trace};

use super::vertex_pool::{VertexIndex, VertexPool};
use crate::detection::DetectionConfig;
use crate::math::distance_2d::project_on_segment;
use crate::math::intersect_2d::segment_segment_intersect_2d;
use crate::math::Point2;
use crate::model::Wall;

/// Undirected planar graph of wall centerlines.
///
/// Vertices are merged wall endpoints (plus junction points when splitting
/// is enabled). Each adjacency list holds every neighbour exactly once, in
/// insertion order; there are no parallel edges and no self-loops.
#[derive(Debug, Clone, Default)]
pub struct WallGraph {
    vertices: Vec<Point2>,
    adjacency: Vec<Vec<VertexIndex>>,
}

impl WallGraph {
    /// Builds the graph for a wall list.
    ///
    /// Walls shorter than `config.min_wall_length` are skipped silently.
    #[must_use]
    pub fn build(walls: &[Wall], config: &DetectionConfig) -> Self {
        let segments: Vec<(Point2, Point2)> = walls
            .iter()
            .filter(|w| {
                let degenerate = w.is_degenerate(config.min_wall_length);
                if degenerate {
                    trace!(wall = %w.id, length = w.length(), "skipping degenerate wall");
                }
                !degenerate
            })
            .map(|w| (w.p1, w.p2))
            .collect();

        let eps = config.graph_merge_epsilon;
        let pieces = if config.split_junctions {
            split_at_junctions(&segments, eps)
        } else {
            segments
        };

        let mut pool = VertexPool::new(eps);
        let mut adjacency: Vec<Vec<VertexIndex>> = Vec::new();
        for (a, b) in pieces {
            let i = pool.resolve_or_insert(a);
            let j = pool.resolve_or_insert(b);
            adjacency.resize_with(pool.len(), Vec::new);
            if i == j {
                continue;
            }
            if !adjacency[i].contains(&j) {
                adjacency[i].push(j);
                adjacency[j].push(i);
            }
        }

        let graph = Self {
            vertices: pool.into_points(),
            adjacency,
        };
        debug!(
            walls = walls.len(),
            vertices = graph.vertex_count(),
            edges = graph.edge_count(),
            dangling = graph.dangling_count(),
            "built wall graph"
        );
        graph
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    #[must_use]
    pub fn adjacency(&self) -> &[Vec<VertexIndex>] {
        &self.adjacency
    }

    #[must_use]
    pub fn point(&self, v: VertexIndex) -> Point2 {
        self.vertices[v]
    }

    #[must_use]
    pub fn neighbors(&self, v: VertexIndex) -> &[VertexIndex] {
        self.adjacency.get(v).map(Vec::as_slice).unwrap_or(&[])
    }

    #[must_use]
    pub fn degree(&self, v: VertexIndex) -> usize {
        self.neighbors(v).len()
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(Vec::len).sum::<usize>() / 2
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edge_count() == 0
    }

    /// Iterates each undirected edge once, as `(low, high)` vertex indices.
    pub fn edges(&self) -> impl Iterator<Item = (VertexIndex, VertexIndex)> + '_ {
        self.adjacency
            .iter()
            .enumerate()
            .flat_map(|(i, ns)| ns.iter().filter(move |&&j| i < j).map(move |&j| (i, j)))
    }

    fn dangling_count(&self) -> usize {
        self.adjacency.iter().filter(|ns| ns.len() == 1).count()
    }
}

/// Splits segments wherever another segment crosses them or ends on them.
///
/// Crossing points come from a bounded segment intersection; T-junctions
/// (an endpoint resting on another segment's interior, within `eps`) and
/// collinear overlaps come from projecting endpoints. Split points closer
/// than `eps` to an existing endpoint are ignored.
fn split_at_junctions(segments: &[(Point2, Point2)], eps: f64) -> Vec<(Point2, Point2)> {
    let mut splits: Vec<Vec<f64>> = vec![Vec::new(); segments.len()];

    for i in 0..segments.len() {
        for j in (i + 1)..segments.len() {
            let (a0, a1) = segments[i];
            let (b0, b1) = segments[j];

            if let Some((_, t, u)) = segment_segment_intersect_2d(&a0, &a1, &b0, &b1) {
                if is_interior(t, (a1 - a0).norm(), eps) {
                    splits[i].push(t);
                }
                if is_interior(u, (b1 - b0).norm(), eps) {
                    splits[j].push(u);
                }
            }

            for p in [b0, b1] {
                if let Some(t) = resting_param(&p, &a0, &a1, eps) {
                    splits[i].push(t);
                }
            }
            for p in [a0, a1] {
                if let Some(u) = resting_param(&p, &b0, &b1, eps) {
                    splits[j].push(u);
                }
            }
        }
    }

    let mut pieces = Vec::with_capacity(segments.len());
    for (&(a, b), ts) in segments.iter().zip(&mut splits) {
        let len = (b - a).norm();
        ts.sort_by(f64::total_cmp);
        ts.dedup_by(|x, y| (*x - *y).abs() * len < eps);

        let mut start = a;
        for &t in ts.iter() {
            let mid = a + (b - a) * t;
            pieces.push((start, mid));
            start = mid;
        }
        pieces.push((start, b));
    }

    if pieces.len() > segments.len() {
        trace!(
            segments = segments.len(),
            pieces = pieces.len(),
            "split walls at junctions"
        );
    }
    pieces
}

/// Parameter of `p` on segment `a`→`b` when `p` lies on its interior.
fn resting_param(p: &Point2, a: &Point2, b: &Point2, eps: f64) -> Option<f64> {
    let t = project_on_segment(p, a, b);
    let foot = a + (b - a) * t;
    ((p - foot).norm() < eps && is_interior(t, (b - a).norm(), eps)).then_some(t)
}

fn is_interior(t: f64, len: f64, eps: f64) -> bool {
    t * len > eps && (1.0 - t) * len > eps
}
