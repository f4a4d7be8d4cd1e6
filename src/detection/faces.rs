use std::collections::HashSet;
use std::f64::consts::TAU;

use tracing::{debug, trace, warn};

use super::config::DetectionConfig;
use super::room::RoomPolygon;
use crate::graph::{VertexIndex, WallGraph};
use crate::math::polygon_2d::{remove_spikes, signed_area, simplify_collinear};
use crate::math::Point2;
use crate::model::Wall;

/// A closed half-edge walk.
#[derive(Debug, Clone)]
pub struct Face {
    pub vertices: Vec<VertexIndex>,
    pub signed_area: f64,
}

impl Face {
    /// Whether this walk is the unbounded face of its component.
    #[must_use]
    pub fn is_outer(&self) -> bool {
        self.signed_area < 0.0
    }
}

/// Neighbour lists sorted by direction angle in `[0, 2π)`, closer first on ties.
#[must_use]
pub fn sorted_adjacency(graph: &WallGraph) -> Vec<Vec<VertexIndex>> {
    graph
        .adjacency()
        .iter()
        .enumerate()
        .map(|(v, neighbors)| {
            let origin = graph.point(v);
            let mut keyed: Vec<(f64, f64, VertexIndex)> = neighbors
                .iter()
                .map(|&n| {
                    let d = graph.point(n) - origin;
                    (direction_angle(d.x, d.y), d.norm_squared(), n)
                })
                .collect();
            keyed.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.total_cmp(&b.1)));
            keyed.into_iter().map(|(_, _, n)| n).collect()
        })
        .collect()
}

/// Traces every half-edge exactly once and returns all closed walks,
/// including outer faces and zero-area walks around dangling walls.
///
/// Walking from half-edge `(u, v)` to `(v, w)`, where `w` is the angular
/// predecessor of `u` around `v`, traces the face on the walk's left. In the
/// Y-up frame bounded faces come out counter-clockwise and the unbounded
/// face of each connected component comes out clockwise.
#[must_use]
pub fn enumerate_faces(graph: &WallGraph) -> Vec<Face> {
    let sorted = sorted_adjacency(graph);
    let max_steps = 2 * graph.edge_count() + 1;
    let mut visited: HashSet<(VertexIndex, VertexIndex)> = HashSet::new();
    let mut faces = Vec::new();

    for (start, neighbors) in sorted.iter().enumerate() {
        for &next in neighbors {
            if visited.contains(&(start, next)) {
                continue;
            }
            if let Some(vertices) = trace_face(&sorted, (start, next), &mut visited, max_steps) {
                let points: Vec<Point2> = vertices.iter().map(|&v| graph.point(v)).collect();
                faces.push(Face {
                    signed_area: signed_area(&points),
                    vertices,
                });
            }
        }
    }

    trace!(faces = faces.len(), "enumerated half-edge walks");
    faces
}

/// Follows the predecessor rule from `first` until the walk closes.
///
/// Returns `None` if the walk hits a missing back-reference or exceeds
/// `max_steps`; neither happens for a well-formed graph.
fn trace_face(
    sorted: &[Vec<VertexIndex>],
    first: (VertexIndex, VertexIndex),
    visited: &mut HashSet<(VertexIndex, VertexIndex)>,
    max_steps: usize,
) -> Option<Vec<VertexIndex>> {
    let mut walk = Vec::new();
    let (mut from, mut to) = first;

    for _ in 0..max_steps {
        visited.insert((from, to));
        walk.push(from);

        let around = &sorted[to];
        let Some(pos) = around.iter().position(|&n| n == from) else {
            warn!(from, to, "half-edge has no twin; dropping walk");
            return None;
        };
        let next = around[(pos + around.len() - 1) % around.len()];
        (from, to) = (to, next);

        if (from, to) == first {
            return Some(walk);
        }
    }

    warn!(start = ?first, max_steps, "face walk did not close; dropping walk");
    None
}

/// Room polygons from the planar face walk.
///
/// Drops degenerate walks (area below `min_room_area`) and outer faces,
/// strips dangling-wall spikes and collinear vertices from what remains.
#[must_use]
pub fn detect_general(walls: &[Wall], config: &DetectionConfig) -> Vec<RoomPolygon> {
    let graph = WallGraph::build(walls, config);
    if graph.is_empty() {
        return Vec::new();
    }

    let faces = enumerate_faces(&graph);
    let total = faces.len();
    let mut degenerate = 0;
    let mut outer = 0;
    let mut rooms = Vec::new();

    for face in faces {
        if face.signed_area.abs() < config.min_room_area {
            degenerate += 1;
            continue;
        }
        if face.is_outer() {
            outer += 1;
            continue;
        }
        let points: Vec<Point2> = face.vertices.iter().map(|&v| graph.point(v)).collect();
        let cleaned = simplify_collinear(
            &remove_spikes(&points, config.graph_merge_epsilon),
            config.graph_merge_epsilon,
        );
        if let Some(room) = RoomPolygon::from_boundary(&cleaned, config.min_room_area) {
            rooms.push(room);
        }
    }

    debug!(
        faces = total,
        degenerate,
        outer,
        rooms = rooms.len(),
        "planar face detection finished"
    );
    rooms
}

fn direction_angle(dx: f64, dy: f64) -> f64 {
    let a = dy.atan2(dx);
    if a < 0.0 {
        a + TAU
    } else {
        a
    }
}
