use tracing::{debug, trace};

use super::config::{DetectionConfig, DetectionMethod, Strategy};
use super::faces::detect_general;
use super::grid::detect_orthogonal;
use super::room::RoomPolygon;
use crate::math::Point2;
use crate::model::Wall;

/// Result of one uncached detection pass.
#[derive(Debug, Clone)]
pub struct Detection {
    pub rooms: Vec<RoomPolygon>,
    pub method: DetectionMethod,
}

/// Runs the configured strategies and post-processes the candidates.
///
/// With [`Strategy::Auto`] the grid method runs first and the planar face
/// walk is used only when the grid yields nothing. Candidates then pass the
/// outer-hull filter and de-duplication, and are sorted by their first
/// vertex so repeated passes over the same walls return identical lists.
#[must_use]
pub fn detect_rooms(walls: &[Wall], config: &DetectionConfig) -> Detection {
    let (mut rooms, method) = match config.strategy {
        Strategy::GeneralOnly => (detect_general(walls, config), DetectionMethod::General),
        Strategy::OrthogonalOnly => (
            detect_orthogonal(walls, config).unwrap_or_default(),
            DetectionMethod::Orthogonal,
        ),
        Strategy::Auto => match detect_orthogonal(walls, config) {
            Some(rooms) => (rooms, DetectionMethod::Orthogonal),
            None => (detect_general(walls, config), DetectionMethod::General),
        },
    };

    remove_outer_hull(&mut rooms);
    dedup_rooms(&mut rooms, config.graph_merge_epsilon);
    rooms.sort_by(|a, b| {
        let (pa, pb) = (a.points()[0], b.points()[0]);
        pa.x.total_cmp(&pb.x)
            .then(pa.y.total_cmp(&pb.y))
            .then(a.area().total_cmp(&b.area()))
    });

    debug!(?method, rooms = rooms.len(), "room detection pass finished");
    Detection { rooms, method }
}

/// Relative area mismatch tolerated between a hull and the rooms it covers.
const HULL_AREA_TOLERANCE: f64 = 1e-2;

/// Drops the largest candidate when it is the union of other candidates.
///
/// The largest candidate counts as an outer hull only if the candidates whose
/// centroids it contains add up to its own area. A room that merely wraps a
/// closet, or a corridor whose centroid lands inside a neighbour, stays.
/// Applied once; returns whether a candidate was removed.
pub fn remove_outer_hull(rooms: &mut Vec<RoomPolygon>) -> bool {
    if rooms.len() < 2 {
        return false;
    }
    let Some((largest, _)) = rooms
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
    else {
        return false;
    };

    let hull = &rooms[largest];
    let hull_area = hull.area();
    let (enclosed, covered) = rooms
        .iter()
        .enumerate()
        .filter(|&(i, r)| i != largest && hull.contains(&r.centroid()))
        .fold((0_usize, 0.0), |(n, sum), (_, r)| (n + 1, sum + r.area()));

    let is_hull = enclosed > 0 && (hull_area - covered).abs() <= HULL_AREA_TOLERANCE * hull_area;
    if is_hull {
        trace!(area = hull_area, enclosed, "removing outer hull candidate");
        rooms.remove(largest);
    } else if enclosed > 0 {
        trace!(area = hull_area, covered, "largest room encloses others but is not their hull");
    }
    is_hull
}

/// Collapses candidates with equal vertex count, area and centroid.
fn dedup_rooms(rooms: &mut Vec<RoomPolygon>, eps: f64) {
    let mut kept: Vec<RoomPolygon> = Vec::with_capacity(rooms.len());
    for room in rooms.drain(..) {
        let duplicate = kept.iter().any(|k| {
            k.vertex_count() == room.vertex_count()
                && (k.area() - room.area()).abs() < 1.0
                && (k.centroid() - room.centroid()).norm() < eps
        });
        if !duplicate {
            kept.push(room);
        }
    }
    *rooms = kept;
}

/// Derived room list plus its dirty flag.
#[derive(Debug)]
struct RoomCache {
    dirty: bool,
    rooms: Vec<RoomPolygon>,
    method: Option<DetectionMethod>,
}

impl Default for RoomCache {
    fn default() -> Self {
        Self {
            dirty: true,
            rooms: Vec::new(),
            method: None,
        }
    }
}

/// Lazily cached room detection over [`detect_rooms`].
///
/// The detector does not watch the walls: whoever mutates them must call
/// [`RoomDetector::invalidate`]. Queries recompute only when the cache is
/// dirty, so a burst of edits costs a single pass on the next read.
#[derive(Debug, Default)]
pub struct RoomDetector {
    config: DetectionConfig,
    cache: RoomCache,
    recomputes: usize,
}

impl RoomDetector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: DetectionConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn config(&self) -> &DetectionConfig {
        &self.config
    }

    /// Replaces the configuration and marks the cache dirty.
    pub fn set_config(&mut self, config: DetectionConfig) {
        self.config = config;
        self.invalidate();
    }

    /// Marks the cached rooms stale. Call after any wall change.
    pub fn invalidate(&mut self) {
        self.cache.dirty = true;
    }

    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.cache.dirty
    }

    /// All rooms for `walls`, recomputed only if the cache is dirty.
    pub fn rooms(&mut self, walls: &[Wall]) -> &[RoomPolygon] {
        if self.cache.dirty {
            let detection = detect_rooms(walls, &self.config);
            self.cache.rooms = detection.rooms;
            self.cache.method = Some(detection.method);
            self.cache.dirty = false;
            self.recomputes += 1;
        } else {
            trace!(rooms = self.cache.rooms.len(), "room cache hit");
        }
        &self.cache.rooms
    }

    /// First room containing `point`. Rooms do not overlap, so at most one
    /// matches in practice.
    pub fn room_containing(&mut self, walls: &[Wall], point: &Point2) -> Option<&RoomPolygon> {
        self.rooms(walls).iter().find(|r| r.contains(point))
    }

    /// The room with the largest area.
    pub fn largest_room(&mut self, walls: &[Wall]) -> Option<&RoomPolygon> {
        self.rooms(walls)
            .iter()
            .max_by(|a, b| a.area().total_cmp(&b.area()))
    }

    /// Strategy that produced the cached rooms, `None` before the first pass.
    #[must_use]
    pub fn last_method(&self) -> Option<DetectionMethod> {
        self.cache.method
    }

    /// Number of detection passes run so far.
    #[must_use]
    pub fn recompute_count(&self) -> usize {
        self.recomputes
    }

    /// Cached rooms without recomputing. Stale if the cache is dirty.
    pub(crate) fn cached_rooms(&self) -> &[RoomPolygon] {
        &self.cache.rooms
    }
}
