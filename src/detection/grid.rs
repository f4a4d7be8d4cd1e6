use std::collections::{HashMap, VecDeque};

use tracing::{debug, trace, warn};

use super::config::DetectionConfig;
use super::room::RoomPolygon;
use crate::math::polygon_2d::signed_area;
use crate::math::Point2;
use crate::model::Wall;

/// A grid line intersection, in grid units.
type GridPoint = (i64, i64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Axis {
    Horizontal,
    Vertical,
}

/// Raster of blocked crossings over `cols × rows` cells.
#[derive(Debug)]
struct Raster {
    cols: usize,
    rows: usize,
    origin: Point2,
    step: f64,
    /// `vertical[j * (cols + 1) + k]`: crossing between cells `(k - 1, j)`
    /// and `(k, j)` is blocked by a wall on vertical grid line `k`.
    vertical: Vec<bool>,
    /// `horizontal[k * cols + i]`: crossing between cells `(i, k - 1)` and
    /// `(i, k)` is blocked by a wall on horizontal grid line `k`.
    horizontal: Vec<bool>,
}

impl Raster {
    /// Sizes the raster around all wall endpoints, leaving a free border of
    /// at least one cell beyond the (gap-extended) walls.
    fn around(walls: &[&Wall], step: f64, extend_cells: f64, max_cells: usize) -> Option<Self> {
        let (mut min, mut max) = (walls[0].p1, walls[0].p1);
        for w in walls {
            for p in [w.p1, w.p2] {
                min = Point2::new(min.x.min(p.x), min.y.min(p.y));
                max = Point2::new(max.x.max(p.x), max.y.max(p.y));
            }
        }

        // Sized in f64 so huge spans or tiny steps cannot overflow the cast.
        let border = 1.0 + extend_cells;
        let cols_f = ((max.x - min.x) / step).ceil() + 2.0 * border;
        let rows_f = ((max.y - min.y) / step).ceil() + 2.0 * border;
        let cells_f = cols_f * rows_f;
        if !cells_f.is_finite() || cells_f > max_cells as f64 {
            warn!(cols = cols_f, rows = rows_f, max_cells, "grid raster too large; skipping grid detection");
            return None;
        }
        let (cols, rows) = (cols_f as usize, rows_f as usize);

        let margin = border * step;
        let origin = Point2::new(min.x - margin, min.y - margin);

        Some(Self {
            cols,
            rows,
            origin,
            step,
            vertical: vec![false; (cols + 1) * rows],
            horizontal: vec![false; cols * (rows + 1)],
        })
    }

    fn snap_x(&self, x: f64) -> i64 {
        ((x - self.origin.x) / self.step).round() as i64
    }

    fn snap_y(&self, y: f64) -> i64 {
        ((y - self.origin.y) / self.step).round() as i64
    }

    fn block(&mut self, wall: &Wall, axis: Axis, extend: f64) {
        match axis {
            Axis::Horizontal => {
                let k = self.snap_y((wall.p1.y + wall.p2.y) * 0.5);
                let lo = self.snap_x(wall.p1.x.min(wall.p2.x) - extend);
                let hi = self.snap_x(wall.p1.x.max(wall.p2.x) + extend);
                let Ok(k) = usize::try_from(k) else { return };
                if k > self.rows {
                    return;
                }
                for i in clamp_range(lo, hi, self.cols) {
                    self.horizontal[k * self.cols + i] = true;
                }
            }
            Axis::Vertical => {
                let k = self.snap_x((wall.p1.x + wall.p2.x) * 0.5);
                let lo = self.snap_y(wall.p1.y.min(wall.p2.y) - extend);
                let hi = self.snap_y(wall.p1.y.max(wall.p2.y) + extend);
                let Ok(k) = usize::try_from(k) else { return };
                if k > self.cols {
                    return;
                }
                for j in clamp_range(lo, hi, self.rows) {
                    self.vertical[j * (self.cols + 1) + k] = true;
                }
            }
        }
    }

    fn cell_count(&self) -> usize {
        self.cols * self.rows
    }

    fn index(&self, i: usize, j: usize) -> usize {
        j * self.cols + i
    }

    /// Cells reachable from `(i, j)` in one unblocked step.
    fn open_neighbors(&self, i: usize, j: usize) -> impl Iterator<Item = (usize, usize)> {
        let right = (i + 1 < self.cols && !self.vertical[j * (self.cols + 1) + i + 1])
            .then(|| (i + 1, j));
        let left = (i > 0 && !self.vertical[j * (self.cols + 1) + i]).then(|| (i - 1, j));
        let up = (j + 1 < self.rows && !self.horizontal[(j + 1) * self.cols + i])
            .then(|| (i, j + 1));
        let down = (j > 0 && !self.horizontal[j * self.cols + i]).then(|| (i, j - 1));
        [right, left, up, down].into_iter().flatten()
    }

    /// Labels every cell reachable from `seed` with `label`, returning them.
    fn flood(&self, seed: (usize, usize), label: u32, labels: &mut [u32]) -> Vec<(usize, usize)> {
        let mut cells = vec![seed];
        let mut queue = VecDeque::from([seed]);
        labels[self.index(seed.0, seed.1)] = label;
        while let Some((i, j)) = queue.pop_front() {
            for (ni, nj) in self.open_neighbors(i, j) {
                let idx = self.index(ni, nj);
                if labels[idx] == UNVISITED {
                    labels[idx] = label;
                    cells.push((ni, nj));
                    queue.push_back((ni, nj));
                }
            }
        }
        cells
    }

    fn to_world(&self, p: GridPoint) -> Point2 {
        Point2::new(
            self.origin.x + p.0 as f64 * self.step,
            self.origin.y + p.1 as f64 * self.step,
        )
    }
}

const UNVISITED: u32 = 0;
const EXTERIOR: u32 = 1;

/// Room polygons for axis-aligned layouts.
///
/// Walls are rasterized onto a `grid_step` cell grid as blocked crossings.
/// Flooding from the corner cell marks the exterior; each remaining
/// connected cell set becomes a room outlined along the cell edges.
///
/// Returns `None` when the method does not apply (no usable walls, a wall
/// that is neither horizontal nor vertical, an oversized raster) or when it
/// finds no enclosed region, so the caller can fall back to the planar walk.
#[must_use]
pub fn detect_orthogonal(walls: &[Wall], config: &DetectionConfig) -> Option<Vec<RoomPolygon>> {
    if config.grid_step.is_nan() || config.grid_step <= 0.0 {
        return None;
    }
    let usable: Vec<&Wall> = walls
        .iter()
        .filter(|w| !w.is_degenerate(config.min_wall_length))
        .collect();
    if usable.is_empty() {
        return None;
    }

    let mut axes = Vec::with_capacity(usable.len());
    for w in &usable {
        let Some(axis) = classify(w, config.grid_merge_epsilon) else {
            debug!(wall = %w.id, "non-orthogonal wall; grid detection not applicable");
            return None;
        };
        axes.push(axis);
    }

    let step = config.grid_step;
    let extend_cells = (config.grid_merge_epsilon / step).ceil().max(0.0);
    let mut raster = Raster::around(&usable, step, extend_cells, config.max_grid_cells)?;
    for (w, &axis) in usable.iter().zip(&axes) {
        raster.block(w, axis, config.grid_merge_epsilon);
    }

    let mut labels = vec![UNVISITED; raster.cell_count()];
    let exterior = raster.flood((0, 0), EXTERIOR, &mut labels);
    trace!(
        cells = raster.cell_count(),
        exterior = exterior.len(),
        "flooded grid exterior"
    );

    let cell_area = step * step;
    let mut rooms = Vec::new();
    let mut next_label = EXTERIOR + 1;
    for j in 0..raster.rows {
        for i in 0..raster.cols {
            if labels[raster.index(i, j)] != UNVISITED {
                continue;
            }
            let region = raster.flood((i, j), next_label, &mut labels);
            next_label += 1;

            if (region.len() as f64) * cell_area < config.min_room_area {
                continue;
            }
            match region_outline(&region) {
                Some(outline) => {
                    let points: Vec<Point2> = outline.into_iter().map(|p| raster.to_world(p)).collect();
                    if let Some(room) = RoomPolygon::from_boundary(&points, config.min_room_area) {
                        rooms.push(room);
                    }
                }
                None => warn!(cells = region.len(), "region boundary did not chain; dropping region"),
            }
        }
    }

    debug!(regions = next_label - EXTERIOR - 1, rooms = rooms.len(), "grid detection finished");
    if rooms.is_empty() {
        None
    } else {
        Some(rooms)
    }
}

fn classify(wall: &Wall, eps: f64) -> Option<Axis> {
    let dx = (wall.p2.x - wall.p1.x).abs();
    let dy = (wall.p2.y - wall.p1.y).abs();
    if dy <= eps && dx > dy {
        Some(Axis::Horizontal)
    } else if dx <= eps && dy > dx {
        Some(Axis::Vertical)
    } else {
        None
    }
}

/// Outer boundary of a connected cell set, as grid corner points (CCW).
///
/// Cell edges are toggled into a set keyed by their undirected span: an edge
/// shared by two cells of the region cancels, one on the region's rim stays.
/// Each cell contributes its edges counter-clockwise, so surviving edges
/// chain head to tail. Returns `None` when a corner has more than one
/// outgoing edge (regions touching diagonally) or a chain does not close.
fn region_outline(cells: &[(usize, usize)]) -> Option<Vec<GridPoint>> {
    let mut edges: HashMap<(GridPoint, GridPoint), (GridPoint, GridPoint)> = HashMap::new();
    for &(i, j) in cells {
        let (x, y) = (i as i64, j as i64);
        let corners = [(x, y), (x + 1, y), (x + 1, y + 1), (x, y + 1)];
        for c in 0..4 {
            let edge = (corners[c], corners[(c + 1) % 4]);
            let key = (edge.0.min(edge.1), edge.0.max(edge.1));
            if edges.remove(&key).is_none() {
                edges.insert(key, edge);
            }
        }
    }

    let mut next: HashMap<GridPoint, GridPoint> = HashMap::with_capacity(edges.len());
    for (from, to) in edges.into_values() {
        if next.insert(from, to).is_some() {
            return None;
        }
    }

    let mut loops: Vec<Vec<GridPoint>> = Vec::new();
    loop {
        let Some(start) = next.keys().min().copied() else {
            break;
        };
        let mut walk = vec![start];
        let mut cur = start;
        loop {
            cur = next.remove(&cur)?;
            if cur == start {
                break;
            }
            walk.push(cur);
        }
        loops.push(corners_only(&walk));
    }

    // Holes (islands inside the region) come out clockwise; keep the rim.
    if loops.len() > 1 {
        trace!(holes = loops.len() - 1, "ignoring region holes");
    }
    loops
        .into_iter()
        .map(|l| {
            let points: Vec<Point2> = l.iter().map(|&(x, y)| Point2::new(x as f64, y as f64)).collect();
            (signed_area(&points), l)
        })
        .filter(|(area, _)| *area > 0.0)
        .max_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, l)| l)
}

/// Keeps only the points of a unit-step loop where the direction changes.
fn corners_only(walk: &[GridPoint]) -> Vec<GridPoint> {
    let n = walk.len();
    (0..n)
        .filter(|&k| {
            let prev = walk[(k + n - 1) % n];
            let cur = walk[k];
            let next = walk[(k + 1) % n];
            (cur.0 - prev.0, cur.1 - prev.1) != (next.0 - cur.0, next.1 - cur.1)
        })
        .map(|k| walk[k])
        .collect()
}

/// Cell indices `lo..hi` clipped to `0..len`.
fn clamp_range(lo: i64, hi: i64, len: usize) -> std::ops::Range<usize> {
    let clip = |v: i64| usize::try_from(v.max(0)).unwrap_or(0).min(len);
    clip(lo)..clip(hi)
}
