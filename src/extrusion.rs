use crate::detection::RoomPolygon;
use crate::math::distance_2d::point_to_segment_dist;
use crate::math::offset_2d::outward_normal;
use crate::math::{Point2, Vector2};
use crate::model::{Device, Opening, OpeningId, OpeningKind, Wall};

/// An opening resolved against its host wall.
#[derive(Debug, Clone, PartialEq)]
pub struct OpeningPlacement {
    pub opening_id: OpeningId,
    pub kind: OpeningKind,
    /// Plan position of the edge nearer the wall's `p1`.
    pub start: Point2,
    pub end: Point2,
    /// Unit vector along the wall, `p1` towards `p2`.
    pub direction: Vector2,
    pub bottom_cm: f64,
    pub top_cm: f64,
    /// Depth of the cut, equal to the host wall's thickness.
    pub thickness_cm: f64,
}

impl OpeningPlacement {
    /// Places `opening` on `wall`. `None` if the opening belongs to another
    /// wall or the wall has collapsed to a point.
    #[must_use]
    pub fn resolve(opening: &Opening, wall: &Wall) -> Option<Self> {
        if opening.wall_id != wall.id {
            return None;
        }
        let direction = wall.direction()?;
        let start = wall.p1 + direction * opening.offset_cm;
        Some(Self {
            opening_id: opening.id,
            kind: opening.kind,
            start,
            end: start + direction * opening.width_cm,
            direction,
            bottom_cm: opening.sill_cm,
            top_cm: opening.sill_cm + opening.height_cm,
            thickness_cm: wall.thickness_cm,
        })
    }

    #[must_use]
    pub fn center(&self) -> Point2 {
        nalgebra::center(&self.start, &self.end)
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Normal of the opening pointing away from `interior`.
    #[must_use]
    pub fn outward(&self, interior: &Point2) -> Option<Vector2> {
        outward_normal(&self.start, &self.end, interior)
    }
}

/// Everything the extruder needs for one room. Nothing here builds meshes;
/// openings are resolved to plan positions with [`OpeningPlacement`].
#[derive(Debug, Clone)]
pub struct ExtrusionInput<'a> {
    pub room: &'a RoomPolygon,
    pub walls: &'a [Wall],
    pub doors: Vec<&'a Opening>,
    pub windows: Vec<&'a Opening>,
    pub devices: &'a [Device],
}

impl<'a> ExtrusionInput<'a> {
    #[must_use]
    pub fn new(
        room: &'a RoomPolygon,
        walls: &'a [Wall],
        openings: &'a [Opening],
        devices: &'a [Device],
    ) -> Self {
        let (doors, windows): (Vec<&Opening>, Vec<&Opening>) = openings
            .iter()
            .partition(|o| o.kind == OpeningKind::Door);
        Self {
            room,
            walls,
            doors,
            windows,
            devices,
        }
    }

    /// Doors then windows, each resolved against its host wall. Openings
    /// whose wall is missing or degenerate are skipped.
    #[must_use]
    pub fn placements(&self) -> Vec<OpeningPlacement> {
        self.doors
            .iter()
            .chain(&self.windows)
            .filter_map(|o| {
                let wall = self.walls.iter().find(|w| w.id == o.wall_id)?;
                OpeningPlacement::resolve(o, wall)
            })
            .collect()
    }

    /// Walls lying on the room outline: both endpoints within `eps` of a
    /// room edge.
    #[must_use]
    pub fn boundary_walls(&self, eps: f64) -> Vec<&'a Wall> {
        let pts = self.room.points();
        let on_outline = |p: &Point2| {
            (0..pts.len()).any(|i| point_to_segment_dist(p, &pts[i], &pts[(i + 1) % pts.len()]) <= eps)
        };
        self.walls
            .iter()
            .filter(|w| on_outline(&w.p1) && on_outline(&w.p2))
            .collect()
    }

    /// Devices whose plan position lies inside the room.
    #[must_use]
    pub fn devices_in_room(&self) -> Vec<&'a Device> {
        self.devices
            .iter()
            .filter(|d| self.room.contains(&d.position))
            .collect()
    }
}
