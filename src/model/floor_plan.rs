use tracing::trace;

use super::opening::OpeningParams;
use super::wall::check_point;
use super::{require_finite, Device, DeviceId, Opening, OpeningId, OpeningKind, Wall, WallEnd, WallId};
use super::{DEFAULT_WALL_HEIGHT_CM, DEFAULT_WALL_THICKNESS_CM};
use crate::detection::{DetectionConfig, RoomDetector, RoomPolygon};
use crate::error::{ModelError, Result};
use crate::extrusion::ExtrusionInput;
use crate::math::distance_2d::closest_point_on_segment;
use crate::math::{Point2, Vector2};

/// The editing session's walls, openings and devices, plus the cached rooms
/// derived from them.
///
/// Every wall edit invalidates the room cache; opening and device edits do
/// not, since they never change room shape. Ids are assigned monotonically
/// and never reused.
#[derive(Debug, Default)]
pub struct FloorPlan {
    walls: Vec<Wall>,
    openings: Vec<Opening>,
    devices: Vec<Device>,
    next_wall_id: u64,
    next_opening_id: u64,
    next_device_id: u64,
    detector: RoomDetector,
}

impl FloorPlan {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_config(config: DetectionConfig) -> Self {
        Self {
            detector: RoomDetector::with_config(config),
            ..Self::default()
        }
    }

    // --- Walls ---

    #[must_use]
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    #[must_use]
    pub fn wall(&self, id: WallId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Id of a wall spanning `p1`–`p2` in either direction, if any.
    #[must_use]
    pub fn find_wall(&self, p1: Point2, p2: Point2) -> Option<WallId> {
        let probe = Wall {
            id: WallId(0),
            p1,
            p2,
            thickness_cm: DEFAULT_WALL_THICKNESS_CM,
            height_cm: DEFAULT_WALL_HEIGHT_CM,
        };
        let eps = self.detector.config().graph_merge_epsilon;
        self.walls
            .iter()
            .find(|w| w.same_segment(&probe, eps))
            .map(|w| w.id)
    }

    /// Adds a wall with default thickness and height.
    ///
    /// # Errors
    ///
    /// See [`FloorPlan::add_wall_with`].
    pub fn add_wall(&mut self, p1: Point2, p2: Point2) -> Result<WallId> {
        self.add_wall_with(p1, p2, DEFAULT_WALL_THICKNESS_CM, DEFAULT_WALL_HEIGHT_CM)
    }

    /// Adds a wall.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::DegenerateWall` if the wall is shorter than the
    /// configured minimum length, or `ModelError::InvalidDimension` for
    /// non-finite coordinates or non-positive dimensions.
    pub fn add_wall_with(
        &mut self,
        p1: Point2,
        p2: Point2,
        thickness_cm: f64,
        height_cm: f64,
    ) -> Result<WallId> {
        let id = WallId(self.next_wall_id + 1);
        let wall = Wall::new(id, p1, p2, thickness_cm, height_cm)?;
        if wall.is_degenerate(self.detector.config().min_wall_length) {
            return Err(ModelError::DegenerateWall {
                length: wall.length(),
            }
            .into());
        }
        self.next_wall_id += 1;
        self.walls.push(wall);
        self.detector.invalidate();
        trace!(wall = %id, "wall added");
        Ok(id)
    }

    /// Moves both endpoints of a wall.
    ///
    /// A wall may be dragged down to zero length; room detection ignores it
    /// until it grows again. Openings on the wall are re-clamped.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::WallNotFound` or `ModelError::InvalidDimension`
    /// for non-finite coordinates.
    pub fn move_wall(&mut self, id: WallId, p1: Point2, p2: Point2) -> Result<()> {
        check_point("p1", &p1)?;
        check_point("p2", &p2)?;
        let wall = self.wall_mut(id)?;
        wall.p1 = p1;
        wall.p2 = p2;
        let length = wall.length();
        self.reclamp_openings(id, length);
        self.detector.invalidate();
        Ok(())
    }

    /// Drags one endpoint of a wall, leaving the other in place.
    ///
    /// # Errors
    ///
    /// See [`FloorPlan::move_wall`].
    pub fn move_wall_endpoint(&mut self, id: WallId, end: WallEnd, to: Point2) -> Result<()> {
        let wall = self.wall(id).ok_or(ModelError::WallNotFound(id))?;
        let (p1, p2) = match end {
            WallEnd::P1 => (to, wall.p2),
            WallEnd::P2 => (wall.p1, to),
        };
        self.move_wall(id, p1, p2)
    }

    /// Translates a wall by `(dx, dy)`.
    ///
    /// # Errors
    ///
    /// See [`FloorPlan::move_wall`].
    pub fn translate_wall(&mut self, id: WallId, dx: f64, dy: f64) -> Result<()> {
        let wall = self.wall(id).ok_or(ModelError::WallNotFound(id))?;
        let delta = Vector2::new(dx, dy);
        let (p1, p2) = (wall.p1 + delta, wall.p2 + delta);
        self.move_wall(id, p1, p2)
    }

    /// Changes a wall's thickness and height.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::WallNotFound` or `ModelError::InvalidDimension`.
    pub fn resize_wall(&mut self, id: WallId, thickness_cm: f64, height_cm: f64) -> Result<()> {
        let wall = self.wall_mut(id)?;
        let resized = Wall::new(id, wall.p1, wall.p2, thickness_cm, height_cm)?;
        *wall = resized;
        self.detector.invalidate();
        Ok(())
    }

    /// Removes a wall together with every opening cut into it.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::WallNotFound` if no wall has this id.
    pub fn delete_wall(&mut self, id: WallId) -> Result<Wall> {
        let index = self
            .walls
            .iter()
            .position(|w| w.id == id)
            .ok_or(ModelError::WallNotFound(id))?;
        let wall = self.walls.remove(index);
        let before = self.openings.len();
        self.openings.retain(|o| o.wall_id != id);
        self.detector.invalidate();
        trace!(wall = %id, openings_removed = before - self.openings.len(), "wall deleted");
        Ok(wall)
    }

    fn wall_mut(&mut self, id: WallId) -> std::result::Result<&mut Wall, ModelError> {
        self.walls
            .iter_mut()
            .find(|w| w.id == id)
            .ok_or(ModelError::WallNotFound(id))
    }

    fn reclamp_openings(&mut self, wall_id: WallId, wall_length: f64) {
        for o in self.openings.iter_mut().filter(|o| o.wall_id == wall_id) {
            o.clamp_to_wall(wall_length);
        }
    }

    // --- Openings ---

    #[must_use]
    pub fn openings(&self) -> &[Opening] {
        &self.openings
    }

    #[must_use]
    pub fn opening(&self, id: OpeningId) -> Option<&Opening> {
        self.openings.iter().find(|o| o.id == id)
    }

    pub fn doors(&self) -> impl Iterator<Item = &Opening> {
        self.openings.iter().filter(|o| o.kind == OpeningKind::Door)
    }

    pub fn windows(&self) -> impl Iterator<Item = &Opening> {
        self.openings.iter().filter(|o| o.kind == OpeningKind::Window)
    }

    pub fn openings_on(&self, wall_id: WallId) -> impl Iterator<Item = &Opening> {
        self.openings.iter().filter(move |o| o.wall_id == wall_id)
    }

    /// Cuts an opening into a wall at `params.offset_cm`, clamped to the wall.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::WallNotFound` or `ModelError::InvalidDimension`.
    pub fn add_opening(&mut self, wall_id: WallId, params: OpeningParams) -> Result<OpeningId> {
        let wall_length = self
            .wall(wall_id)
            .ok_or(ModelError::WallNotFound(wall_id))?
            .length();
        let id = OpeningId(self.next_opening_id + 1);
        let opening = params.build(id, wall_id, wall_length)?;
        self.next_opening_id += 1;
        self.openings.push(opening);
        Ok(id)
    }

    /// Cuts an opening centred on the projection of `point` onto the wall.
    ///
    /// `params.offset_cm` is ignored.
    ///
    /// # Errors
    ///
    /// See [`FloorPlan::add_opening`].
    pub fn add_opening_at(
        &mut self,
        wall_id: WallId,
        point: Point2,
        params: OpeningParams,
    ) -> Result<OpeningId> {
        let wall = self.wall(wall_id).ok_or(ModelError::WallNotFound(wall_id))?;
        let foot = closest_point_on_segment(&point, &wall.p1, &wall.p2);
        let offset_cm = (foot - wall.p1).norm() - params.width_cm * 0.5;
        self.add_opening(wall_id, OpeningParams { offset_cm, ..params })
    }

    /// Slides an opening along its wall.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::OpeningNotFound` or `ModelError::InvalidDimension`.
    pub fn move_opening(&mut self, id: OpeningId, offset_cm: f64) -> Result<()> {
        let offset_cm = require_finite("offset_cm", offset_cm)?;
        let wall_length = self.host_length(id)?;
        let opening = self.opening_mut(id)?;
        opening.offset_cm = offset_cm;
        opening.clamp_to_wall(wall_length);
        Ok(())
    }

    /// Changes an opening's width, height and sill.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::OpeningNotFound` or `ModelError::InvalidDimension`.
    pub fn resize_opening(
        &mut self,
        id: OpeningId,
        width_cm: f64,
        height_cm: f64,
        sill_cm: f64,
    ) -> Result<()> {
        let wall_length = self.host_length(id)?;
        let opening = self.opening_mut(id)?;
        let params = OpeningParams {
            kind: opening.kind,
            offset_cm: opening.offset_cm,
            width_cm,
            height_cm,
            sill_cm,
        };
        *opening = params.build(id, opening.wall_id, wall_length)?;
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `ModelError::OpeningNotFound` if no opening has this id.
    pub fn delete_opening(&mut self, id: OpeningId) -> Result<Opening> {
        let index = self
            .openings
            .iter()
            .position(|o| o.id == id)
            .ok_or(ModelError::OpeningNotFound(id))?;
        Ok(self.openings.remove(index))
    }

    fn opening_mut(&mut self, id: OpeningId) -> std::result::Result<&mut Opening, ModelError> {
        self.openings
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or(ModelError::OpeningNotFound(id))
    }

    fn host_length(&self, id: OpeningId) -> std::result::Result<f64, ModelError> {
        let opening = self.opening(id).ok_or(ModelError::OpeningNotFound(id))?;
        self.wall(opening.wall_id)
            .map(Wall::length)
            .ok_or(ModelError::WallNotFound(opening.wall_id))
    }

    // --- Devices ---

    #[must_use]
    pub fn devices(&self) -> &[Device] {
        &self.devices
    }

    /// # Errors
    ///
    /// Returns `ModelError::InvalidDimension` for a non-finite position or
    /// elevation.
    pub fn add_device(
        &mut self,
        name: impl Into<String>,
        position: Point2,
        elevation_cm: f64,
    ) -> Result<DeviceId> {
        check_point("position", &position)?;
        let elevation_cm = require_finite("elevation_cm", elevation_cm)?;
        self.next_device_id += 1;
        let id = DeviceId(self.next_device_id);
        self.devices.push(Device {
            id,
            name: name.into(),
            position,
            elevation_cm,
            rotation_deg: 0.0,
        });
        Ok(id)
    }

    /// # Errors
    ///
    /// Returns `ModelError::DeviceNotFound` if no device has this id.
    pub fn delete_device(&mut self, id: DeviceId) -> Result<Device> {
        let index = self
            .devices
            .iter()
            .position(|d| d.id == id)
            .ok_or(ModelError::DeviceNotFound(id))?;
        Ok(self.devices.remove(index))
    }

    // --- Rooms ---

    #[must_use]
    pub fn detector(&self) -> &RoomDetector {
        &self.detector
    }

    /// All rooms, recomputed lazily after wall edits.
    pub fn rooms(&mut self) -> &[RoomPolygon] {
        self.detector.rooms(&self.walls)
    }

    pub fn room_containing(&mut self, point: &Point2) -> Option<&RoomPolygon> {
        self.detector.room_containing(&self.walls, point)
    }

    pub fn largest_room(&mut self) -> Option<&RoomPolygon> {
        self.detector.largest_room(&self.walls)
    }

    /// Hand-off for 3D extrusion: the room containing `selection`, or the
    /// largest room when there is no selection or it hits no room.
    pub fn extrusion_input(&mut self, selection: Option<Point2>) -> Option<ExtrusionInput<'_>> {
        let index = {
            let rooms = self.detector.rooms(&self.walls);
            selection
                .and_then(|p| rooms.iter().position(|r| r.contains(&p)))
                .or_else(|| {
                    rooms
                        .iter()
                        .enumerate()
                        .max_by(|(_, a), (_, b)| a.area().total_cmp(&b.area()))
                        .map(|(i, _)| i)
                })?
        };
        let room = &self.detector.cached_rooms()[index];
        Some(ExtrusionInput::new(room, &self.walls, &self.openings, &self.devices))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::detection::DetectionMethod;
    use crate::error::RoomGraphError;
    use crate::test_support::init_tracing;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn rectangle_plan() -> (FloorPlan, Vec<WallId>) {
        init_tracing();
        let mut plan = FloorPlan::new();
        let corners = [p(0.0, 0.0), p(500.0, 0.0), p(500.0, 400.0), p(0.0, 400.0)];
        let ids = (0..4)
            .map(|i| plan.add_wall(corners[i], corners[(i + 1) % 4]).unwrap())
            .collect();
        (plan, ids)
    }

    #[test]
    fn ids_are_monotonic() {
        let (mut plan, ids) = rectangle_plan();
        assert_eq!(ids, vec![WallId(1), WallId(2), WallId(3), WallId(4)]);
        plan.delete_wall(WallId(4)).unwrap();
        let id = plan.add_wall(p(0.0, 400.0), p(0.0, 0.0)).unwrap();
        assert_eq!(id, WallId(5));
    }

    #[test]
    fn degenerate_wall_is_rejected_at_insertion() {
        let mut plan = FloorPlan::new();
        let err = plan.add_wall(p(10.0, 10.0), p(10.4, 10.0)).unwrap_err();
        assert!(matches!(err, RoomGraphError::Model(ModelError::DegenerateWall { .. })));
        assert!(plan.walls().is_empty());
        // The rejected attempt does not consume an id.
        assert_eq!(plan.add_wall(p(0.0, 0.0), p(10.0, 0.0)).unwrap(), WallId(1));
    }

    #[test]
    fn wall_edits_invalidate_rooms() {
        let (mut plan, ids) = rectangle_plan();
        assert_eq!(plan.rooms().len(), 1);
        assert_eq!(plan.detector().recompute_count(), 1);

        let partition = plan.add_wall(p(250.0, 0.0), p(250.0, 400.0)).unwrap();
        assert!(plan.detector().is_dirty());
        assert_eq!(plan.rooms().len(), 2);

        plan.translate_wall(partition, 50.0, 0.0).unwrap();
        let areas: Vec<f64> = plan.rooms().iter().map(RoomPolygon::area).collect();
        assert_relative_eq!(areas[0], 120_000.0, epsilon = 1.0);
        assert_relative_eq!(areas[1], 80_000.0, epsilon = 1.0);

        plan.delete_wall(ids[0]).unwrap();
        assert!(plan.rooms().is_empty());
        assert_eq!(plan.detector().recompute_count(), 4);
    }

    #[test]
    fn opening_edits_keep_the_cache() {
        let (mut plan, ids) = rectangle_plan();
        let _ = plan.rooms();
        let door = plan.add_opening(ids[0], OpeningParams::door(100.0, 90.0, 210.0)).unwrap();
        plan.move_opening(door, 200.0).unwrap();
        plan.resize_opening(door, 100.0, 200.0, 0.0).unwrap();
        plan.add_device("outlet", p(10.0, 10.0), 30.0).unwrap();
        assert!(!plan.detector().is_dirty());
        let _ = plan.rooms();
        assert_eq!(plan.detector().recompute_count(), 1);
    }

    #[test]
    fn dragging_a_wall_to_zero_length_drops_the_room() {
        let (mut plan, ids) = rectangle_plan();
        assert_eq!(plan.rooms().len(), 1);
        plan.move_wall_endpoint(ids[1], WallEnd::P2, p(500.0, 0.3)).unwrap();
        assert_eq!(plan.wall(ids[1]).unwrap().endpoint(WallEnd::P1), p(500.0, 0.0));
        assert!(plan.rooms().is_empty());
        plan.move_wall_endpoint(ids[1], WallEnd::P2, p(500.0, 400.0)).unwrap();
        assert_eq!(plan.rooms().len(), 1);
    }

    #[test]
    fn deleting_a_wall_deletes_its_openings() {
        let (mut plan, ids) = rectangle_plan();
        plan.add_opening(ids[0], OpeningParams::door(50.0, 90.0, 210.0)).unwrap();
        plan.add_opening(ids[0], OpeningParams::window(300.0, 120.0, 100.0, 90.0)).unwrap();
        let kept = plan.add_opening(ids[1], OpeningParams::window(100.0, 120.0, 100.0, 90.0)).unwrap();
        assert_eq!(plan.openings_on(ids[0]).count(), 2);

        plan.delete_wall(ids[0]).unwrap();
        assert_eq!(plan.openings().len(), 1);
        assert_eq!(plan.openings()[0].id, kept);
    }

    #[test]
    fn shrinking_a_wall_reclamps_openings() {
        let (mut plan, ids) = rectangle_plan();
        let window = plan
            .add_opening(ids[0], OpeningParams::window(350.0, 120.0, 100.0, 90.0))
            .unwrap();
        plan.move_wall(ids[0], p(0.0, 0.0), p(300.0, 0.0)).unwrap();
        let o = plan.opening(window).unwrap();
        assert_relative_eq!(o.offset_cm, 180.0);
    }

    #[test]
    fn opening_placed_at_projected_point() {
        let (mut plan, ids) = rectangle_plan();
        let door = plan
            .add_opening_at(ids[0], p(200.0, 35.0), OpeningParams::door(0.0, 90.0, 210.0))
            .unwrap();
        assert_relative_eq!(plan.opening(door).unwrap().offset_cm, 155.0);

        // Near the far end the opening is clamped inside the wall.
        let near_end = plan
            .add_opening_at(ids[0], p(499.0, -20.0), OpeningParams::door(0.0, 90.0, 210.0))
            .unwrap();
        assert_relative_eq!(plan.opening(near_end).unwrap().offset_cm, 410.0);
    }

    #[test]
    fn doors_and_windows_are_split() {
        let (mut plan, ids) = rectangle_plan();
        plan.add_opening(ids[0], OpeningParams::door(50.0, 90.0, 210.0)).unwrap();
        plan.add_opening(ids[2], OpeningParams::window(100.0, 120.0, 100.0, 90.0)).unwrap();
        plan.add_opening(ids[3], OpeningParams::window(100.0, 80.0, 100.0, 90.0)).unwrap();
        assert_eq!(plan.doors().count(), 1);
        assert_eq!(plan.windows().count(), 2);
    }

    #[test]
    fn missing_ids_are_reported() {
        let (mut plan, _) = rectangle_plan();
        let err = plan.delete_wall(WallId(99)).unwrap_err();
        assert!(matches!(err, RoomGraphError::Model(ModelError::WallNotFound(WallId(99)))));
        assert!(plan.add_opening(WallId(99), OpeningParams::door(0.0, 90.0, 210.0)).is_err());
        assert!(plan.delete_opening(OpeningId(1)).is_err());
        assert!(plan.delete_device(DeviceId(1)).is_err());
        assert!(plan.move_wall(WallId(99), p(0.0, 0.0), p(1.0, 1.0)).is_err());
    }

    #[test]
    fn find_wall_is_order_independent() {
        let (plan, ids) = rectangle_plan();
        assert_eq!(plan.find_wall(p(500.0, 0.0), p(0.0, 0.0)), Some(ids[0]));
        assert_eq!(plan.find_wall(p(0.0, 0.0), p(500.0, 400.0)), None);
    }

    #[test]
    fn extrusion_input_prefers_selection() {
        let (mut plan, ids) = rectangle_plan();
        plan.add_wall(p(300.0, 0.0), p(300.0, 400.0)).unwrap();
        plan.add_opening(ids[0], OpeningParams::door(50.0, 90.0, 210.0)).unwrap();
        plan.add_device("lamp", p(100.0, 100.0), 240.0).unwrap();

        let input = plan.extrusion_input(Some(p(400.0, 200.0))).unwrap();
        assert_relative_eq!(input.room.area(), 80_000.0, epsilon = 1.0);
        assert_eq!(input.walls.len(), 5);
        assert_eq!(input.doors.len(), 1);
        assert!(input.windows.is_empty());
        assert_eq!(input.devices.len(), 1);

        let fallback = plan.extrusion_input(Some(p(-100.0, 0.0))).unwrap();
        assert_relative_eq!(fallback.room.area(), 120_000.0, epsilon = 1.0);
        let none = plan.extrusion_input(None).unwrap();
        assert_relative_eq!(none.room.area(), 120_000.0, epsilon = 1.0);
        assert_eq!(plan.detector().last_method(), Some(DetectionMethod::Orthogonal));
    }

    #[test]
    fn records_serialize_as_plain_json() {
        let (mut plan, ids) = rectangle_plan();
        plan.add_opening(ids[0], OpeningParams::door(50.0, 90.0, 210.0)).unwrap();

        let json = serde_json::to_value(plan.walls()).unwrap();
        assert_eq!(json[0]["id"], 1);
        assert_eq!(json[0]["p2"], serde_json::json!([500.0, 0.0]));
        let back: Vec<Wall> = serde_json::from_value(json).unwrap();
        assert_eq!(back, plan.walls());

        let json = serde_json::to_value(plan.openings()).unwrap();
        assert_eq!(json[0]["kind"], "door");
        assert_eq!(json[0]["wall_id"], 1);
    }

    #[test]
    fn extrusion_input_without_rooms() {
        let mut plan = FloorPlan::new();
        assert!(plan.extrusion_input(None).is_none());
    }
}
