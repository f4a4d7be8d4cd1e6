use std::fmt;

use serde::{Deserialize, Serialize};

use super::{require_finite, require_positive, WallId};
use crate::error::ModelError;

/// Identifier of a door or window, unique within a floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpeningId(pub u64);

impl fmt::Display for OpeningId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OpeningKind {
    Door,
    Window,
}

/// A door or window cut into a wall.
///
/// The opening references its host wall by id; it does not own it. Deleting
/// the wall deletes its openings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opening {
    pub id: OpeningId,
    pub kind: OpeningKind,
    pub wall_id: WallId,
    /// Distance from the wall's `p1` to the opening's near edge.
    pub offset_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    /// Height of the bottom edge above the floor. Always 0 for doors.
    pub sill_cm: f64,
}

impl Opening {
    /// Distance from the wall's `p1` to the opening's far edge.
    #[must_use]
    pub fn end_offset_cm(&self) -> f64 {
        self.offset_cm + self.width_cm
    }

    /// Clamps the offset into `[0, wall_length - width]`.
    ///
    /// An opening wider than its wall is pinned to offset 0.
    pub fn clamp_to_wall(&mut self, wall_length: f64) {
        let max = (wall_length - self.width_cm).max(0.0);
        self.offset_cm = self.offset_cm.clamp(0.0, max);
    }
}

/// Dimensions for a new opening. The floor plan assigns the id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OpeningParams {
    pub kind: OpeningKind,
    pub offset_cm: f64,
    pub width_cm: f64,
    pub height_cm: f64,
    pub sill_cm: f64,
}

impl OpeningParams {
    #[must_use]
    pub fn door(offset_cm: f64, width_cm: f64, height_cm: f64) -> Self {
        Self {
            kind: OpeningKind::Door,
            offset_cm,
            width_cm,
            height_cm,
            sill_cm: 0.0,
        }
    }

    #[must_use]
    pub fn window(offset_cm: f64, width_cm: f64, height_cm: f64, sill_cm: f64) -> Self {
        Self {
            kind: OpeningKind::Window,
            offset_cm,
            width_cm,
            height_cm,
            sill_cm,
        }
    }

    /// Validates the dimensions and builds an opening clamped to its wall.
    pub(crate) fn build(
        self,
        id: OpeningId,
        wall_id: WallId,
        wall_length: f64,
    ) -> Result<Opening, ModelError> {
        let sill_cm = match self.kind {
            OpeningKind::Door => 0.0,
            OpeningKind::Window => require_finite("sill_cm", self.sill_cm)?.max(0.0),
        };
        let mut opening = Opening {
            id,
            kind: self.kind,
            wall_id,
            offset_cm: require_finite("offset_cm", self.offset_cm)?,
            width_cm: require_positive("width_cm", self.width_cm)?,
            height_cm: require_positive("height_cm", self.height_cm)?,
            sill_cm,
        };
        opening.clamp_to_wall(wall_length);
        Ok(opening)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_clamped_into_wall() {
        let o = OpeningParams::door(480.0, 90.0, 210.0)
            .build(OpeningId(1), WallId(1), 500.0)
            .unwrap();
        assert!((o.offset_cm - 410.0).abs() < 1e-12);
        assert!((o.end_offset_cm() - 500.0).abs() < 1e-12);

        let o = OpeningParams::window(-20.0, 120.0, 100.0, 90.0)
            .build(OpeningId(2), WallId(1), 500.0)
            .unwrap();
        assert!(o.offset_cm.abs() < 1e-12);
        assert!((o.sill_cm - 90.0).abs() < 1e-12);
    }

    #[test]
    fn opening_wider_than_wall_pins_to_start() {
        let mut o = OpeningParams::window(30.0, 200.0, 100.0, 80.0)
            .build(OpeningId(1), WallId(1), 150.0)
            .unwrap();
        assert!(o.offset_cm.abs() < 1e-12);
        o.offset_cm = 50.0;
        o.clamp_to_wall(150.0);
        assert!(o.offset_cm.abs() < 1e-12);
    }

    #[test]
    fn door_sill_is_forced_to_zero() {
        let mut params = OpeningParams::door(0.0, 90.0, 210.0);
        params.sill_cm = 40.0;
        let o = params.build(OpeningId(1), WallId(1), 300.0).unwrap();
        assert!(o.sill_cm.abs() < 1e-12);
    }

    #[test]
    fn rejects_non_positive_width() {
        let err = OpeningParams::door(0.0, 0.0, 210.0)
            .build(OpeningId(1), WallId(1), 300.0)
            .unwrap_err();
        assert_eq!(err, ModelError::InvalidDimension { field: "width_cm", value: 0.0 });
    }
}
