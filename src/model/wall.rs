use std::fmt;

use serde::{Deserialize, Serialize};

use super::{require_finite, require_positive};
use crate::error::ModelError;
use crate::math::{Point2, Vector2, TOLERANCE};

/// Thickness given to walls drawn without an explicit value.
pub const DEFAULT_WALL_THICKNESS_CM: f64 = 10.0;

/// Height given to walls drawn without an explicit value.
pub const DEFAULT_WALL_HEIGHT_CM: f64 = 250.0;

/// Identifier of a wall, unique within a floor plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WallId(pub u64);

impl fmt::Display for WallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One end of a wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WallEnd {
    P1,
    P2,
}

/// A straight wall segment with physical dimensions.
///
/// Walls are directionless: `p1`/`p2` order carries no meaning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Wall {
    pub id: WallId,
    pub p1: Point2,
    pub p2: Point2,
    pub thickness_cm: f64,
    pub height_cm: f64,
}

impl Wall {
    /// Creates a wall, validating coordinates and dimensions.
    ///
    /// Length is not checked here: a wall dragged to zero length is a valid
    /// transient state and is simply ignored by room detection.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::InvalidDimension` for non-finite coordinates or
    /// a non-positive thickness or height.
    pub fn new(
        id: WallId,
        p1: Point2,
        p2: Point2,
        thickness_cm: f64,
        height_cm: f64,
    ) -> Result<Self, ModelError> {
        check_point("p1", &p1)?;
        check_point("p2", &p2)?;
        Ok(Self {
            id,
            p1,
            p2,
            thickness_cm: require_positive("thickness_cm", thickness_cm)?,
            height_cm: require_positive("height_cm", height_cm)?,
        })
    }

    #[must_use]
    pub fn endpoint(&self, end: WallEnd) -> Point2 {
        match end {
            WallEnd::P1 => self.p1,
            WallEnd::P2 => self.p2,
        }
    }

    /// Length of the centerline.
    #[must_use]
    pub fn length(&self) -> f64 {
        (self.p2 - self.p1).norm()
    }

    /// Whether the wall is shorter than `min_length` and contributes no edge.
    #[must_use]
    pub fn is_degenerate(&self, min_length: f64) -> bool {
        self.length() < min_length
    }

    /// Unit direction from `p1` to `p2`, or `None` for a zero-length wall.
    #[must_use]
    pub fn direction(&self) -> Option<Vector2> {
        let d = self.p2 - self.p1;
        let len = d.norm();
        (len > TOLERANCE).then(|| d / len)
    }

    /// Whether both walls span the same segment, in either endpoint order.
    #[must_use]
    pub fn same_segment(&self, other: &Wall, eps: f64) -> bool {
        let close = |a: &Point2, b: &Point2| (a - b).norm() < eps;
        (close(&self.p1, &other.p1) && close(&self.p2, &other.p2))
            || (close(&self.p1, &other.p2) && close(&self.p2, &other.p1))
    }
}

pub(crate) fn check_point(field: &'static str, p: &Point2) -> Result<(), ModelError> {
    require_finite(field, p.x)?;
    require_finite(field, p.y)?;
    Ok(())
}
