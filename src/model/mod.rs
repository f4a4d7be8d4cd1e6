mod device;
mod floor_plan;
mod opening;
mod wall;

pub use device::{Device, DeviceId};
pub use floor_plan::FloorPlan;
pub use opening::{Opening, OpeningId, OpeningKind, OpeningParams};
pub use wall::{Wall, WallEnd, WallId, DEFAULT_WALL_HEIGHT_CM, DEFAULT_WALL_THICKNESS_CM};

use crate::error::ModelError;

/// Rejects non-finite values and values that are not strictly positive.
pub(crate) fn require_positive(field: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ModelError::InvalidDimension { field, value })
    }
}

/// Rejects non-finite values.
pub(crate) fn require_finite(field: &'static str, value: f64) -> Result<f64, ModelError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(ModelError::InvalidDimension { field, value })
    }
}
