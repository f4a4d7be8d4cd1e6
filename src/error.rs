use thiserror::Error;

use crate::model::{DeviceId, OpeningId, WallId};

/// Top-level error type for the room graph crate.
///
/// Only edit operations on the floor plan can fail. Room detection itself
/// never errors: degenerate or unresolvable input is filtered out.
#[derive(Debug, Error)]
pub enum RoomGraphError {
    #[error(transparent)]
    Model(#[from] ModelError),
}

/// Errors raised by floor plan edit operations.
#[derive(Debug, Error, PartialEq)]
pub enum ModelError {
    #[error("wall {0} not found")]
    WallNotFound(WallId),

    #[error("opening {0} not found")]
    OpeningNotFound(OpeningId),

    #[error("device {0} not found")]
    DeviceNotFound(DeviceId),

    #[error("degenerate wall: length {length} cm is below the minimum")]
    DegenerateWall { length: f64 },

    #[error("invalid {field}: {value}")]
    InvalidDimension { field: &'static str, value: f64 },
}

/// Convenience type alias for results using [`RoomGraphError`].
pub type Result<T> = std::result::Result<T, RoomGraphError>;
