pub mod detection;
pub mod error;
pub mod extrusion;
pub mod graph;
pub mod math;
pub mod model;

#[cfg(test)]
mod test_support;

pub use detection::{DetectionConfig, DetectionMethod, RoomDetector, RoomPolygon, Strategy};
pub use error::{ModelError, Result, RoomGraphError};
pub use model::FloorPlan;
