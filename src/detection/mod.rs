mod config;
pub mod faces;
mod grid;
mod room;
mod selector;

pub use config::{DetectionConfig, DetectionMethod, Strategy};
pub use faces::detect_general;
pub use grid::detect_orthogonal;
pub use room::RoomPolygon;
pub use selector::{detect_rooms, remove_outer_hull, Detection, RoomDetector};
