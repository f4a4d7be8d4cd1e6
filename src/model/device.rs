use std::fmt;

use serde::{Deserialize, Serialize};

use crate::math::Point2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A fixture placed in the plan (outlet, radiator, lamp, ...).
///
/// Devices play no part in room detection; they are carried through to the
/// extrusion hand-off untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: DeviceId,
    pub name: String,
    pub position: Point2,
    pub elevation_cm: f64,
    pub rotation_deg: f64,
}
