// Reachable volume gate

use crate::kinematics::Point;
use serde::{Deserialize, Serialize};

/// Resting position with all three arms horizontal
pub const HOME: Point = Point::new(0.0, 0.0, -8.5064);

/// Vertical cylinder centred on the z axis that the effector may occupy
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Workspace {
    pub radius: f64,
    pub z_min: f64,
    pub z_max: f64,
}

impl Default for Workspace {
    fn default() -> Self {
        Self {
            radius: 6.0,
            z_min: -13.0,
            z_max: -8.0,
        }
    }
}

impl Workspace {
    /// Bounds are inclusive
    pub fn contains(&self, p: Point) -> bool {
        p.x * p.x + p.y * p.y <= self.radius * self.radius
            && p.z >= self.z_min
            && p.z <= self.z_max
    }

    pub fn is_valid(&self) -> bool {
        self.radius > 0.0 && self.z_min <= self.z_max
    }
}
