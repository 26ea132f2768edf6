// Degrees to servo goal positions

use serde::{Deserialize, Serialize};

/// Conversion from servo degrees to encoder ticks.
///
/// The default matches a 12-bit servo: 4096 ticks per revolution.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServoScale {
    pub ticks_per_degree: f64,
    pub max_tick: u16,
}

impl Default for ServoScale {
    fn default() -> Self {
        Self {
            ticks_per_degree: 4096.0 / 360.0,
            max_tick: 4095,
        }
    }
}

impl ServoScale {
    /// Goal position for an angle, rounded to the nearest tick and
    /// saturated to the servo's range.
    pub fn goal_position(&self, degrees: f64) -> u16 {
        let ticks = (degrees * self.ticks_per_degree).round();
        if ticks.is_nan() || ticks <= 0.0 {
            0
        } else if ticks >= f64::from(self.max_tick) {
            self.max_tick
        } else {
            ticks as u16
        }
    }
}
