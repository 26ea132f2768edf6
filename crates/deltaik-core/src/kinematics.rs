// Inverse kinematics for a three-arm rotary delta

use crate::error::NoSolution;
use core::{f64::consts::PI, fmt, ops::Index};
use serde::{Deserialize, Serialize};

pub mod geometry;
pub mod roots;
pub mod rotary_delta;

pub use geometry::DeltaGeometry;
pub use rotary_delta::RotaryDeltaKin;

/// Effector position in inches, z pointing up from the base plane
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a point from integer thousandths of an inch, the unit used on
    /// the serial link.
    pub fn from_thou(x: i64, y: i64, z: i64) -> Self {
        Self {
            x: x as f64 / 1000.0,
            y: y as f64 / 1000.0,
            z: z as f64 / 1000.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Rotate about the z axis by `angle` radians, counter-clockwise seen
    /// from above.
    pub fn rotate_z(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
            z: self.z,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

/// One of the three arms, numbered as on the servo bus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Actuator {
    One,
    Two,
    Three,
}

impl Actuator {
    pub const ALL: [Actuator; 3] = [Actuator::One, Actuator::Two, Actuator::Three];

    pub const fn index(self) -> usize {
        match self {
            Actuator::One => 0,
            Actuator::Two => 1,
            Actuator::Three => 2,
        }
    }

    /// Rotation of this arm's attachment plane about the central axis
    pub fn offset(self) -> f64 {
        self.index() as f64 * 2.0 * PI / 3.0
    }
}

impl fmt::Display for Actuator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.index() + 1)
    }
}

/// Servo angles in degrees, one per actuator, each in [0, 360)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AngleTriple(pub [f64; 3]);

impl AngleTriple {
    pub const HOME: AngleTriple = AngleTriple([180.0; 3]);

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.0.iter().copied()
    }

    /// Component-wise linear blend, `t = 0` gives `self`
    pub fn lerp(self, other: AngleTriple, t: f64) -> AngleTriple {
        let [a0, a1, a2] = self.0;
        let [b0, b1, b2] = other.0;
        AngleTriple([
            a0 + (b0 - a0) * t,
            a1 + (b1 - a1) * t,
            a2 + (b2 - a2) * t,
        ])
    }

    /// Largest per-actuator difference in degrees
    pub fn max_abs_diff(&self, other: &AngleTriple) -> f64 {
        self.iter()
            .zip(other.iter())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }
}

impl Index<Actuator> for AngleTriple {
    type Output = f64;

    fn index(&self, actuator: Actuator) -> &f64 {
        &self.0[actuator.index()]
    }
}

impl fmt::Display for AngleTriple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c] = self.0;
        write!(f, "[{a:.4}, {b:.4}, {c:.4}]")
    }
}

/// Anything that maps an effector point to servo angles.
///
/// Implemented by the exact closed-form solver and by the interpolated
/// lookup table so callers can pick either behind one interface.
pub trait InverseKinematics {
    fn solve(&self, point: Point) -> Result<AngleTriple, NoSolution>;
}

impl<T: InverseKinematics + ?Sized> InverseKinematics for &T {
    fn solve(&self, point: Point) -> Result<AngleTriple, NoSolution> {
        (**self).solve(point)
    }
}
