// Fixed link dimensions of the robot

use crate::kinematics::Point;
use serde::{Deserialize, Serialize};

/// Link dimensions in inches.
///
/// All three arms share these dimensions; they differ only in the rotation
/// of their attachment plane about the central axis. Within an arm's own
/// frame the servo pivot sits on the +x axis at `base_radius`, and the
/// parallelogram lands on the effector at `effector_radius` from its centre.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeltaGeometry {
    pub base_radius: f64,
    pub effector_radius: f64,
    pub upper_arm: f64,
    pub lower_arm: f64,
}

impl Default for DeltaGeometry {
    fn default() -> Self {
        let sqrt3 = 3f64.sqrt();
        Self {
            base_radius: 10.0 / sqrt3,
            effector_radius: 4.0 / sqrt3,
            upper_arm: 5.0,
            lower_arm: 12.0,
        }
    }
}

impl DeltaGeometry {
    /// Horizontal distance between the servo pivot and the effector joint
    /// when the effector is centred.
    pub fn radial_offset(&self) -> f64 {
        self.base_radius - self.effector_radius
    }

    /// The two inverse-cosine arguments for an arm, from solving the
    /// sphere-reach equation `a·cosθ + z·sinθ = K` for `cosθ`.
    ///
    /// `local` must already be rotated into the arm's frame. The first
    /// entry takes the negative square-root branch. Either value may be
    /// NaN or infinite when the point is degenerate or out of reach.
    pub fn cos_arguments(&self, local: Point) -> [f64; 2] {
        let Point { y, z, .. } = local;
        let a = local.x - self.radial_offset();
        let k = (a * a + y * y + z * z + self.upper_arm * self.upper_arm
            - self.lower_arm * self.lower_arm)
            / (2.0 * self.upper_arm);
        let denom = a * a + z * z;
        let root = (z * z * (denom - k * k)).sqrt();
        [(a * k - root) / denom, (a * k + root) / denom]
    }

    /// How far a candidate shoulder angle is from satisfying the rigid
    /// lower-arm constraint, as the absolute error in squared length.
    pub fn residual(&self, local: Point, theta: f64) -> f64 {
        let (sin, cos) = theta.sin_cos();
        let dx = local.x - self.radial_offset() - self.upper_arm * cos;
        let dz = local.z - self.upper_arm * sin;
        (dx * dx + local.y * local.y + dz * dz - self.lower_arm * self.lower_arm).abs()
    }

    pub fn is_valid(&self) -> bool {
        self.upper_arm > 0.0
            && self.lower_arm > 0.0
            && self.base_radius.is_finite()
            && self.effector_radius.is_finite()
    }
}
