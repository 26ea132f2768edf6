// Rotary delta kinematics

use crate::{
    error::NoSolution,
    kinematics::{
        Actuator, AngleTriple, DeltaGeometry, InverseKinematics, Point,
        roots::{self, CandidateRoot},
    },
};

/// Rotary delta kinematics - three servo-driven arms to a shared effector
///
/// Each arm is solved with the same closed form after rotating the target
/// into that arm's frame, so the three arms cannot drift apart.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RotaryDeltaKin {
    geometry: DeltaGeometry,
}

impl RotaryDeltaKin {
    pub fn new(geometry: DeltaGeometry) -> Self {
        Self { geometry }
    }

    pub fn geometry(&self) -> &DeltaGeometry {
        &self.geometry
    }

    /// All four inverse-cosine branches for one arm, scored against the
    /// unsquared reach equation.
    pub fn candidates(&self, point: Point, actuator: Actuator) -> [CandidateRoot; 4] {
        let local = point.rotate_z(-actuator.offset());
        let [low, high] = self.geometry.cos_arguments(local);
        let [a, b] = roots::branches(low);
        let [c, d] = roots::branches(high);

        [a, b, c, d].map(|angle| match angle {
            Some(theta) => CandidateRoot {
                angle: Some(theta),
                residual: self.geometry.residual(local, theta),
            },
            None => CandidateRoot::MISSING,
        })
    }

    /// Servo angle in degrees for one arm, or `None` when the point is out
    /// of that arm's reach.
    pub fn solve_actuator(&self, point: Point, actuator: Actuator) -> Option<f64> {
        if !point.is_finite() {
            return None;
        }
        let candidates = self.candidates(point, actuator);
        let residuals = candidates.map(|c| c.residual);
        let (first, second) = roots::two_smallest(&residuals);
        let viable = |idx: Option<usize>| idx.and_then(|i| candidates[i].angle);

        roots::remove_extraneous(viable(first), viable(second)).map(roots::to_servo_degrees)
    }

    /// Servo angles for all three arms. A point is only reachable if every
    /// arm reaches it.
    pub fn solve_joint(&self, point: Point) -> Result<AngleTriple, NoSolution> {
        let mut angles = [0.0; 3];
        for actuator in Actuator::ALL {
            match self.solve_actuator(point, actuator) {
                Some(angle) => angles[actuator.index()] = angle,
                None => {
                    tracing::trace!(%point, %actuator, "no kinematic solution");
                    return Err(NoSolution::Unreachable { actuator });
                }
            }
        }
        Ok(AngleTriple(angles))
    }
}

impl InverseKinematics for RotaryDeltaKin {
    fn solve(&self, point: Point) -> Result<AngleTriple, NoSolution> {
        self.solve_joint(point)
    }
}
