use crate::{kinematics::Actuator, table::Axis};
use thiserror::Error;

/// Why a point could not be turned into actuator angles.
///
/// Every variant means the same thing to a caller: reject the point. The
/// variants only exist so the rejection can be reported usefully.
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum NoSolution {
    #[error("point is out of reach for actuator {actuator}")]
    Unreachable { actuator: Actuator },

    #[error("{axis} = {value} is outside the table range {min}..={max}")]
    OutOfTable {
        axis: Axis,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("lattice cell {lower:?} has an unreachable corner at {corner:?}")]
    Singular {
        lower: [usize; 3],
        corner: [usize; 3],
    },
}
