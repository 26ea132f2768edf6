//! Inverse kinematics and interpolated lookup tables for a rotary delta.
//!
//! Nothing here talks to a transport or an MCU. Solving and table lookups
//! never allocate; only [`table::TableBuilder`] and the table codecs do.

pub mod error;
pub mod kinematics;
pub mod servo;
pub mod table;
pub mod workspace;

pub use error::NoSolution;
pub use kinematics::{Actuator, AngleTriple, InverseKinematics, Point};
