//! Root bookkeeping for the closed-form arm solve.
//!
//! Solving the reach equation for `cosθ` squares it, so each arm produces
//! up to four candidate angles: `±acos` of two arguments. At most two of
//! them satisfy the unsquared equation, and of those only the one nearest
//! the horizontal reference pose is physically reachable.

use core::f64::consts::PI;

/// How far past ±1 an inverse-cosine argument may drift from rounding
/// before it is treated as out of reach.
pub const ACOS_TOLERANCE: f64 = 1e-4;

/// One branch of the inverse-cosine solve.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CandidateRoot {
    /// Shoulder angle in radians, in (-π, π]
    pub angle: Option<f64>,
    /// Constraint error; infinite when `angle` is missing
    pub residual: f64,
}

impl CandidateRoot {
    pub const MISSING: CandidateRoot = CandidateRoot {
        angle: None,
        residual: f64::INFINITY,
    };
}

/// Both angle branches for one inverse-cosine argument.
///
/// Arguments a hair past ±1 are clamped to the tangency angle, which then
/// fills both slots.
pub fn branches(arg: f64) -> [Option<f64>; 2] {
    if !arg.is_finite() {
        return [None, None];
    }
    if arg.abs() > 1.0 {
        return if (arg - 1.0).abs() < ACOS_TOLERANCE {
            [Some(0.0), Some(0.0)]
        } else if (arg + 1.0).abs() < ACOS_TOLERANCE {
            [Some(PI), Some(PI)]
        } else {
            [None, None]
        };
    }
    let theta = arg.acos();
    [Some(theta), Some(normalize_angle(-theta))]
}

/// Indices of the smallest and second smallest residuals.
///
/// A single scan with strict comparisons, so on equal values the earlier
/// index ranks first. Infinite residuals never rank.
pub fn two_smallest(residuals: &[f64]) -> (Option<usize>, Option<usize>) {
    let mut first: Option<(usize, f64)> = None;
    let mut second: Option<(usize, f64)> = None;
    for (idx, &value) in residuals.iter().enumerate() {
        if !value.is_finite() {
            continue;
        }
        match first {
            Some((_, min)) if value >= min => {
                if second.is_none_or(|(_, min2)| value < min2) {
                    second = Some((idx, value));
                }
            }
            _ => {
                second = first;
                first = Some((idx, value));
            }
        }
    }
    (first.map(|(idx, _)| idx), second.map(|(idx, _)| idx))
}

/// Wrap an angle into (-π, π].
pub fn normalize_angle(angle: f64) -> f64 {
    if angle > PI {
        angle - 2.0 * PI
    } else if angle <= -PI {
        angle + 2.0 * PI
    } else {
        angle
    }
}

/// Pick the physically meaningful root of the two viable options.
///
/// With both present the one closer to the zero pose wins, the first on a
/// tie. A lone present option is returned unchanged.
pub fn remove_extraneous(first: Option<f64>, second: Option<f64>) -> Option<f64> {
    match (first, second) {
        (Some(a), Some(b)) => {
            let (a, b) = (normalize_angle(a), normalize_angle(b));
            Some(if a.abs() <= b.abs() { a } else { b })
        }
        (Some(a), None) => Some(a),
        (None, Some(b)) => Some(b),
        (None, None) => None,
    }
}

/// Convert a kinematic angle in radians to the servo's degree convention,
/// where the horizontal pose reads 180.
pub fn to_servo_degrees(angle: f64) -> f64 {
    let degrees = 180.0 - 180.0 * angle / PI;
    if degrees < 0.0 {
        degrees + 360.0
    } else {
        degrees
    }
}
