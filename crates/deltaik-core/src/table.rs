//! Precomputed lattice of joint solutions.
//!
//! A [`LatticeTable`] samples the exact solver on a regular 3D grid so the
//! runtime can replace the closed-form solve with eight loads and seven
//! blends. Cells are stored flat in x-major order (x, then y, then z).
//! Storage is generic: the host owns a `Vec`, firmware can wrap a
//! `'static` slice compiled into the image.

use crate::{
    error::NoSolution,
    kinematics::{AngleTriple, InverseKinematics, Point},
};
use core::fmt;
use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

pub mod builder;
pub mod interp;
pub mod literal;

pub use builder::TableBuilder;
pub use interp::LookupCell;

/// Slack applied before flooring the number of grid steps on an axis, so a
/// range that is a whole number of steps is not lost to rounding.
const STEP_EPSILON: f64 = 1e-9;

/// Largest lattice accepted, about half a gigabyte of samples.
pub const MAX_CELLS: usize = 1 << 24;

/// One lattice sample: the joint solution, or `None` where the grid point is
/// unreachable.
pub type TableCell = Option<AngleTriple>;

/// Which lattice axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::X, Axis::Y, Axis::Z];

    pub fn of(self, p: Point) -> f64 {
        match self {
            Axis::X => p.x,
            Axis::Y => p.y,
            Axis::Z => p.z,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum TableError {
    #[error("invalid {axis} range {min}..={max} with resolution {resolution}")]
    InvalidAxis {
        axis: Axis,
        min: f64,
        max: f64,
        resolution: f64,
    },

    #[error("table has {actual} cells but its axes describe {expected}")]
    CellCount { expected: usize, actual: usize },

    #[error("lattice of {cells:e} cells exceeds the limit of {}", MAX_CELLS)]
    TooLarge { cells: f64 },
}

/// Sampling of one axis: grid points at `min + resolution * i`
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
    pub resolution: f64,
}

impl AxisRange {
    pub const fn new(min: f64, max: f64, resolution: f64) -> Self {
        Self {
            min,
            max,
            resolution,
        }
    }

    pub fn validate(&self, axis: Axis) -> Result<(), TableError> {
        let valid = self.min.is_finite()
            && self.max.is_finite()
            && self.resolution.is_finite()
            && self.resolution > 0.0
            && self.min <= self.max;
        if !valid {
            return Err(TableError::InvalidAxis {
                axis,
                min: self.min,
                max: self.max,
                resolution: self.resolution,
            });
        }
        let cells = self.steps() + 1.0;
        if cells > MAX_CELLS as f64 {
            return Err(TableError::TooLarge { cells });
        }
        Ok(())
    }

    fn steps(&self) -> f64 {
        ((self.max - self.min) / self.resolution + STEP_EPSILON).floor()
    }

    /// Number of grid points, `floor((max - min) / resolution) + 1`.
    /// Saturates on ranges that fail [`AxisRange::validate`].
    pub fn points(&self) -> usize {
        (self.steps() as usize).saturating_add(1)
    }

    pub fn coord(&self, index: usize) -> f64 {
        self.min + self.resolution * index as f64
    }

    /// Last grid coordinate. Equals `max` when the range is a whole number
    /// of steps, otherwise the last step that fits.
    pub fn upper(&self) -> f64 {
        self.coord(self.points() - 1)
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.upper()
    }
}

/// The three sampled axes of a table
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableAxes {
    pub x: AxisRange,
    pub y: AxisRange,
    pub z: AxisRange,
}

impl Default for TableAxes {
    fn default() -> Self {
        Self {
            x: AxisRange::new(-6.0, 6.0, 0.25),
            y: AxisRange::new(-6.0, 6.0, 0.25),
            z: AxisRange::new(-13.0, -8.0, 0.25),
        }
    }
}

impl TableAxes {
    pub fn get(&self, axis: Axis) -> &AxisRange {
        match axis {
            Axis::X => &self.x,
            Axis::Y => &self.y,
            Axis::Z => &self.z,
        }
    }

    pub fn validate(&self) -> Result<(), TableError> {
        for axis in Axis::ALL {
            self.get(axis).validate(axis)?;
        }
        if self.checked_cell_count().is_none_or(|n| n > MAX_CELLS) {
            let cells = self.dims().iter().map(|&n| n as f64).product();
            return Err(TableError::TooLarge { cells });
        }
        Ok(())
    }

    pub fn dims(&self) -> [usize; 3] {
        [self.x.points(), self.y.points(), self.z.points()]
    }

    fn checked_cell_count(&self) -> Option<usize> {
        let [nx, ny, nz] = self.dims();
        nx.checked_mul(ny)?.checked_mul(nz)
    }

    /// Total number of cells. Saturates on axes that fail
    /// [`TableAxes::validate`].
    pub fn cell_count(&self) -> usize {
        self.checked_cell_count().unwrap_or(usize::MAX)
    }

    /// Offset of a lattice index in x-major storage
    pub fn flat_index(&self, [i, j, k]: [usize; 3]) -> Option<usize> {
        let [nx, ny, nz] = self.dims();
        (i < nx && j < ny && k < nz).then(|| (i * ny + j) * nz + k)
    }

    pub fn point(&self, [i, j, k]: [usize; 3]) -> Point {
        Point::new(self.x.coord(i), self.y.coord(j), self.z.coord(k))
    }
}

/// Joint solutions sampled on a regular grid
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct LatticeTable<S = Vec<TableCell>> {
    axes: TableAxes,
    cells: S,
}

impl<S: AsRef<[TableCell]>> LatticeTable<S> {
    pub fn new(axes: TableAxes, cells: S) -> Result<Self, TableError> {
        axes.validate()?;
        let actual = cells.as_ref().len();
        let expected = axes.cell_count();
        if actual != expected {
            return Err(TableError::CellCount { expected, actual });
        }
        Ok(Self { axes, cells })
    }

    pub fn axes(&self) -> &TableAxes {
        &self.axes
    }

    pub fn cells(&self) -> &[TableCell] {
        self.cells.as_ref()
    }

    /// The sample at a lattice index; `None` when it is unreachable or the
    /// index is outside the table.
    pub fn get(&self, index: [usize; 3]) -> TableCell {
        let offset = self.axes.flat_index(index)?;
        self.cells.as_ref()[offset]
    }

    pub fn reachable(&self) -> usize {
        self.cells().iter().filter(|c| c.is_some()).count()
    }

    /// Borrow as a table over a plain slice
    pub fn view(&self) -> LatticeTable<&[TableCell]> {
        LatticeTable {
            axes: self.axes,
            cells: self.cells.as_ref(),
        }
    }

    /// Approximate the joint solution at `point` by trilinear interpolation
    pub fn lookup(&self, point: Point) -> Result<AngleTriple, NoSolution> {
        interp::lookup_cell(self, point).map(|cell| cell.interpolate())
    }

    pub fn to_json(&self) -> serde_json::Result<String>
    where
        S: Serialize,
    {
        serde_json::to_string(self)
    }
}

impl LatticeTable {
    pub fn from_json(input: &str) -> serde_json::Result<Self> {
        serde_json::from_str(input)
    }
}

impl<'de> Deserialize<'de> for LatticeTable {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            axes: TableAxes,
            cells: Vec<TableCell>,
        }

        let raw = Raw::deserialize(deserializer)?;
        LatticeTable::new(raw.axes, raw.cells).map_err(serde::de::Error::custom)
    }
}

impl<S: AsRef<[TableCell]>> InverseKinematics for LatticeTable<S> {
    fn solve(&self, point: Point) -> Result<AngleTriple, NoSolution> {
        self.lookup(point)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tiny_axes() -> TableAxes {
        TableAxes {
            x: AxisRange::new(0.0, 1.0, 1.0),
            y: AxisRange::new(0.0, 1.0, 1.0),
            z: AxisRange::new(-9.0, -9.0, 1.0),
        }
    }

    #[test]
    fn default_dims() {
        assert_eq!(TableAxes::default().dims(), [49, 49, 21]);
        assert_eq!(TableAxes::default().cell_count(), 49 * 49 * 21);
    }

    #[test]
    fn axis_len_survives_rounding() {
        assert_eq!(AxisRange::new(0.0, 1.0, 0.1).points(), 11);
        assert_eq!(AxisRange::new(0.0, 0.95, 0.1).points(), 10);
        assert_eq!(AxisRange::new(2.0, 2.0, 0.5).points(), 1);
    }

    #[test]
    fn axis_upper_is_last_grid_point() {
        let range = AxisRange::new(0.0, 1.0, 0.3);
        assert_eq!(range.points(), 4);
        assert!((range.upper() - 0.9).abs() < 1e-12);
        assert!(!range.contains(0.95));
    }

    #[test]
    fn rejects_bad_axes() {
        let mut axes = tiny_axes();
        axes.y.resolution = 0.0;
        assert!(matches!(
            axes.validate(),
            Err(TableError::InvalidAxis { axis: Axis::Y, .. })
        ));
        axes.y = AxisRange::new(1.0, 0.0, 1.0);
        assert!(axes.validate().is_err());
        axes.y = AxisRange::new(f64::NAN, 0.0, 1.0);
        assert!(axes.validate().is_err());
    }

    #[test]
    fn rejects_oversized_lattices() {
        let mut axes = tiny_axes();
        axes.x = AxisRange::new(0.0, 1.0, 1e-300);
        assert_eq!(axes.x.points(), usize::MAX);
        assert!(axes.x.upper().is_finite());
        assert!(matches!(axes.validate(), Err(TableError::TooLarge { .. })));

        axes.x = AxisRange::new(-1e308, 1e308, 1e-300);
        assert!(matches!(axes.validate(), Err(TableError::TooLarge { .. })));

        // each axis fits on its own, the product does not
        let fine = AxisRange::new(0.0, 1.0, 1e-3);
        let axes = TableAxes {
            x: fine,
            y: fine,
            z: fine,
        };
        assert!(matches!(axes.validate(), Err(TableError::TooLarge { .. })));
    }

    #[test]
    fn json_with_tiny_resolution_is_rejected() {
        let json = r#"{
            "axes": {
                "x": { "min": 0.0, "max": 1.0, "resolution": 1e-300 },
                "y": { "min": 0.0, "max": 1.0, "resolution": 1.0 },
                "z": { "min": -9.0, "max": -9.0, "resolution": 1.0 }
            },
            "cells": []
        }"#;
        let err = LatticeTable::from_json(json).unwrap_err();
        assert!(err.to_string().contains("exceeds the limit"), "{err}");
    }

    #[test]
    fn rejects_wrong_cell_count() {
        assert_eq!(
            LatticeTable::new(tiny_axes(), vec![None; 3]),
            Err(TableError::CellCount {
                expected: 4,
                actual: 3
            })
        );
    }

    #[test]
    fn flat_index_is_x_major() {
        let axes = TableAxes::default();
        assert_eq!(axes.flat_index([0, 0, 1]), Some(1));
        assert_eq!(axes.flat_index([0, 1, 0]), Some(21));
        assert_eq!(axes.flat_index([1, 0, 0]), Some(49 * 21));
        assert_eq!(axes.flat_index([49, 0, 0]), None);
    }

    #[test]
    fn get_and_view() {
        let t = AngleTriple([1.0, 2.0, 3.0]);
        let table = LatticeTable::new(tiny_axes(), vec![None, Some(t), None, None]).unwrap();
        assert_eq!(table.get([0, 1, 0]), Some(t));
        assert_eq!(table.get([0, 0, 0]), None);
        assert_eq!(table.get([2, 0, 0]), None);
        assert_eq!(table.reachable(), 1);
        assert_eq!(table.view().get([0, 1, 0]), Some(t));
    }

    #[test]
    fn static_storage() {
        static CELLS: [TableCell; 4] = [
            Some(AngleTriple([10.0; 3])),
            Some(AngleTriple([20.0; 3])),
            Some(AngleTriple([30.0; 3])),
            Some(AngleTriple([40.0; 3])),
        ];
        let table = LatticeTable::new(tiny_axes(), &CELLS[..]).unwrap();
        let angles = table.solve(Point::new(0.5, 0.5, -9.0)).unwrap();
        assert_eq!(angles, AngleTriple([25.0; 3]));
    }

    #[test]
    fn json_round_trip_validates() {
        let t = AngleTriple([1.5, 2.5, 3.5]);
        let table = LatticeTable::new(tiny_axes(), vec![Some(t), None, None, Some(t)]).unwrap();
        let json = table.to_json().unwrap();
        assert_eq!(LatticeTable::from_json(&json).unwrap(), table);

        let truncated = json.replace("null,null,", "");
        assert!(LatticeTable::from_json(&truncated).is_err());
    }
}
