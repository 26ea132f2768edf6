// Trilinear interpolation over a lattice table

use crate::{
    error::NoSolution,
    kinematics::{AngleTriple, Point},
    table::{Axis, AxisRange, LatticeTable, TableCell},
};

/// The lattice cell enclosing a query point, with its eight corner samples.
///
/// Corners are indexed `dx * 4 + dy * 2 + dz`, each offset 0 for the lower
/// grid index on that axis and 1 for the upper.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LookupCell {
    pub lower: [usize; 3],
    pub upper: [usize; 3],
    /// Position of the query inside the cell, each in [0, 1]
    pub fraction: [f64; 3],
    pub corners: [AngleTriple; 8],
}

impl LookupCell {
    pub fn corner(&self, dx: usize, dy: usize, dz: usize) -> AngleTriple {
        self.corners[dx * 4 + dy * 2 + dz]
    }

    /// Blend along x, then y, then z.
    pub fn interpolate(&self) -> AngleTriple {
        let [fx, fy, fz] = self.fraction;
        let c00 = self.corner(0, 0, 0).lerp(self.corner(1, 0, 0), fx);
        let c01 = self.corner(0, 0, 1).lerp(self.corner(1, 0, 1), fx);
        let c10 = self.corner(0, 1, 0).lerp(self.corner(1, 1, 0), fx);
        let c11 = self.corner(0, 1, 1).lerp(self.corner(1, 1, 1), fx);

        let c0 = c00.lerp(c10, fy);
        let c1 = c01.lerp(c11, fy);
        c0.lerp(c1, fz)
    }
}

/// Lower grid index and fractional offset of `value` along one axis.
///
/// A value on the last grid line belongs to the last cell rather than
/// opening a new one past the end.
fn locate(range: &AxisRange, axis: Axis, value: f64) -> Result<(usize, f64), NoSolution> {
    if !range.contains(value) {
        return Err(NoSolution::OutOfTable {
            axis,
            value,
            min: range.min,
            max: range.upper(),
        });
    }
    let last = range.points() - 1;
    let index = (((value - range.min) / range.resolution) as usize).min(last.saturating_sub(1));
    let fraction = ((value - range.coord(index)) / range.resolution).clamp(0.0, 1.0);
    Ok((index, fraction))
}

/// Find the cell around `point` and load its corners.
pub fn lookup_cell<S: AsRef<[TableCell]>>(
    table: &LatticeTable<S>,
    point: Point,
) -> Result<LookupCell, NoSolution> {
    let axes = table.axes();
    let mut lower = [0; 3];
    let mut upper = [0; 3];
    let mut fraction = [0.0; 3];
    for (i, axis) in Axis::ALL.into_iter().enumerate() {
        let range = axes.get(axis);
        let (index, frac) = locate(range, axis, axis.of(point))?;
        lower[i] = index;
        upper[i] = (index + 1).min(range.points() - 1);
        fraction[i] = frac;
    }

    let mut corners = [AngleTriple::default(); 8];
    for (c, slot) in corners.iter_mut().enumerate() {
        let pick = |bit: usize, i: usize| if c & bit == 0 { lower[i] } else { upper[i] };
        let corner = [pick(4, 0), pick(2, 1), pick(1, 2)];
        *slot = table.get(corner).ok_or_else(|| {
            tracing::trace!(%point, ?lower, ?corner, "lookup cell touches unreachable sample");
            NoSolution::Singular { lower, corner }
        })?;
    }

    Ok(LookupCell {
        lower,
        upper,
        fraction,
        corners,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::TableAxes;

    /// 3 x 2 x 2 table whose angles are affine in the lattice coordinates,
    /// so interpolation must be exact.
    fn affine_table() -> LatticeTable {
        let axes = TableAxes {
            x: AxisRange::new(0.0, 2.0, 1.0),
            y: AxisRange::new(-1.0, 1.0, 2.0),
            z: AxisRange::new(-10.0, -9.5, 0.5),
        };
        let mut cells = Vec::new();
        for i in 0..3 {
            for j in 0..2 {
                for k in 0..2 {
                    let p = axes.point([i, j, k]);
                    cells.push(Some(AngleTriple([
                        100.0 + 10.0 * p.x,
                        200.0 + 5.0 * p.y,
                        300.0 + 4.0 * p.z,
                    ])));
                }
            }
        }
        LatticeTable::new(axes, cells).unwrap()
    }

    fn expected(p: Point) -> AngleTriple {
        AngleTriple([100.0 + 10.0 * p.x, 200.0 + 5.0 * p.y, 300.0 + 4.0 * p.z])
    }

    #[test]
    fn exact_for_affine_data() {
        let table = affine_table();
        for p in [
            Point::new(0.3, 0.1, -9.9),
            Point::new(1.75, -0.6, -9.6),
            Point::new(0.0, -1.0, -10.0),
        ] {
            let got = table.lookup(p).unwrap();
            assert!(got.max_abs_diff(&expected(p)) < 1e-9, "{p}: {got}");
        }
    }

    #[test]
    fn grid_points_reproduce_samples() {
        let table = affine_table();
        let p = Point::new(1.0, 1.0, -10.0);
        assert_eq!(table.lookup(p).unwrap(), table.get([1, 1, 0]).unwrap());
    }

    #[test]
    fn upper_bound_uses_last_cell() {
        let table = affine_table();
        let cell = lookup_cell(&table, Point::new(2.0, 1.0, -9.5)).unwrap();
        assert_eq!(cell.lower, [1, 0, 0]);
        assert_eq!(cell.upper, [2, 1, 1]);
        assert_eq!(cell.fraction, [1.0, 1.0, 1.0]);
        assert_eq!(cell.interpolate(), table.get([2, 1, 1]).unwrap());
    }

    #[test]
    fn out_of_bounds_names_axis() {
        let table = affine_table();
        assert_eq!(
            table.lookup(Point::new(2.01, 0.0, -9.7)),
            Err(NoSolution::OutOfTable {
                axis: Axis::X,
                value: 2.01,
                min: 0.0,
                max: 2.0
            })
        );
        assert!(matches!(
            table.lookup(Point::new(1.0, 0.0, -10.5)),
            Err(NoSolution::OutOfTable { axis: Axis::Z, .. })
        ));
        assert!(matches!(
            table.lookup(Point::new(1.0, f64::NAN, -9.7)),
            Err(NoSolution::OutOfTable { axis: Axis::Y, .. })
        ));
    }

    #[test]
    fn empty_corner_is_singular() {
        let axes = *affine_table().axes();
        let mut cells = affine_table().cells().to_vec();
        let hole = axes.flat_index([2, 1, 0]).unwrap();
        cells[hole] = None;
        let table = LatticeTable::new(axes, cells).unwrap();

        assert_eq!(
            table.lookup(Point::new(1.5, 0.0, -9.7)),
            Err(NoSolution::Singular {
                lower: [1, 0, 0],
                corner: [2, 1, 0]
            })
        );
        // cells that do not touch the hole still work
        assert!(table.lookup(Point::new(0.5, 0.0, -9.7)).is_ok());
    }

    #[test]
    fn single_point_axis() {
        let axes = TableAxes {
            x: AxisRange::new(0.0, 1.0, 1.0),
            y: AxisRange::new(0.0, 0.0, 1.0),
            z: AxisRange::new(-9.0, -9.0, 1.0),
        };
        let cells = vec![Some(AngleTriple([0.0; 3])), Some(AngleTriple([8.0; 3]))];
        let table = LatticeTable::new(axes, cells).unwrap();
        assert_eq!(
            table.lookup(Point::new(0.25, 0.0, -9.0)).unwrap(),
            AngleTriple([2.0; 3])
        );
        assert!(table.lookup(Point::new(0.25, 0.1, -9.0)).is_err());
    }
}
