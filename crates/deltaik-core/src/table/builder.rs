// Sampling a solver onto a lattice

use crate::{
    kinematics::InverseKinematics,
    table::{LatticeTable, TableAxes, TableCell, TableError},
};

/// Fills a [`LatticeTable`] by running a solver at every grid point.
#[derive(Clone, Debug)]
pub struct TableBuilder<K> {
    solver: K,
    axes: TableAxes,
}

impl<K: InverseKinematics> TableBuilder<K> {
    pub fn new(solver: K, axes: TableAxes) -> Self {
        Self { solver, axes }
    }

    pub fn axes(&self) -> &TableAxes {
        &self.axes
    }

    pub fn build(&self) -> Result<LatticeTable, TableError> {
        self.axes.validate()?;
        let [nx, ny, nz] = self.axes.dims();
        tracing::info!(nx, ny, nz, "sampling lookup table");

        let mut cells: Vec<TableCell> = Vec::with_capacity(self.axes.cell_count());
        for i in 0..nx {
            let before = cells.len();
            for j in 0..ny {
                for k in 0..nz {
                    let point = self.axes.point([i, j, k]);
                    cells.push(self.solver.solve(point).ok());
                }
            }
            let holes = cells[before..].iter().filter(|c| c.is_none()).count();
            tracing::debug!(x = self.axes.x.coord(i), holes, "sampled slab");
        }

        let table = LatticeTable::new(self.axes, cells)?;
        tracing::info!(
            cells = table.cells().len(),
            reachable = table.reachable(),
            "lookup table ready"
        );
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        kinematics::{AngleTriple, Point, RotaryDeltaKin},
        table::AxisRange,
        workspace::Workspace,
        NoSolution,
    };

    struct Planar;

    impl InverseKinematics for Planar {
        fn solve(&self, p: Point) -> Result<AngleTriple, NoSolution> {
            if p.x < 0.0 {
                return Err(NoSolution::Unreachable {
                    actuator: crate::Actuator::One,
                });
            }
            Ok(AngleTriple([p.x, p.y, p.z]))
        }
    }

    #[test]
    fn cells_follow_x_major_order() {
        let axes = TableAxes {
            x: AxisRange::new(-1.0, 1.0, 1.0),
            y: AxisRange::new(0.0, 1.0, 1.0),
            z: AxisRange::new(-9.0, -8.0, 1.0),
        };
        let table = TableBuilder::new(Planar, axes).build().unwrap();
        assert_eq!(table.cells().len(), 12);
        assert_eq!(table.reachable(), 8);
        assert_eq!(table.get([0, 0, 0]), None);
        assert_eq!(table.get([2, 1, 0]), Some(AngleTriple([1.0, 1.0, -9.0])));
        assert_eq!(table.get([1, 1, 1]), Some(AngleTriple([0.0, 1.0, -8.0])));
    }

    #[test]
    fn rejects_invalid_axes() {
        let mut axes = TableAxes::default();
        axes.z.resolution = -0.25;
        assert!(TableBuilder::new(Planar, axes).build().is_err());
    }

    #[test]
    fn default_table_holes_stay_outside_workspace() {
        let axes = TableAxes::default();
        let table = TableBuilder::new(RotaryDeltaKin::default(), axes)
            .build()
            .unwrap();
        let workspace = Workspace::default();
        let [nx, ny, nz] = axes.dims();
        let mut holes = 0;
        for i in 0..nx {
            for j in 0..ny {
                for k in 0..nz {
                    if table.get([i, j, k]).is_none() {
                        holes += 1;
                        assert!(!workspace.contains(axes.point([i, j, k])));
                    }
                }
            }
        }
        assert_eq!(holes, 150);
        assert!(table.get([0, 0, 0]).is_none());
    }
}
