use crate::{config::Config, solver::read_table};
use anyhow::Result;
use clap::Args;
use deltaik_core::{InverseKinematics, Point, kinematics::RotaryDeltaKin};
use std::{fmt::Write as _, path::PathBuf};

#[derive(Args)]
pub struct SolveArgs {
    /// Target x in inches.
    #[arg(allow_negative_numbers = true)]
    pub x: f64,

    /// Target y in inches.
    #[arg(allow_negative_numbers = true)]
    pub y: f64,

    /// Target z in inches, negative below the base.
    #[arg(allow_negative_numbers = true)]
    pub z: f64,

    /// Path to the configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Lookup table to compare against the exact solution.
    #[arg(long)]
    pub table: Option<PathBuf>,
}

impl SolveArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        print!("{}", self.report(&config)?);
        Ok(())
    }

    pub fn report(&self, config: &Config) -> Result<String> {
        let point = Point::new(self.x, self.y, self.z);
        let mut out = String::new();

        writeln!(out, "target: {point}")?;
        if !config.workspace.contains(point) {
            writeln!(out, "warning: outside the workspace")?;
        }

        let exact = RotaryDeltaKin::new(config.geometry).solve(point);
        match &exact {
            Ok(angles) => writeln!(out, "exact: {angles}")?,
            Err(reason) => writeln!(out, "exact: {reason}")?,
        }

        if let Some(path) = &self.table {
            let table = read_table(path, config.table)?;
            match table.solve(point) {
                Ok(approx) => {
                    writeln!(out, "table: {approx}")?;
                    if let Ok(angles) = &exact {
                        writeln!(out, "max difference: {:.6}", angles.max_abs_diff(&approx))?;
                    }
                }
                Err(reason) => writeln!(out, "table: {reason}")?,
            }
        }

        Ok(out)
    }
}
