//! Solver selection and table files.

use crate::config::{Config, SolverMode};
use anyhow::{Context, Result};
use deltaik_core::{
    AngleTriple, InverseKinematics, NoSolution, Point,
    kinematics::RotaryDeltaKin,
    table::{LatticeTable, TableAxes, TableBuilder, literal},
};
use std::{fs, path::Path};

/// On-disk table formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum TableFormat {
    /// Nested brace initializer for firmware sources
    Literal,
    Json,
}

impl TableFormat {
    /// `.json` files are JSON, anything else is a literal
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|s| s.to_str()) {
            Some("json") => TableFormat::Json,
            _ => TableFormat::Literal,
        }
    }

    pub fn render(self, table: &LatticeTable) -> Result<String> {
        match self {
            TableFormat::Literal => Ok(literal::to_literal(table)),
            TableFormat::Json => table.to_json().context("failed to encode table as JSON"),
        }
    }
}

/// Read a table file. Literal files carry no axes, so they are read
/// against `axes`.
pub fn read_table(path: &Path, axes: TableAxes) -> Result<LatticeTable> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("failed to read table {}", path.display()))?;
    let table = match TableFormat::from_path(path) {
        TableFormat::Json => LatticeTable::from_json(&content)
            .with_context(|| format!("failed to parse table {}", path.display()))?,
        TableFormat::Literal => literal::from_literal(axes, &content)
            .with_context(|| format!("failed to parse table {}", path.display()))?,
    };
    tracing::info!(
        path = %path.display(),
        cells = table.cells().len(),
        reachable = table.reachable(),
        "loaded lookup table"
    );
    Ok(table)
}

pub fn build_table(config: &Config) -> Result<LatticeTable> {
    let kin = RotaryDeltaKin::new(config.geometry);
    TableBuilder::new(kin, config.table)
        .build()
        .context("failed to build lookup table")
}

/// The solver the controller runs
#[derive(Debug, Clone)]
pub enum Solver {
    Exact(RotaryDeltaKin),
    Table(LatticeTable),
}

impl Solver {
    pub fn from_config(config: &Config) -> Result<Self> {
        match config.solver.mode {
            SolverMode::Exact => Ok(Solver::Exact(RotaryDeltaKin::new(config.geometry))),
            SolverMode::Table => {
                let table = match &config.solver.table_path {
                    Some(path) => read_table(path, config.table)?,
                    None => build_table(config)?,
                };
                Ok(Solver::Table(table))
            }
        }
    }
}

impl InverseKinematics for Solver {
    fn solve(&self, point: Point) -> Result<AngleTriple, NoSolution> {
        match self {
            Solver::Exact(kin) => kin.solve(point),
            Solver::Table(table) => table.solve(point),
        }
    }
}
