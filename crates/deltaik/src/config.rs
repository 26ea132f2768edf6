use anyhow::{Context, Result};
use deltaik_core::{
    kinematics::DeltaGeometry, servo::ServoScale, table::TableAxes, workspace::Workspace,
};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Robot and tooling configuration.
///
/// Every section falls back to the stock robot, so an empty file is a
/// valid configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Link dimensions
    #[serde(default)]
    pub geometry: DeltaGeometry,

    /// Volume the effector is allowed to visit
    #[serde(default)]
    pub workspace: Workspace,

    /// Sampling grid for generated lookup tables
    #[serde(default)]
    pub table: TableAxes,

    #[serde(default)]
    pub servo: ServoConfig,

    #[serde(default)]
    pub solver: SolverConfig,
}

/// Servo bus configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServoConfig {
    /// Encoder ticks per degree of rotation
    #[serde(default = "default_ticks_per_degree")]
    pub ticks_per_degree: f64,

    /// Largest goal position the servos accept
    #[serde(default = "default_max_tick")]
    pub max_tick: u16,

    /// Bus ids of the servos driving actuators one, two and three
    #[serde(default = "default_servo_ids")]
    pub ids: Vec<u8>,
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            ticks_per_degree: default_ticks_per_degree(),
            max_tick: default_max_tick(),
            ids: default_servo_ids(),
        }
    }
}

impl ServoConfig {
    pub fn scale(&self) -> ServoScale {
        ServoScale {
            ticks_per_degree: self.ticks_per_degree,
            max_tick: self.max_tick,
        }
    }

    /// Ids in actuator order. Only meaningful after [`Config::validate`].
    pub fn actuator_ids(&self) -> Result<[u8; 3]> {
        self.ids
            .as_slice()
            .try_into()
            .with_context(|| format!("expected 3 servo ids, found {}", self.ids.len()))
    }
}

/// Which solver drives the robot
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SolverMode {
    #[default]
    Exact,
    Table,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SolverConfig {
    #[serde(default)]
    pub mode: SolverMode,

    /// Prebuilt table to load in `table` mode. Without one the table is
    /// sampled from `geometry` at startup.
    #[serde(default)]
    pub table_path: Option<PathBuf>,
}

fn default_ticks_per_degree() -> f64 {
    ServoScale::default().ticks_per_degree
}

fn default_max_tick() -> u16 {
    ServoScale::default().max_tick
}

fn default_servo_ids() -> Vec<u8> {
    vec![1, 2, 3]
}

impl Config {
    /// Load configuration from a file, auto-detecting TOML or JSON format
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        let extension = path.extension().and_then(|s| s.to_str());

        match extension {
            Some("toml") => Self::from_toml(&content),
            Some("json") => Self::from_json(&content),
            _ => {
                // Try TOML first (preferred), fall back to JSON
                Self::from_toml(&content).or_else(|_| Self::from_json(&content))
            }
        }
    }

    /// Load and validate, using the defaults when no file is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("failed to parse config as TOML")
    }

    /// Parse configuration from JSON string
    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).context("failed to parse config as JSON")
    }

    pub fn validate(&self) -> Result<()> {
        if !self.geometry.is_valid() {
            anyhow::bail!("geometry: arm lengths must be positive and radii finite");
        }

        if !self.workspace.is_valid() {
            anyhow::bail!("workspace: radius must be positive and z_min <= z_max");
        }

        self.table.validate().context("table")?;

        let servo = &self.servo;
        if !(servo.ticks_per_degree.is_finite() && servo.ticks_per_degree > 0.0) {
            anyhow::bail!("servo.ticks_per_degree must be positive");
        }
        if servo.ids.len() != 3 {
            anyhow::bail!(
                "servo.ids must list one id per actuator, found {}",
                servo.ids.len()
            );
        }
        for (i, id) in servo.ids.iter().enumerate() {
            if servo.ids[..i].contains(id) {
                anyhow::bail!("servo.ids contains {id} twice");
            }
        }

        Ok(())
    }
}
