use crate::{
    bus::LineBus,
    config::Config,
    controller::{Controller, Outcome, Settings},
    solver::Solver,
};
use anyhow::{Context, Result};
use clap::Args;
use std::{
    io::{self, Read},
    path::PathBuf,
};

#[derive(Args)]
pub struct DriveArgs {
    /// Path to the configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Send every solved move without waiting for `y`.
    #[arg(long)]
    pub auto_confirm: bool,
}

impl DriveArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let settings = Settings {
            workspace: config.workspace,
            scale: config.servo.scale(),
            ids: config.servo.actuator_ids()?,
            auto_confirm: self.auto_confirm,
        };
        let solver = Solver::from_config(&config)?;
        tracing::info!(
            mode = ?config.solver.mode,
            auto_confirm = self.auto_confirm,
            "starting controller"
        );

        let mut controller = Controller::new(solver, LineBus::new(io::stdout()), settings);
        controller.home().context("failed to home servos")?;

        for byte in io::stdin().lock().bytes() {
            let byte = byte.context("failed to read stdin")?;
            match controller.feed(byte).context("servo bus write failed")? {
                None | Some(Outcome::Idle) => {}
                Some(outcome) => eprintln!("{outcome}"),
            }
        }

        tracing::info!("input closed");
        Ok(())
    }
}
