use anyhow::Result;
use clap::Args;
use xshell::{Shell, cmd};

use super::common;

#[derive(Args)]
pub struct Precommit;

impl Precommit {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        common::run_fmt(sh, true)?;
        common::run_clippy(sh)?;

        // The recorded serial transcripts are quick and catch protocol drift
        eprintln!("Replaying serial transcripts...");
        cmd!(sh, "cargo test -p deltaik-serial --lib transcript_").run()?;

        eprintln!("Precommit checks passed!");
        Ok(())
    }
}
