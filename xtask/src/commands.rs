use anyhow::Result;
use clap::Subcommand;
use xshell::Shell;

pub mod ci;
pub mod common;
pub mod fmt;
pub mod precommit;
pub mod table;

#[derive(Subcommand)]
pub enum Command {
    /// Run CI checks (fmt, clippy, bench build, test). Runs all if no subcommand specified.
    Ci(ci::Ci),
    /// Apply rustfmt to all files
    Fmt(fmt::Fmt),
    /// Run precommit checks (rustfmt, clippy and the framing transcripts)
    Precommit(precommit::Precommit),
    /// Generate lookup tables in every format under target/tables
    Table(table::Table),
    /// Run tests
    Test(test::Test),
}

impl Command {
    pub fn run(self, sh: &Shell) -> Result<()> {
        match self {
            Command::Ci(cmd) => cmd.run(sh),
            Command::Fmt(cmd) => cmd.run(sh),
            Command::Precommit(cmd) => cmd.run(sh),
            Command::Table(cmd) => cmd.run(sh),
            Command::Test(cmd) => cmd.run(sh),
        }
    }
}
