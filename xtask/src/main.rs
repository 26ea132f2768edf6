use anyhow::{Context, Result};
use clap::Parser;
use std::path::Path;
use xshell::Shell;

mod commands;

#[derive(Parser)]
#[command(name = "xtask", about = "Developer tasks for the deltaik workspace")]
struct Cli {
    #[command(subcommand)]
    command: commands::Command,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let sh = Shell::new()?;

    // run from the workspace root regardless of where cargo was invoked
    let root = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .context("xtask has no parent directory")?;
    sh.change_dir(root);

    cli.command.run(&sh)
}
