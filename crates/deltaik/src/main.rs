use anyhow::Result;
use clap::{Parser, Subcommand};
use deltaik::cli;

fn main() -> Result<()> {
    deltaik::init_tracing();

    let cli = Cli::parse();
    match cli.command {
        Command::BuildTable(args) => args.run(),
        Command::Solve(args) => args.run(),
        Command::Drive(args) => args.run(),
    }
}

#[derive(Parser)]
#[command(name = "deltaik", about = "Inverse kinematics tooling for a rotary delta robot")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Sample the exact solver onto a lookup table.
    BuildTable(cli::build_table::BuildTableArgs),
    /// Solve one target, optionally comparing against a lookup table.
    Solve(cli::solve::SolveArgs),
    /// Run the operator loop: serial frames on stdin, servo commands on stdout.
    Drive(cli::drive::DriveArgs),
}
