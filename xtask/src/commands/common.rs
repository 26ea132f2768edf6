use anyhow::Result;
use xshell::{Shell, cmd};

/// Run rustfmt. With `check` set, files are left untouched and any
/// difference fails the command.
pub fn run_fmt(sh: &Shell, check: bool) -> Result<()> {
    if check {
        eprintln!("Running cargo fmt check...");
        cmd!(sh, "cargo fmt --all -- --check").run()?;
    } else {
        eprintln!("Applying cargo fmt...");
        cmd!(sh, "cargo fmt --all").run()?;
    }
    Ok(())
}

/// Run clippy with all warnings treated as errors
pub fn run_clippy(sh: &Shell) -> Result<()> {
    eprintln!("Running cargo clippy...");
    cmd!(
        sh,
        "cargo clippy --all-features --all-targets --workspace -- -D warnings"
    )
    .run()?;
    Ok(())
}

/// Compile the criterion benches without running them
pub fn check_benches(sh: &Shell) -> Result<()> {
    eprintln!("Building benches...");
    cmd!(sh, "cargo bench --workspace --no-run").run()?;
    Ok(())
}

/// Run the workspace tests, forwarding extra arguments to cargo
pub fn run_tests(sh: &Shell, args: &[String]) -> Result<()> {
    eprintln!("Running cargo test...");
    cmd!(sh, "cargo test --workspace {args...}").run()?;
    Ok(())
}
