use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use xshell::{Shell, cmd};

#[derive(Args)]
pub struct Table {
    /// Robot configuration to sample
    #[arg(long, default_value = "config/deltaik.toml")]
    config: PathBuf,

    /// Directory for the generated files
    #[arg(long, default_value = "target/tables")]
    out_dir: PathBuf,
}

impl Table {
    pub fn run(&self, sh: &Shell) -> Result<()> {
        let config = &self.config;
        sh.create_dir(&self.out_dir)?;

        for (name, format) in [("table.inc", "literal"), ("table.json", "json")] {
            let output = self.out_dir.join(name);
            eprintln!("Writing {}...", output.display());
            cmd!(
                sh,
                "cargo run --release -p deltaik -- build-table --config {config} --format {format} --output {output}"
            )
            .run()?;
        }

        Ok(())
    }
}
