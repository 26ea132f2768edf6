use crate::{
    config::Config,
    solver::{TableFormat, build_table},
};
use anyhow::{Context, Result};
use clap::Args;
use std::{fs, io::Write, path::PathBuf};

#[derive(Args)]
pub struct BuildTableArgs {
    /// Path to the configuration file (TOML or JSON).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Output format.
    ///
    /// Defaults to JSON for `.json` outputs and the brace literal otherwise.
    #[arg(long, value_enum)]
    pub format: Option<TableFormat>,

    /// File to write. Defaults to stdout.
    #[arg(long)]
    pub output: Option<PathBuf>,
}

impl BuildTableArgs {
    pub fn run(&self) -> Result<()> {
        let config = Config::load(self.config.as_deref())?;
        let table = build_table(&config)?;

        let format = self.format.unwrap_or_else(|| match &self.output {
            Some(path) => TableFormat::from_path(path),
            None => TableFormat::Literal,
        });
        let rendered = format.render(&table)?;

        match &self.output {
            Some(output) => {
                if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                    fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create output directory {}", parent.display())
                    })?;
                }
                fs::write(output, rendered)
                    .with_context(|| format!("failed to write {}", output.display()))?;
                tracing::info!(path = %output.display(), ?format, "wrote lookup table");
            }
            None => {
                std::io::stdout()
                    .lock()
                    .write_all(rendered.as_bytes())
                    .context("failed to write table to stdout")?;
            }
        }

        Ok(())
    }
}
