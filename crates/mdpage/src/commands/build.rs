//! `mdpage build` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdpage_config::{CliSettings, Config};
use mdpage_site::{BuildConfig, StaticSiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the build command.
#[derive(Debug, Args)]
pub(crate) struct BuildArgs {
    /// Path to configuration file (default: auto-discover mdpage.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Output directory for the generated site (overrides config).
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Site title (overrides config).
    #[arg(short, long, env = "MDPAGE_TITLE")]
    title: Option<String>,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            output_dir: self.output_dir,
            title: self.title,
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let build_config = BuildConfig::from(&config);

        output.info(&format!("Source: {}", build_config.source_dir.display()));
        output.info(&format!("Output: {}", build_config.output_dir.display()));

        let output_dir = build_config.output_dir.clone();
        let report = StaticSiteBuilder::new(build_config).build()?;

        for warning in &report.warnings {
            output.warning(&format!("Warning: {warning}"));
        }
        output.success(&format!(
            "Built {} pages to {}",
            report.pages_written,
            output_dir.display()
        ));
        Ok(())
    }
}
