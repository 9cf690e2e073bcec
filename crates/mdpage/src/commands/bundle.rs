//! `mdpage bundle` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdpage_config::{CliSettings, Config};
use mdpage_site::{BUNDLE_FILENAME, Corpus};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for the bundle command.
#[derive(Debug, Args)]
pub(crate) struct BundleArgs {
    /// Path to configuration file (default: auto-discover mdpage.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Markdown source directory (overrides config).
    #[arg(short, long)]
    source_dir: Option<PathBuf>,

    /// Bundle file to write (default: content.json in the output directory).
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl BundleArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            source_dir: self.source_dir,
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let bundle_path = self
            .output
            .unwrap_or_else(|| config.docs_resolved.output_dir.join(BUNDLE_FILENAME));

        let corpus = Corpus::load(&config.docs_resolved.source_dir)?;
        corpus.write_bundle(&bundle_path)?;

        output.success(&format!(
            "Bundled {} documents to {}",
            corpus.len(),
            bundle_path.display()
        ));
        Ok(())
    }
}
