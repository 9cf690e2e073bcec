//! `mdpage convert` command implementation.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::Args;

use crate::error::CliError;

/// Arguments for the convert command.
#[derive(Debug, Args)]
pub(crate) struct ConvertArgs {
    /// Markdown file to convert.
    file: PathBuf,

    /// Write the HTML fragment here instead of stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl ConvertArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let html = convert_file(&self.file)?;

        match &self.output {
            Some(path) => fs::write(path, &html)?,
            None => {
                let mut stdout = std::io::stdout().lock();
                stdout.write_all(html.as_bytes())?;
                if !html.ends_with('\n') {
                    stdout.write_all(b"\n")?;
                }
            }
        }
        tracing::info!(file = %self.file.display(), bytes = html.len(), "Converted");
        Ok(())
    }
}

/// Read `path` and convert its markdown to an HTML fragment.
fn convert_file(path: &Path) -> Result<String, CliError> {
    let markdown = fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(mdpage_converter::convert(&markdown))
}
