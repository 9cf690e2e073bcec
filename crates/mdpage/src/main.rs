//! mdpage CLI - Markdown documentation site generator.
//!
//! Provides commands for:
//! - `build`: Render the documentation site
//! - `convert`: Convert one markdown file to an HTML fragment
//! - `bundle`: Write the JSON content bundle

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, BundleArgs, ConvertArgs};
use output::Output;

/// mdpage - Markdown documentation site generator.
#[derive(Debug, Parser)]
#[command(name = "mdpage", version, about)]
struct Cli {
    /// Enable verbose output.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Build the static site from the markdown sources.
    Build(BuildArgs),
    /// Convert a single markdown file to an HTML fragment.
    Convert(ConvertArgs),
    /// Write the markdown sources as a JSON content bundle.
    Bundle(BundleArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Convert(args) => args.execute(),
        Commands::Bundle(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_with_overrides() {
        let cli = Cli::try_parse_from([
            "mdpage",
            "build",
            "--config",
            "mdpage.toml",
            "--source-dir",
            "MarkDown",
            "--output-dir",
            "public",
            "--title",
            "Guide",
            "-v",
        ])
        .unwrap();
        assert!(cli.verbose);
        assert!(matches!(cli.command, Commands::Build(_)));
    }

    #[test]
    fn test_convert_requires_file() {
        let result = Cli::try_parse_from(["mdpage", "convert"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_convert_with_output() {
        let cli = Cli::try_parse_from(["mdpage", "convert", "page.md", "-o", "page.html"]);
        assert!(cli.is_ok());
    }

    #[test]
    fn test_bundle_defaults() {
        let cli = Cli::try_parse_from(["mdpage", "bundle"]).unwrap();
        assert!(!cli.verbose);
        assert!(matches!(cli.command, Commands::Bundle(_)));
    }

    #[test]
    fn test_version_output() {
        let err = Cli::try_parse_from(["mdpage", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }
}
