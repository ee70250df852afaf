//! Pass 1: scan a UI source tree and write the translation template.
//!
//! Usage:
//!   cargo run --bin extract                                  # scan ./src
//!   cargo run --bin extract -- --source app/src --output out/template.csv
//!   cargo run --bin extract -- --extension jsx --attribute aria-label
//!
//! No environment variables are required.

use anyhow::{Context, Result};
use clap::Parser;
use locale_harvest::error::ConfigError;
use locale_harvest::extract::{ExtractionConfig, Extractor, KeyGenerator};
use locale_harvest::i18n::LanguageRegistry;
use locale_harvest::tabular;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(version, about = "Extract UI strings into a keyed translation template")]
struct Args {
    /// Source tree to scan
    #[arg(long, default_value = "src")]
    source: PathBuf,

    /// Template file to write
    #[arg(long, default_value = "translations_template.csv")]
    output: PathBuf,

    /// File extension to scan
    #[arg(long, default_value = "tsx")]
    extension: String,

    /// Shortest element text kept
    #[arg(long, default_value_t = 4)]
    min_length: usize,

    /// Longest element text kept
    #[arg(long, default_value_t = 80)]
    max_length: usize,

    /// Attribute whose value is extracted (repeatable; replaces the defaults)
    #[arg(long = "attribute")]
    attributes: Vec<String>,
}

impl Args {
    fn extraction_config(&self) -> ExtractionConfig {
        let defaults = ExtractionConfig::default();
        ExtractionConfig {
            min_length: self.min_length,
            max_length: self.max_length,
            attribute_names: if self.attributes.is_empty() {
                defaults.attribute_names
            } else {
                self.attributes.clone()
            },
            extension: self.extension.clone(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Extraction failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_harvest=info".parse()?)
                .add_directive("extract=info".parse()?),
        )
        .init();

    if !args.source.is_dir() {
        return Err(ConfigError::MissingArtifact(args.source.clone()).into());
    }

    info!("Scanning {} for .{} files", args.source.display(), args.extension);

    let extractor = Extractor::new(&args.extraction_config(), KeyGenerator::default())
        .context("Invalid extraction pattern")?;
    let (store, summary) = extractor.extract(&args.source)?;

    tabular::write_template(&store, &LanguageRegistry::default(), &args.output)
        .context("Failed to write template")?;

    info!(
        "Template ready: {} keys from {} files -> {}",
        summary.records,
        summary.files_scanned,
        args.output.display()
    );
    Ok(())
}
