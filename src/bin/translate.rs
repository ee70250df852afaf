//! Pass 2: fill the target languages of a template through the oracle.
//!
//! Writes `<lang>.csv` for every language, `translations_complete_all.csv`
//! and a JSON `translation_report.json` with the per-language counts.
//!
//! Usage:
//!   cargo run --bin translate                                   # all targets
//!   cargo run --bin translate -- --languages es,fr --batch-size 10
//!   cargo run --bin translate -- --menu --input menu_en.csv     # key,translation input
//!
//! Required environment variables:
//! - OPENAI_API_KEY
//!
//! Optional:
//! - OPENAI_MODEL (defaults to gpt-4.1-mini)
//! - OPENAI_API_URL (defaults to the OpenAI chat completions endpoint)
//! - OPENAI_TEMPERATURE (defaults to 0.3)
//! - ORACLE_TIMEOUT_SECS (defaults to 60)
//! - TRANSLATION_BATCH_SIZE (defaults to 20)
//! - MAX_CONSECUTIVE_FAILURES (defaults to 3, 0 disables)
//! - CONCURRENT_LANGUAGES (defaults to false)

use anyhow::{Context, Result};
use clap::Parser;
use locale_harvest::config::{OracleConfig, TranslationConfig};
use locale_harvest::error::ConfigError;
use locale_harvest::i18n::{Language, LanguageRegistry};
use locale_harvest::oracle::OpenAiOracle;
use locale_harvest::orchestrator::Orchestrator;
use locale_harvest::report::PassReport;
use locale_harvest::store::{RecordStore, TranslationRecord};
use locale_harvest::tabular;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(version, about = "Batch-translate a translation template")]
struct Args {
    /// Template (or `key,translation` file with --menu) to translate
    #[arg(long, default_value = "translations_template.csv")]
    input: PathBuf,

    /// Comma-separated target language codes
    #[arg(long, default_value = "es,fr,ar")]
    languages: String,

    /// Rows per oracle request (overrides TRANSLATION_BATCH_SIZE)
    #[arg(long)]
    batch_size: Option<usize>,

    /// Directory for the output files
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Translate all languages concurrently
    #[arg(long)]
    concurrent: bool,

    /// Treat the input as English `key,translation` rows and write
    /// menu_translations_<lang>.csv files only
    #[arg(long)]
    menu: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Translation failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every language pass ran to the end.
async fn run(args: Args) -> Result<bool> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_harvest=info".parse()?)
                .add_directive("translate=info".parse()?),
        )
        .init();

    let registry = LanguageRegistry::default();
    let targets = registry.parse_targets(&args.languages)?;
    if targets.is_empty() {
        anyhow::bail!("No target languages given");
    }

    if !args.input.is_file() {
        return Err(ConfigError::MissingArtifact(args.input.clone()).into());
    }

    let oracle_config = OracleConfig::from_env()?;
    let mut config = TranslationConfig::from_env()?;
    if let Some(batch_size) = args.batch_size {
        if batch_size == 0 {
            anyhow::bail!("--batch-size must be at least 1");
        }
        config.batch_size = batch_size;
    }
    config.concurrent_languages |= args.concurrent;

    info!(
        "Translating {} into {} with {} (batch size {}, {})",
        args.input.display(),
        targets
            .iter()
            .map(|lang| lang.code())
            .collect::<Vec<_>>()
            .join(", "),
        oracle_config.model,
        config.batch_size,
        if config.concurrent_languages {
            "concurrent"
        } else {
            "sequential"
        }
    );

    let oracle = OpenAiOracle::new(oracle_config).context("Failed to build oracle client")?;
    let orchestrator = Orchestrator::new(oracle, config, registry.canonical().clone());

    let reports = if args.menu {
        translate_menu(&orchestrator, &args, &targets).await?
    } else {
        translate_template(&orchestrator, &args, &registry, &targets).await?
    };

    let aborted: Vec<&PassReport> = reports.iter().filter(|r| r.is_aborted()).collect();
    for report in &aborted {
        warn!(
            "[{}] incomplete: {}",
            report.language,
            report.aborted.as_deref().unwrap_or_default()
        );
    }

    let total: usize = reports.iter().map(|r| r.rows_translated).sum();
    info!(
        "Done: {} translations across {} languages, {} aborted",
        total,
        reports.len(),
        aborted.len()
    );

    Ok(aborted.is_empty())
}

async fn translate_template(
    orchestrator: &Orchestrator<OpenAiOracle>,
    args: &Args,
    registry: &LanguageRegistry,
    targets: &[Language],
) -> Result<Vec<PassReport>> {
    let mut store = tabular::read_records(&args.input, registry)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;

    let reports = orchestrator.translate_languages(&mut store, targets).await;

    // Artifacts are written even when a language aborted
    let canonical = registry.canonical();
    for language in std::iter::once(canonical).chain(targets) {
        let path = args.out_dir.join(format!("{}.csv", language.code()));
        tabular::write_language(&store, language, &path)?;
    }
    tabular::write_combined(
        &store,
        registry,
        &args.out_dir.join("translations_complete_all.csv"),
    )?;

    let report_path = args.out_dir.join("translation_report.json");
    std::fs::write(&report_path, serde_json::to_string_pretty(&reports)?)
        .with_context(|| format!("Failed to write {}", report_path.display()))?;

    Ok(reports)
}

async fn translate_menu(
    orchestrator: &Orchestrator<OpenAiOracle>,
    args: &Args,
    targets: &[Language],
) -> Result<Vec<PassReport>> {
    let mut store = menu_store(&args.input)?;
    info!("Loaded {} menu entries", store.len());

    let reports = orchestrator.translate_languages(&mut store, targets).await;

    for language in targets {
        let path = args
            .out_dir
            .join(format!("menu_translations_{}.csv", language.code()));
        tabular::write_language(&store, language, &path)?;
    }

    Ok(reports)
}

fn menu_store(path: &Path) -> Result<RecordStore> {
    let rows = tabular::read_language_file(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let mut store = RecordStore::new();
    for (key, text) in rows {
        if text.trim().is_empty() {
            continue;
        }
        let module = key.split('.').next().unwrap_or_default().to_string();
        store.upsert_if_absent(TranslationRecord::new(key, text, "menu", module, ""));
    }
    Ok(store)
}
