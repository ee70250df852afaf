//! Pass 3: publish translation files to the storage bucket.
//!
//! Usage:
//!   cargo run --bin upload                            # en.csv es.csv fr.csv ar.csv
//!   cargo run --bin upload -- --bucket i18n out/*.csv
//!
//! Required environment variables:
//! - SUPABASE_URL
//! - SUPABASE_SERVICE_ROLE_KEY (or SUPABASE_ANON_KEY)
//!
//! Optional:
//! - SUPABASE_BUCKET (defaults to translations)

use anyhow::Result;
use clap::Parser;
use locale_harvest::config::StorageConfig;
use locale_harvest::storage::{upload_files, SupabaseStorage};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info};

#[derive(Debug, Parser)]
#[command(version, about = "Upload translation files to object storage")]
struct Args {
    /// Bucket name (overrides SUPABASE_BUCKET)
    #[arg(long)]
    bucket: Option<String>,

    /// Files to upload
    #[arg(default_values = ["en.csv", "es.csv", "fr.csv", "ar.csv"])]
    files: Vec<PathBuf>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    match run(args).await {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            error!("Upload failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> Result<bool> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("locale_harvest=info".parse()?)
                .add_directive("upload=info".parse()?),
        )
        .init();

    let mut config = StorageConfig::from_env()?;
    if let Some(bucket) = args.bucket {
        config.bucket = bucket;
    }

    let storage = SupabaseStorage::new(config);
    info!(
        "Uploading {} files to bucket '{}'",
        args.files.len(),
        storage.bucket()
    );

    let summary = upload_files(&storage, &args.files).await;
    Ok(summary.is_success())
}
