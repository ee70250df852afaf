use crate::config::StorageConfig;
use crate::error::StorageError;
use std::future::Future;
use std::path::{Path, PathBuf};
use tracing::{error, info};

/// Object storage that keeps exported artifacts. A `put` with an existing
/// name overwrites it.
pub trait BlobSink {
    fn put(
        &self,
        file_name: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> impl Future<Output = Result<(), StorageError>> + Send;
}

/// Supabase Storage bucket.
#[derive(Debug, Clone)]
pub struct SupabaseStorage {
    client: reqwest::Client,
    config: StorageConfig,
}

impl SupabaseStorage {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    pub fn bucket(&self) -> &str {
        &self.config.bucket
    }

    fn object_url(&self, file_name: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url, self.config.bucket, file_name
        )
    }
}

impl BlobSink for SupabaseStorage {
    async fn put(&self, file_name: &str, bytes: Vec<u8>, content_type: &str) -> Result<(), StorageError> {
        let response = self
            .client
            .post(self.object_url(file_name))
            .header("Authorization", format!("Bearer {}", self.config.key))
            .header("apikey", &self.config.key)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Network {
                file_name: file_name.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StorageError::Status {
                file_name: file_name.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(())
    }
}

/// Outcome of an upload run.
#[derive(Debug, Default)]
pub struct UploadSummary {
    pub uploaded: Vec<String>,
    pub missing: Vec<PathBuf>,
    pub failed: Vec<(String, String)>,
}

impl UploadSummary {
    pub fn is_success(&self) -> bool {
        self.missing.is_empty() && self.failed.is_empty()
    }
}

/// Upload each file under its own file name. Missing files and failed
/// uploads are recorded and the rest still go out.
pub async fn upload_files<S: BlobSink>(sink: &S, files: &[PathBuf]) -> UploadSummary {
    let mut summary = UploadSummary::default();

    for path in files {
        let file_name = match path.file_name().and_then(|name| name.to_str()) {
            Some(name) => name.to_string(),
            None => {
                error!("Not a file path: {}", path.display());
                summary.missing.push(path.clone());
                continue;
            }
        };

        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Cannot read {}: {}", path.display(), e);
                summary.missing.push(path.clone());
                continue;
            }
        };

        let size = bytes.len();
        match sink.put(&file_name, bytes, content_type(path)).await {
            Ok(()) => {
                info!("Uploaded {} ({} bytes)", file_name, size);
                summary.uploaded.push(file_name);
            }
            Err(e) => {
                error!("Upload of {} failed: {}", file_name, e);
                summary.failed.push((file_name, e.to_string()));
            }
        }
    }

    info!(
        "Upload finished: {} uploaded, {} missing, {} failed",
        summary.uploaded.len(),
        summary.missing.len(),
        summary.failed.len()
    );
    summary
}

fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("csv") => "text/csv",
        Some("json") => "application/json",
        _ => "application/octet-stream",
    }
}
