use crate::error::ConfigError;
use crate::retry::RetryConfig;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_OPENAI_API_URL: &str = "https://api.openai.com/v1/chat/completions";
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_BUCKET: &str = "translations";

/// Credentials and endpoint for the translation oracle.
#[derive(Debug, Clone)]
pub struct OracleConfig {
    pub api_key: String,
    pub model: String,
    pub api_url: String,
    pub temperature: f32,
    pub timeout: Duration,
}

impl OracleConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            api_key: required("OPENAI_API_KEY")?,
            model: std::env::var("OPENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_MODEL.to_string()),
            api_url: std::env::var("OPENAI_API_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_API_URL.to_string()),
            temperature: parsed("OPENAI_TEMPERATURE", 0.3)?,
            timeout: Duration::from_secs(parsed("ORACLE_TIMEOUT_SECS", 60)?),
        })
    }
}

/// Knobs of the batch translation pass.
#[derive(Debug, Clone)]
pub struct TranslationConfig {
    /// Maximum rows per oracle request
    pub batch_size: usize,
    /// Upper bound on a single oracle call, retries excluded
    pub call_timeout: Duration,
    /// Consecutive failed batches after which a language pass is abandoned
    pub max_consecutive_failures: usize,
    /// Run language passes concurrently instead of one after another
    pub concurrent_languages: bool,
    pub retry: RetryConfig,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            batch_size: 20,
            call_timeout: Duration::from_secs(60),
            max_consecutive_failures: 3,
            concurrent_languages: false,
            retry: RetryConfig::api_call(),
        }
    }
}

impl TranslationConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let batch_size = parsed("TRANSLATION_BATCH_SIZE", defaults.batch_size)?;
        if batch_size == 0 {
            return Err(ConfigError::Invalid {
                var: "TRANSLATION_BATCH_SIZE",
                value: "0".to_string(),
            });
        }

        Ok(Self {
            batch_size,
            call_timeout: Duration::from_secs(parsed(
                "ORACLE_TIMEOUT_SECS",
                defaults.call_timeout.as_secs(),
            )?),
            max_consecutive_failures: parsed(
                "MAX_CONSECUTIVE_FAILURES",
                defaults.max_consecutive_failures,
            )?,
            concurrent_languages: parsed("CONCURRENT_LANGUAGES", false)?,
            retry: defaults.retry,
        })
    }
}

/// Target of the upload pass.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub url: String,
    pub key: String,
    pub bucket: String,
}

impl StorageConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let url = required("SUPABASE_URL")?;
        // Prefer the service role key; the anon key works for public buckets
        let key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .or_else(|_| std::env::var("SUPABASE_ANON_KEY"))
            .map_err(|_| ConfigError::Missing("SUPABASE_SERVICE_ROLE_KEY"))?;

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            key,
            bucket: std::env::var("SUPABASE_BUCKET").unwrap_or_else(|_| DEFAULT_BUCKET.to_string()),
        })
    }
}

fn required(var: &'static str) -> Result<String, ConfigError> {
    match std::env::var(var) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(var)),
    }
}

/// Unset falls back to the default; set-but-garbage is an error rather than
/// a silent default.
fn parsed<T: FromStr>(var: &'static str, default: T) -> Result<T, ConfigError> {
    match std::env::var(var) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { var, value }),
        Err(_) => Ok(default),
    }
}
