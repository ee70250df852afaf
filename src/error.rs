//! Error taxonomy shared by the extraction, translation and upload passes.

use std::path::PathBuf;
use thiserror::Error;

/// Pre-flight failures: nothing has been done yet when one of these is raised.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} not set")]
    Missing(&'static str),

    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },

    #[error("required input not found: {}", .0.display())]
    MissingArtifact(PathBuf),

    #[error("unknown language code: '{0}'")]
    UnknownLanguage(String),
}

/// Failures returned by a translation oracle call.
#[derive(Debug, Error)]
pub enum OracleError {
    /// Credentials were rejected. Retrying cannot help and every later batch
    /// would fail the same way.
    #[error("oracle rejected credentials ({status}): {body}")]
    Auth { status: u16, body: String },

    #[error("oracle returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("oracle request failed: {0}")]
    Network(String),

    #[error("oracle call timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("oracle response contained no text")]
    EmptyResponse,

    #[error("failed to decode oracle response: {0}")]
    Decode(String),
}

impl OracleError {
    /// Fatal errors abort the remaining batches of a language pass.
    pub fn is_fatal(&self) -> bool {
        matches!(self, OracleError::Auth { .. })
    }

    /// Retry 429 and 5xx, network trouble, timeouts and garbled bodies.
    /// Other 4xx statuses fail the batch immediately.
    pub fn is_retryable(&self) -> bool {
        match self {
            OracleError::Auth { .. } => false,
            OracleError::Status { status, .. } => *status == 429 || *status >= 500,
            OracleError::Network(_)
            | OracleError::Timeout(_)
            | OracleError::EmptyResponse
            | OracleError::Decode(_) => true,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    #[error("no record with key '{0}'")]
    UnknownKey(String),

    #[error("slot '{language}' of '{key}' is already filled")]
    SlotAlreadyFilled { key: String, language: String },

    #[error("refusing to write an empty '{language}' slot for '{key}'")]
    EmptyValue { key: String, language: String },
}

#[derive(Debug, Error)]
pub enum TabularError {
    #[error("csv error in {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("io error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} has no '{column}' column", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage returned HTTP {status} for {file_name}: {body}")]
    Status {
        file_name: String,
        status: u16,
        body: String,
    },

    #[error("storage request for {file_name} failed: {message}")]
    Network { file_name: String, message: String },
}
