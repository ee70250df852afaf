//! Pass 1: source tree → keyed translation records.
//!
//! - `rules`: named extraction rules (element text, attributes, buttons)
//! - `scanner`: lazy walk of the source tree applying every rule
//! - `filter`: `should_ignore`, which rejects identifiers and expressions
//! - `keys`: key generation and module derivation

pub mod filter;
pub mod keys;
pub mod rules;
pub mod scanner;

pub use filter::should_ignore;
pub use keys::{module_from_path, slugify, KeyGenerator};
pub use rules::{default_rules, ExtractionRule, PatternRule, RawMatch};
pub use scanner::{Candidate, Scan, Scanner};

use crate::error::ConfigError;
use crate::store::{RecordStore, TranslationRecord};
use serde::Serialize;
use std::path::Path;
use tracing::{debug, info};

/// Adjustable extraction parameters.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Shortest element text kept, in characters
    pub min_length: usize,
    /// Longest element text kept, in characters
    pub max_length: usize,
    /// Attributes whose values are extracted
    pub attribute_names: Vec<String>,
    /// File extension to scan, without the dot
    pub extension: String,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_length: 4,
            max_length: 80,
            attribute_names: ["title", "placeholder", "label", "text"]
                .iter()
                .map(|name| name.to_string())
                .collect(),
            extension: "tsx".to_string(),
        }
    }
}

/// Counts reported at the end of an extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionSummary {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub candidates: usize,
    pub filtered: usize,
    pub duplicates: usize,
    pub unkeyable: usize,
    pub records: usize,
}

pub struct Extractor {
    scanner: Scanner,
    keys: KeyGenerator,
}

impl Extractor {
    pub fn new(config: &ExtractionConfig, keys: KeyGenerator) -> Result<Self, regex::Error> {
        Ok(Self {
            scanner: Scanner::new(default_rules(config)?, config.extension.clone()),
            keys,
        })
    }

    pub fn with_scanner(scanner: Scanner, keys: KeyGenerator) -> Self {
        Self { scanner, keys }
    }

    /// Scan `root` and build the record store, first occurrence of each key winning.
    pub fn extract(&self, root: &Path) -> Result<(RecordStore, ExtractionSummary), ConfigError> {
        if !root.is_dir() {
            return Err(ConfigError::MissingArtifact(root.to_path_buf()));
        }

        let mut store = RecordStore::new();
        let mut summary = ExtractionSummary::default();
        let mut scan = self.scanner.scan(root);

        for candidate in scan.by_ref() {
            summary.candidates += 1;
            if should_ignore(&candidate.text) {
                summary.filtered += 1;
                continue;
            }

            let relative = candidate.path.strip_prefix(root).unwrap_or(&candidate.path);
            let module = module_from_path(relative);
            let screen = candidate
                .path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or_default()
                .to_string();

            let key = self
                .keys
                .generate_key(&candidate.text, &module, &candidate.context);
            if key.ends_with('.') {
                debug!("No key for {:?} in {}", candidate.text, relative.display());
                summary.unkeyable += 1;
                continue;
            }

            if let Some(existing) = store.get(&key) {
                debug!(
                    "Duplicate key {}: keeping {:?}, dropping {:?} from {}",
                    key,
                    existing.source_text(),
                    candidate.text,
                    relative.display()
                );
                summary.duplicates += 1;
                continue;
            }

            store.upsert_if_absent(TranslationRecord::new(
                key,
                candidate.text,
                candidate.context,
                module,
                screen,
            ));
        }

        summary.files_scanned = scan.files_scanned();
        summary.files_skipped = scan.files_skipped();
        summary.records = store.len();

        info!(
            "Extracted {} unique strings from {} files ({} candidates, {} filtered, {} duplicate keys, {} skipped files)",
            summary.records,
            summary.files_scanned,
            summary.candidates,
            summary.filtered,
            summary.duplicates,
            summary.files_skipped
        );

        Ok((store, summary))
    }
}
