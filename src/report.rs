//! Per-language pass accounting.
//!
//! Every language pass produces one `PassReport`. The counters answer the
//! questions an operator asks after a run: how many rows got a translation,
//! how many came back empty, and whether the pass was cut short.

use serde::Serialize;
use tracing::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PassReport {
    /// Language code of the pass
    pub language: String,

    /// Untranslated rows the pass started with
    pub rows_total: usize,

    /// Rows whose slot was filled
    pub rows_translated: usize,

    /// Rows that went through the oracle but came back without a translation
    pub rows_failed: usize,

    /// Rows never sent because the pass was aborted
    pub rows_skipped: usize,

    pub batches_total: usize,
    pub batches_succeeded: usize,
    pub batches_failed: usize,

    /// Why the pass stopped early, if it did
    pub aborted: Option<String>,
}

impl PassReport {
    pub fn new(language: impl Into<String>, rows_total: usize, batches_total: usize) -> Self {
        Self {
            language: language.into(),
            rows_total,
            batches_total,
            ..Self::default()
        }
    }

    /// Percentage of rows translated (0-100). An empty pass counts as complete.
    pub fn success_rate(&self) -> f64 {
        if self.rows_total == 0 {
            return 100.0;
        }
        (self.rows_translated as f64 / self.rows_total as f64) * 100.0
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    /// Every row translated and nothing cut short.
    pub fn is_complete(&self) -> bool {
        !self.is_aborted() && self.rows_translated == self.rows_total
    }

    pub fn log_summary(&self) {
        if let Some(reason) = &self.aborted {
            warn!(
                "[{}] Aborted after {}/{} batches: {}",
                self.language,
                self.batches_succeeded + self.batches_failed,
                self.batches_total,
                reason
            );
        }

        info!(
            "[{}] Translated {}/{} rows ({:.1}%), {} failed, {} skipped; batches: {} ok, {} failed",
            self.language,
            self.rows_translated,
            self.rows_total,
            self.success_rate(),
            self.rows_failed,
            self.rows_skipped,
            self.batches_succeeded,
            self.batches_failed
        );
    }
}
