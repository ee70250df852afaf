//! Pass 2: batch translation of untranslated records.
//!
//! Rows are sent to the oracle as numbered lists of at most `batch_size`
//! entries. The response is mapped back purely by position: line N goes to
//! row N. The oracle is never asked to echo keys, so a response that reorders
//! or merges lines will misalign silently; count mismatches are logged but
//! content is never checked.
//!
//! A batch either yields its lines or yields nothing. Transient failures leave
//! that batch's rows empty and the pass moves on; fatal failures (rejected
//! credentials, or too many failed batches in a row) end the language pass
//! while keeping whatever earlier batches produced.

use crate::config::TranslationConfig;
use crate::error::OracleError;
use crate::i18n::Language;
use crate::oracle::TranslationOracle;
use crate::report::PassReport;
use crate::retry::with_retry_if;
use crate::store::RecordStore;
use futures::future::join_all;
use tracing::{error, info, warn};

/// A row waiting for a translation, detached from the store.
#[derive(Debug, Clone)]
struct PendingRow {
    key: String,
    source_text: String,
}

/// Result of one language pass before it is written to the store.
#[derive(Debug)]
struct LanguageOutcome {
    report: PassReport,
    values: Vec<(String, String)>,
}

pub struct Orchestrator<O> {
    oracle: O,
    config: TranslationConfig,
    source_language: Language,
}

impl<O: TranslationOracle> Orchestrator<O> {
    pub fn new(oracle: O, config: TranslationConfig, source_language: Language) -> Self {
        Self {
            oracle,
            config,
            source_language,
        }
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    /// Fill `language` for every record that lacks it.
    pub async fn translate_all(&self, store: &mut RecordStore, language: &Language) -> PassReport {
        let rows = pending_rows(store, language);
        let outcome = self.translate_rows(&rows, language).await;
        apply(store, outcome)
    }

    /// Run one pass per language. With `concurrent_languages` the passes are
    /// driven together and their results written afterwards, one language at
    /// a time.
    pub async fn translate_languages(
        &self,
        store: &mut RecordStore,
        languages: &[Language],
    ) -> Vec<PassReport> {
        if !self.config.concurrent_languages {
            let mut reports = Vec::with_capacity(languages.len());
            for language in languages {
                reports.push(self.translate_all(store, language).await);
            }
            return reports;
        }

        let snapshots: Vec<Vec<PendingRow>> = languages
            .iter()
            .map(|language| pending_rows(store, language))
            .collect();

        let outcomes = join_all(
            languages
                .iter()
                .zip(&snapshots)
                .map(|(language, rows)| self.translate_rows(rows, language)),
        )
        .await;

        outcomes
            .into_iter()
            .map(|outcome| apply(store, outcome))
            .collect()
    }

    async fn translate_rows(&self, rows: &[PendingRow], language: &Language) -> LanguageOutcome {
        let batch_size = self.config.batch_size.max(1);
        let total_batches = rows.len().div_ceil(batch_size);
        let mut report = PassReport::new(language.code(), rows.len(), total_batches);
        let mut values = Vec::with_capacity(rows.len());
        let mut consecutive_failures = 0;

        info!(
            "Translating {} rows to {} in {} batches",
            rows.len(),
            language,
            total_batches
        );

        for (index, batch) in rows.chunks(batch_size).enumerate() {
            let batch_number = index + 1;
            info!(
                "[{}] Batch {}/{} ({} rows)",
                language.code(),
                batch_number,
                total_batches,
                batch.len()
            );

            match self.translate_batch(batch, language, batch_number).await {
                Ok(lines) => {
                    consecutive_failures = 0;
                    report.batches_succeeded += 1;

                    if lines.len() != batch.len() {
                        warn!(
                            "[{}] Batch {}: expected {} lines, got {}; assigning by position",
                            language.code(),
                            batch_number,
                            batch.len(),
                            lines.len()
                        );
                    }

                    let mut filled = 0;
                    for (row, line) in batch.iter().zip(lines) {
                        if !line.is_empty() {
                            values.push((row.key.clone(), line));
                            filled += 1;
                        }
                    }
                    report.rows_translated += filled;
                    report.rows_failed += batch.len() - filled;
                }
                Err(e) if e.is_fatal() => {
                    error!("[{}] Batch {} failed fatally: {}", language.code(), batch_number, e);
                    report.batches_failed += 1;
                    report.rows_failed += batch.len();
                    report.aborted = Some(e.to_string());
                    report.rows_skipped = rows.len() - (index * batch_size + batch.len());
                    break;
                }
                Err(e) => {
                    warn!(
                        "[{}] Batch {} failed, leaving {} rows empty: {}",
                        language.code(),
                        batch_number,
                        batch.len(),
                        e
                    );
                    report.batches_failed += 1;
                    report.rows_failed += batch.len();
                    consecutive_failures += 1;

                    let limit = self.config.max_consecutive_failures;
                    if limit > 0 && consecutive_failures >= limit {
                        error!(
                            "[{}] {} consecutive batches failed, abandoning language",
                            language.code(),
                            consecutive_failures
                        );
                        report.aborted = Some(format!(
                            "{} consecutive batches failed; last error: {}",
                            consecutive_failures, e
                        ));
                        report.rows_skipped = rows.len() - (index * batch_size + batch.len());
                        break;
                    }
                }
            }
        }

        LanguageOutcome { report, values }
    }

    async fn translate_batch(
        &self,
        batch: &[PendingRow],
        language: &Language,
        batch_number: usize,
    ) -> Result<Vec<String>, OracleError> {
        let texts: Vec<&str> = batch.iter().map(|row| row.source_text.as_str()).collect();
        let system = build_system_instruction(&self.source_language, language);
        let user = build_user_prompt(&texts, &self.source_language, language);
        let operation = format!("Translation to {} (batch {})", language.name(), batch_number);
        let timeout = self.config.call_timeout;

        let response = with_retry_if(
            &self.config.retry,
            &operation,
            || {
                let (system, user) = (system.as_str(), user.as_str());
                async move {
                    match tokio::time::timeout(timeout, self.oracle.submit(system, user)).await {
                        Ok(result) => result,
                        Err(_) => Err(OracleError::Timeout(timeout)),
                    }
                }
            },
            OracleError::is_retryable,
        )
        .await?;

        Ok(parse_response(&response))
    }
}

fn pending_rows(store: &RecordStore, language: &Language) -> Vec<PendingRow> {
    store
        .untranslated(language.code())
        .into_iter()
        .map(|record| PendingRow {
            key: record.key().to_string(),
            source_text: record.source_text().to_string(),
        })
        .collect()
}

fn apply(store: &mut RecordStore, outcome: LanguageOutcome) -> PassReport {
    let mut report = outcome.report;
    for (key, value) in outcome.values {
        if let Err(e) = store.set_slot(&key, &report.language, &value) {
            warn!("[{}] Translation not recorded: {}", report.language, e);
            report.rows_translated = report.rows_translated.saturating_sub(1);
            report.rows_failed += 1;
        }
    }
    report.log_summary();
    report
}

pub fn build_system_instruction(source: &Language, target: &Language) -> String {
    format!(
        "You are a professional translator specializing in software localization. \
         Translate {} to {} maintaining technical accuracy and UI conventions.",
        source.name(),
        target.prompt_name()
    )
}

/// Numbered-list prompt. Line breaks inside a text would shift every later
/// line of the answer, so they are flattened to spaces.
pub fn build_user_prompt(texts: &[&str], source: &Language, target: &Language) -> String {
    let mut prompt = format!(
        "Translate the following {} texts to {}.\n\
         Maintain technical terminology and context.\n\
         For UI elements, use standard {} conventions.\n\
         Return ONLY the translations, exactly one per line, in the same order as the input. \
         Do not add explanations, notes or any other text.\n\
         \n\
         Texts to translate:\n",
        source.name(),
        target.prompt_name(),
        target.name()
    );

    for (i, text) in texts.iter().enumerate() {
        let flattened = text.replace(['\r', '\n'], " ");
        prompt.push_str(&format!("{}. {}\n", i + 1, flattened));
    }
    prompt
}

/// Split an oracle answer into per-row lines, trimmed and with list
/// numbering removed.
///
/// Only leading and trailing blank lines are discarded. A blank line inside
/// the answer still occupies its row's position and comes back empty.
pub fn parse_response(raw: &str) -> Vec<String> {
    raw.trim()
        .lines()
        .map(|line| strip_numbering(line.trim()).to_string())
        .collect()
}

/// Remove a leading `N.` or `N)` marker followed by whitespace.
///
/// Text that merely starts with a number ("3D view", "2.5 GB free") is kept.
pub fn strip_numbering(line: &str) -> &str {
    let rest = line.trim_start_matches(|c: char| c.is_ascii_digit());
    if rest.len() == line.len() {
        return line;
    }

    let after_marker = match rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
        Some(after) => after,
        None => return line,
    };

    if after_marker.is_empty() || after_marker.starts_with(char::is_whitespace) {
        after_marker.trim_start()
    } else {
        line
    }
}
