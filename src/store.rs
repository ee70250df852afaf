//! In-memory record store: translation key → record, in first-seen order.

use crate::error::StoreError;
use indexmap::IndexMap;
use serde::Serialize;
use std::collections::BTreeMap;

/// One translatable string and its per-language slots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TranslationRecord {
    key: String,
    source_text: String,
    /// Language code → translation. Absent means untranslated.
    slots: BTreeMap<String, String>,
    context: String,
    origin_module: String,
    origin_screen: String,
}

impl TranslationRecord {
    pub fn new(
        key: impl Into<String>,
        source_text: impl Into<String>,
        context: impl Into<String>,
        origin_module: impl Into<String>,
        origin_screen: impl Into<String>,
    ) -> Self {
        Self {
            key: key.into(),
            source_text: source_text.into(),
            slots: BTreeMap::new(),
            context: context.into(),
            origin_module: origin_module.into(),
            origin_screen: origin_screen.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn source_text(&self) -> &str {
        &self.source_text
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn origin_module(&self) -> &str {
        &self.origin_module
    }

    pub fn origin_screen(&self) -> &str {
        &self.origin_screen
    }

    pub fn slot(&self, language: &str) -> Option<&str> {
        self.slots.get(language).map(String::as_str)
    }

    pub fn slots(&self) -> &BTreeMap<String, String> {
        &self.slots
    }

    pub fn is_translated(&self, language: &str) -> bool {
        self.slots.contains_key(language)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordStore {
    records: IndexMap<String, TranslationRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert `record` unless its key is taken. Returns whether it was inserted;
    /// the existing record is never touched.
    pub fn upsert_if_absent(&mut self, record: TranslationRecord) -> bool {
        if self.records.contains_key(&record.key) {
            return false;
        }
        self.records.insert(record.key.clone(), record);
        true
    }

    pub fn get(&self, key: &str) -> Option<&TranslationRecord> {
        self.records.get(key)
    }

    /// Fill one language slot. Each slot is written at most once and never
    /// with an empty value.
    pub fn set_slot(&mut self, key: &str, language: &str, value: &str) -> Result<(), StoreError> {
        let record = self
            .records
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownKey(key.to_string()))?;

        if value.is_empty() {
            return Err(StoreError::EmptyValue {
                key: key.to_string(),
                language: language.to_string(),
            });
        }
        if record.slots.contains_key(language) {
            return Err(StoreError::SlotAlreadyFilled {
                key: key.to_string(),
                language: language.to_string(),
            });
        }

        record.slots.insert(language.to_string(), value.to_string());
        Ok(())
    }

    /// Records still missing `language`, in insertion order.
    pub fn untranslated(&self, language: &str) -> Vec<&TranslationRecord> {
        self.records
            .values()
            .filter(|record| !record.is_translated(language))
            .collect()
    }

    pub fn in_insertion_order(&self) -> impl Iterator<Item = &TranslationRecord> {
        self.records.values()
    }

    pub fn sorted_by_key(&self) -> Vec<&TranslationRecord> {
        let mut records: Vec<&TranslationRecord> = self.records.values().collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));
        records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
