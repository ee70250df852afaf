//! Translation key generation.
//!
//! Keys are `<module>.<slug>`, except for a fixed vocabulary of UI words
//! that live in a shared `common` namespace so every "Save" button points at
//! the same translation.

use regex::Regex;
use std::collections::HashMap;
use std::path::{Component, Path};
use std::sync::OnceLock;

pub const COMMON_MODULE: &str = "common";
pub const MAX_SLUG_LEN: usize = 50;

const MODULE_MARKERS: &[&str] = &["pages", "components"];

static NON_ALNUM_REGEX: OnceLock<Regex> = OnceLock::new();

const COMMON_VOCABULARY: &[(&str, &str)] = &[
    ("Save", "common.save"),
    ("Cancel", "common.cancel"),
    ("Delete", "common.delete"),
    ("Edit", "common.edit"),
    ("Add", "common.add"),
    ("Close", "common.close"),
    ("Confirm", "common.confirm"),
    ("Loading", "common.loading"),
    ("Error", "common.error"),
    ("Success", "common.success"),
    ("Search", "common.search"),
    ("Filter", "common.filter"),
    ("Export", "common.export"),
    ("Import", "common.import"),
    ("Refresh", "common.refresh"),
    ("Actions", "common.actions"),
    ("Status", "common.status"),
    ("Total", "common.total"),
    ("Active", "common.active"),
    ("Inactive", "common.inactive"),
    ("Yes", "common.yes"),
    ("No", "common.no"),
    ("Submit", "common.submit"),
    ("Reset", "common.reset"),
    ("Back", "common.back"),
    ("Next", "common.next"),
    ("Previous", "common.previous"),
    ("Continue", "common.continue"),
    ("Finish", "common.finish"),
    ("Select", "common.select"),
    ("Clear", "common.clear"),
    ("Apply", "common.apply"),
    ("Remove", "common.remove"),
    ("Update", "common.update"),
    ("Create", "common.create"),
    ("View", "common.view"),
    ("Download", "common.download"),
    ("Upload", "common.upload"),
];

/// Maps extracted text to translation keys.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    vocabulary: HashMap<String, String>,
}

impl KeyGenerator {
    /// Use a custom vocabulary instead of the built-in UI word list.
    pub fn with_vocabulary(vocabulary: HashMap<String, String>) -> Self {
        Self { vocabulary }
    }

    /// `context` is carried for provenance only; it never changes the key.
    pub fn generate_key(&self, text: &str, module: &str, _context: &str) -> String {
        if let Some(key) = self.vocabulary.get(text) {
            return key.clone();
        }
        format!("{}.{}", module, slugify(text))
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::with_vocabulary(
            COMMON_VOCABULARY
                .iter()
                .map(|(text, key)| (text.to_string(), key.to_string()))
                .collect(),
        )
    }
}

/// Lowercase, collapse every non-alphanumeric run to `_`, trim, truncate.
///
/// Returns an empty string for text with no ASCII letters or digits.
pub fn slugify(text: &str) -> String {
    let regex = NON_ALNUM_REGEX
        .get_or_init(|| Regex::new(r"[^a-z0-9]+").expect("slug pattern is valid"));

    let lowered = text.to_lowercase();
    let mut slug = regex
        .replace_all(&lowered, "_")
        .trim_matches('_')
        .to_string();
    // Only ASCII survives the replacement, so byte truncation is safe
    slug.truncate(MAX_SLUG_LEN);
    slug
}

/// Module of a source file: the segment after `pages/`, else after
/// `components/`, else `common`.
///
/// `path` should be relative to the scan root so that directories above the
/// project never count as markers.
pub fn module_from_path(path: &Path) -> String {
    let parts: Vec<&str> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect();

    for marker in MODULE_MARKERS {
        let Some(index) = parts.iter().position(|part| part == marker) else {
            continue;
        };
        let Some(segment) = parts.get(index + 1) else {
            continue;
        };

        // A file directly under the marker names its own module
        let segment = if index + 2 == parts.len() {
            Path::new(segment)
                .file_stem()
                .and_then(|stem| stem.to_str())
                .unwrap_or(segment)
        } else {
            segment
        };

        return normalize_module(segment);
    }

    COMMON_MODULE.to_string()
}

fn normalize_module(segment: &str) -> String {
    segment.to_lowercase().replace([' ', '-'], "_")
}
