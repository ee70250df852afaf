//! A single supported language and the wording used to address it in prompts.

use serde::Serialize;
use std::fmt;

/// A language the pipeline can emit a column for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Language {
    /// ISO 639-1 code, also used as the CSV column name (e.g. "fr")
    code: String,

    /// English name of the language (e.g. "French")
    name: String,

    /// How the oracle is told which variant to produce.
    /// Usually the same as `name`; Arabic asks for the standard written form.
    prompt_name: String,

    /// Whether this is the source language records are extracted in
    is_canonical: bool,
}

impl Language {
    /// Create a non-canonical language whose prompt name is its English name.
    ///
    /// # Arguments
    /// * `code` - ISO 639-1 code (e.g. "es")
    /// * `name` - English name (e.g. "Spanish")
    pub fn new(code: impl Into<String>, name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            code: code.into(),
            prompt_name: name.clone(),
            name,
            is_canonical: false,
        }
    }

    /// Override the name used in oracle prompts (e.g. to request a specific
    /// written standard).
    pub fn with_prompt_name(mut self, prompt_name: impl Into<String>) -> Self {
        self.prompt_name = prompt_name.into();
        self
    }

    /// Mark this as the source language. A registry accepts exactly one.
    pub fn canonical(mut self) -> Self {
        self.is_canonical = true;
        self
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn prompt_name(&self) -> &str {
        &self.prompt_name
    }

    pub fn is_canonical(&self) -> bool {
        self.is_canonical
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_name_defaults_to_name() {
        let french = Language::new("fr", "French");
        assert_eq!(french.code(), "fr");
        assert_eq!(french.name(), "French");
        assert_eq!(french.prompt_name(), "French");
        assert!(!french.is_canonical());
    }

    #[test]
    fn test_builder_overrides() {
        let arabic = Language::new("ar", "Arabic").with_prompt_name("Modern Standard Arabic");
        assert_eq!(arabic.name(), "Arabic");
        assert_eq!(arabic.prompt_name(), "Modern Standard Arabic");

        let english = Language::new("en", "English").canonical();
        assert!(english.is_canonical());
    }

    #[test]
    fn test_display() {
        assert_eq!(Language::new("es", "Spanish").to_string(), "Spanish (es)");
    }
}
