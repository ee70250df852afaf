//! Language registry: the set of languages a pipeline run knows about.
//!
//! The registry is an ordinary immutable value. Binaries build one with
//! `LanguageRegistry::default()` and hand it to the components that need it,
//! so tests can run with their own language sets side by side.

use super::Language;
use crate::error::ConfigError;

#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: Vec<Language>,
    canonical: usize,
}

impl LanguageRegistry {
    /// Build a registry from an explicit list of languages.
    ///
    /// # Arguments
    /// * `languages` - Every supported language, in CSV column order
    ///
    /// # Returns
    /// * `Ok(LanguageRegistry)` when exactly one language is canonical and all
    ///   codes are unique
    /// * `Err(ConfigError::Invalid)` otherwise
    pub fn new(languages: Vec<Language>) -> Result<Self, ConfigError> {
        let canonical: Vec<usize> = languages
            .iter()
            .enumerate()
            .filter(|(_, lang)| lang.is_canonical())
            .map(|(i, _)| i)
            .collect();

        let canonical = match canonical.as_slice() {
            [index] => *index,
            _ => {
                return Err(ConfigError::Invalid {
                    var: "languages",
                    value: format!("{} canonical languages, expected 1", canonical.len()),
                })
            }
        };

        for (i, lang) in languages.iter().enumerate() {
            if languages[..i].iter().any(|other| other.code() == lang.code()) {
                return Err(ConfigError::Invalid {
                    var: "languages",
                    value: format!("duplicate code '{}'", lang.code()),
                });
            }
        }

        Ok(Self {
            languages,
            canonical,
        })
    }

    /// Get a language by its code.
    ///
    /// # Returns
    /// * `Ok(&Language)` if the language exists
    /// * `Err(ConfigError::UnknownLanguage)` if it is not registered
    pub fn get(&self, code: &str) -> Result<&Language, ConfigError> {
        self.languages
            .iter()
            .find(|lang| lang.code() == code)
            .ok_or_else(|| ConfigError::UnknownLanguage(code.to_string()))
    }

    pub fn canonical(&self) -> &Language {
        &self.languages[self.canonical]
    }

    /// All non-canonical languages, in registry order.
    pub fn targets(&self) -> Vec<&Language> {
        self.languages
            .iter()
            .filter(|lang| !lang.is_canonical())
            .collect()
    }

    /// Resolve a comma-separated list such as `"es,fr"` into target languages.
    ///
    /// Whitespace around codes and empty entries are ignored, and the result
    /// keeps the order of the input.
    ///
    /// # Arguments
    /// * `codes` - Language codes as given on the command line
    ///
    /// # Returns
    /// * `Ok(Vec<Language>)` with one entry per listed code
    /// * `Err(ConfigError::UnknownLanguage)` for a code the registry lacks
    /// * `Err(ConfigError::Invalid)` if the canonical language is listed
    pub fn parse_targets(&self, codes: &str) -> Result<Vec<Language>, ConfigError> {
        codes
            .split(',')
            .map(str::trim)
            .filter(|code| !code.is_empty())
            .map(|code| {
                let lang = self.get(code)?;
                if lang.is_canonical() {
                    return Err(ConfigError::Invalid {
                        var: "languages",
                        value: format!("'{}' is the source language", code),
                    });
                }
                Ok(lang.clone())
            })
            .collect()
    }
}

impl Default for LanguageRegistry {
    /// English source with Spanish, French and Arabic targets.
    fn default() -> Self {
        Self {
            languages: vec![
                Language::new("en", "English").canonical(),
                Language::new("es", "Spanish"),
                Language::new("fr", "French"),
                Language::new("ar", "Arabic")
                    .with_prompt_name("Modern Standard Arabic (العربية الفصحى)"),
            ],
            canonical: 0,
        }
    }
}
