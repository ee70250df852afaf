//! Extraction rules.
//!
//! Each rule finds one kind of user-facing text in a file's raw content and
//! labels its matches with a context tag. Rules know nothing about each
//! other; the scanner runs all of them over every file.

use super::ExtractionConfig;
use regex::Regex;

/// A piece of text found by a rule, before filtering.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub text: String,
    pub context: String,
}

pub trait ExtractionRule: Send + Sync {
    /// Tag attached to every match of this rule (e.g. `jsx_text`).
    fn context(&self) -> &str;

    /// All matches in `content`, in document order. Overlaps with other rules
    /// are expected.
    fn matches(&self, content: &str) -> Vec<RawMatch>;
}

/// A rule backed by a regex whose first capture group is the text.
#[derive(Debug, Clone)]
pub struct PatternRule {
    context: String,
    regex: Regex,
    /// Inclusive character-length bounds on the trimmed capture
    bounds: Option<(usize, usize)>,
}

impl PatternRule {
    pub fn new(context: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            context: context.into(),
            regex: Regex::new(pattern)?,
            bounds: None,
        })
    }

    pub fn with_bounds(mut self, min: usize, max: usize) -> Self {
        self.bounds = Some((min, max));
        self
    }

    /// Single-line text between `>` and the next `<` that starts with an
    /// uppercase letter and holds no braces. Whitespace and line breaks on
    /// either side of the text are allowed.
    pub fn element_text(min_length: usize, max_length: usize) -> Result<Self, regex::Error> {
        Ok(Self::new("jsx_text", r">\s*([A-Z][^<>{}\n]*?)\s*<")?.with_bounds(min_length, max_length))
    }

    /// `name="value"` or `name='value'`.
    pub fn attribute(name: &str) -> Result<Self, regex::Error> {
        let pattern = format!(r#"\b{}=["']([^"']+)["']"#, regex::escape(name));
        Self::new(attribute_context(name), &pattern)
    }

    /// Text content of a `<button>` element.
    pub fn button() -> Result<Self, regex::Error> {
        Self::new(
            "button",
            r"<button[^>]*>\s*([A-Z][^<>{}]{2,40})\s*</button>",
        )
    }

    /// Text content of an element styled as a button through its class name.
    pub fn button_class() -> Result<Self, regex::Error> {
        Self::new(
            "button_class",
            r#"className="[^"]*button[^"]*"[^>]*>\s*([A-Z][^<>{}]{2,40})\s*<"#,
        )
    }

    fn within_bounds(&self, text: &str) -> bool {
        match self.bounds {
            Some((min, max)) => {
                let len = text.chars().count();
                len >= min && len <= max
            }
            None => true,
        }
    }
}

impl ExtractionRule for PatternRule {
    fn context(&self) -> &str {
        &self.context
    }

    fn matches(&self, content: &str) -> Vec<RawMatch> {
        self.regex
            .captures_iter(content)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|text| !text.is_empty() && self.within_bounds(text))
            .map(|text| RawMatch {
                text: text.to_string(),
                context: self.context.clone(),
            })
            .collect()
    }
}

fn attribute_context(name: &str) -> String {
    match name {
        "title" => "title_attr".to_string(),
        "placeholder" => "placeholder".to_string(),
        "label" => "label".to_string(),
        "text" => "text_prop".to_string(),
        other => format!("{}_attr", other),
    }
}

/// The standard rule set: element text, one rule per configured attribute,
/// then the two button shapes.
pub fn default_rules(config: &ExtractionConfig) -> Result<Vec<Box<dyn ExtractionRule>>, regex::Error> {
    let mut rules: Vec<Box<dyn ExtractionRule>> = vec![Box::new(PatternRule::element_text(
        config.min_length,
        config.max_length,
    )?)];

    for name in &config.attribute_names {
        rules.push(Box::new(PatternRule::attribute(name)?));
    }

    rules.push(Box::new(PatternRule::button()?));
    rules.push(Box::new(PatternRule::button_class()?));
    Ok(rules)
}
