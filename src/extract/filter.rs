//! Rejects candidates that look like code rather than prose.

use regex::Regex;
use std::sync::OnceLock;

static UPPER_IDENT_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMERIC_REGEX: OnceLock<Regex> = OnceLock::new();
static SNAKE_IDENT_REGEX: OnceLock<Regex> = OnceLock::new();
static BRACE_EXPR_REGEX: OnceLock<Regex> = OnceLock::new();
static TEMPLATE_EXPR_REGEX: OnceLock<Regex> = OnceLock::new();

const LITERALS: &[&str] = &["true", "false", "null", "undefined"];
const UNITS: &[&str] = &["px", "rem", "em", "%", "vh", "vw"];

const MIN_LENGTH: usize = 3;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("filter pattern is valid"))
}

/// True when `text` should not become a translation record.
pub fn should_ignore(text: &str) -> bool {
    if text.chars().count() < MIN_LENGTH {
        return true;
    }
    if LITERALS.contains(&text) || UNITS.contains(&text) {
        return true;
    }

    regex(&UPPER_IDENT_REGEX, r"^[A-Z_]+$").is_match(text)
        || regex(&NUMERIC_REGEX, r"^\d+$").is_match(text)
        || regex(&SNAKE_IDENT_REGEX, r"^[a-z_]+$").is_match(text)
        || regex(&BRACE_EXPR_REGEX, r"\{.*\}").is_match(text)
        || regex(&TEMPLATE_EXPR_REGEX, r"\$\{").is_match(text)
}
