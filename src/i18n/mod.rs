//! Languages known to a pipeline run.
//!
//! - `language`: the `Language` value (code, names, canonical flag)
//! - `registry`: the immutable `LanguageRegistry` passed into each pass

mod language;
mod registry;

pub use language::Language;
pub use registry::LanguageRegistry;
