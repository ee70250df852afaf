//! Extract UI strings from a source tree into keyed CSV templates, fill the
//! target languages through a batch translation oracle, and publish the
//! resulting files to object storage.

pub mod config;
pub mod error;
pub mod extract;
pub mod i18n;
pub mod oracle;
pub mod orchestrator;
pub mod report;
pub mod retry;
pub mod storage;
pub mod store;
pub mod tabular;
