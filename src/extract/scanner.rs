//! Source tree walker.

use super::rules::ExtractionRule;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// A raw piece of text found in a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub text: String,
    pub context: String,
    pub path: PathBuf,
}

pub struct Scanner {
    rules: Vec<Box<dyn ExtractionRule>>,
    extension: String,
}

impl Scanner {
    pub fn new(rules: Vec<Box<dyn ExtractionRule>>, extension: impl Into<String>) -> Self {
        let extension = extension.into();
        Self {
            rules,
            extension: extension.trim_start_matches('.').to_string(),
        }
    }

    /// Lazily walk `root` in file-name order, yielding every rule match of
    /// every file with the configured extension.
    pub fn scan(&self, root: &Path) -> Scan<'_> {
        Scan {
            scanner: self,
            walker: WalkDir::new(root).sort_by_file_name().into_iter(),
            pending: Vec::new().into_iter(),
            files_scanned: 0,
            files_skipped: 0,
        }
    }

    fn accepts(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == self.extension)
    }

    fn scan_file(&self, path: &Path) -> std::io::Result<Vec<Candidate>> {
        let content = fs::read_to_string(path)?;

        let candidates: Vec<Candidate> = self
            .rules
            .iter()
            .flat_map(|rule| rule.matches(&content))
            .map(|m| Candidate {
                text: m.text,
                context: m.context,
                path: path.to_path_buf(),
            })
            .collect();

        debug!("{}: {} candidates", path.display(), candidates.len());
        Ok(candidates)
    }
}

/// Single-pass iterator returned by [`Scanner::scan`].
pub struct Scan<'a> {
    scanner: &'a Scanner,
    walker: walkdir::IntoIter,
    pending: std::vec::IntoIter<Candidate>,
    files_scanned: usize,
    files_skipped: usize,
}

impl Scan<'_> {
    pub fn files_scanned(&self) -> usize {
        self.files_scanned
    }

    /// Files (or directory entries) that could not be read.
    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }
}

impl Iterator for Scan<'_> {
    type Item = Candidate;

    fn next(&mut self) -> Option<Candidate> {
        loop {
            if let Some(candidate) = self.pending.next() {
                return Some(candidate);
            }

            let entry = match self.walker.next()? {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    self.files_skipped += 1;
                    continue;
                }
            };

            if !entry.file_type().is_file() || !self.scanner.accepts(entry.path()) {
                continue;
            }

            match self.scanner.scan_file(entry.path()) {
                Ok(candidates) => {
                    self.files_scanned += 1;
                    self.pending = candidates.into_iter();
                }
                Err(e) => {
                    warn!("Skipping {}: {}", entry.path().display(), e);
                    self.files_skipped += 1;
                }
            }
        }
    }
}
