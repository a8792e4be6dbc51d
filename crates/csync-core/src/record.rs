//! Sync-set data model

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which project contributed a file to the sync set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileSource {
    /// The project being pushed
    Main,
    /// A project pulled in through `references`
    Referenced,
}

/// One collected file, keyed by its relative path within the sync set.
///
/// Created during collection and immutable afterward; the whole set is
/// discarded at the end of a sync run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Path relative to `root_path`, forward-slash normalized
    pub relative_path: String,
    /// MD5 fingerprint of the file content
    pub content_hash: String,
    /// Provenance of the record
    pub source: FileSource,
    /// Reference id of the contributing project, when referenced
    pub project_id: Option<String>,
    /// Absolute directory `relative_path` resolves against on disk
    pub root_path: PathBuf,
    /// Whether the record participates in reconciliation. Records with
    /// `included = false` exist only for diagnostic views.
    pub included: bool,
}

impl FileRecord {
    /// Absolute on-disk location of the file.
    pub fn absolute_path(&self) -> PathBuf {
        self.root_path.join(&self.relative_path)
    }
}
