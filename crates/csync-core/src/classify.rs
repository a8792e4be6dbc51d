//! Per-file admission checks
//!
//! The include spec is the traversal filter and is evaluated by the
//! collector; everything here is an admission check applied afterward,
//! short-circuiting on the first failing condition. A classification
//! failure never aborts collection.

use crate::config::ProjectConfig;
use crate::pattern::PatternMatcher;
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Bytes sniffed from the head of a file for binary detection.
const SNIFF_LEN: usize = 8192;

/// The non-include matchers consulted during admission. `gitignore` and
/// `claudeignore` are `None` when `use_ignore_files` is off or the file
/// is absent; `exclude` is `None` when the project has no excludes.
#[derive(Default)]
pub struct AdmissionMatchers {
    pub exclude: Option<PatternMatcher>,
    pub gitignore: Option<PatternMatcher>,
    pub claudeignore: Option<PatternMatcher>,
}

impl AdmissionMatchers {
    /// Whether a directory should be pruned before descending into it.
    /// claudeignore is consulted before gitignore; either excludes.
    pub fn skips_directory(&self, relative_path: &str) -> bool {
        if let Some(claudeignore) = &self.claudeignore
            && claudeignore.matches_directory(relative_path)
        {
            tracing::debug!("skipping directory {relative_path}: claudeignore pattern");
            return true;
        }
        if let Some(gitignore) = &self.gitignore
            && gitignore.matches_directory(relative_path)
        {
            tracing::debug!("skipping directory {relative_path}: gitignore pattern");
            return true;
        }
        if let Some(exclude) = &self.exclude
            && exclude.matches_directory(relative_path)
        {
            tracing::debug!("skipping directory {relative_path}: exclude pattern");
            return true;
        }
        false
    }
}

/// Decides whether one candidate file is eligible for the sync set.
pub struct FileClassifier;

impl FileClassifier {
    /// Admission check for a single file. `file_path` is the absolute
    /// location, `relative_path` the forward-slash path used for pattern
    /// matching.
    pub fn should_include(
        file_path: &Path,
        relative_path: &str,
        config: &ProjectConfig,
        matchers: &AdmissionMatchers,
    ) -> bool {
        let size = match std::fs::metadata(file_path) {
            Ok(meta) => meta.len(),
            Err(e) => {
                tracing::debug!("cannot stat {relative_path}: {e}, skipping");
                return false;
            }
        };
        if size > config.max_file_size {
            tracing::debug!(
                "file {relative_path} exceeds max size of {} bytes",
                config.max_file_size
            );
            return false;
        }

        // Editor temp files
        if relative_path.ends_with('~') {
            tracing::debug!("skipping temporary file {relative_path}");
            return false;
        }

        if let Some(gitignore) = &matchers.gitignore
            && gitignore.matches(relative_path)
        {
            tracing::debug!("file {relative_path} matches gitignore pattern");
            return false;
        }
        if let Some(claudeignore) = &matchers.claudeignore
            && claudeignore.matches(relative_path)
        {
            tracing::debug!("file {relative_path} matches claudeignore pattern");
            return false;
        }

        if let Some(exclude) = &matchers.exclude
            && exclude.matches(relative_path)
        {
            tracing::debug!("file {relative_path} excluded by exclude patterns");
            return false;
        }

        if !is_text_file(file_path) {
            tracing::debug!("file {relative_path} is not a text file");
            return false;
        }

        true
    }
}

/// Sniff the first 8192 bytes: a NUL byte means binary. An unreadable
/// file is treated as binary (rejected).
fn is_text_file(path: &Path) -> bool {
    let mut buffer = [0u8; SNIFF_LEN];
    let Ok(mut file) = File::open(path) else {
        return false;
    };
    let mut filled = 0;
    while filled < SNIFF_LEN {
        match file.read(&mut buffer[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(_) => return false,
        }
    }
    !buffer[..filled].contains(&0)
}
