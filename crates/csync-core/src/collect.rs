//! Project file collection
//!
//! Walks a project's traversal roots top-down, pruning skipped
//! directories before descending, and produces the path-to-record map
//! for one project. Collection is best-effort: unreadable files and
//! missing roots are logged and skipped, never fatal.

use crate::classify::{AdmissionMatchers, FileClassifier};
use crate::config::ProjectConfig;
use crate::pattern::{self, PatternMatcher};
use crate::record::{FileRecord, FileSource};
use crate::Result;
use csync_fs::constants::SKIP_DIRS;
use csync_fs::{NormalizedPath, WellKnown, fingerprint_file};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects one project's sync-eligible files.
pub struct ProjectFileCollector<'a> {
    root_path: &'a Path,
    config: &'a ProjectConfig,
    source: FileSource,
    project_id: Option<String>,
}

impl<'a> ProjectFileCollector<'a> {
    /// Collector for the main project.
    pub fn new(root_path: &'a Path, config: &'a ProjectConfig) -> Self {
        Self {
            root_path,
            config,
            source: FileSource::Main,
            project_id: None,
        }
    }

    /// Collector for a referenced project, tagging records with the
    /// contributing reference id.
    pub fn for_reference(
        root_path: &'a Path,
        config: &'a ProjectConfig,
        project_id: impl Into<String>,
    ) -> Self {
        Self {
            root_path,
            config,
            source: FileSource::Referenced,
            project_id: Some(project_id.into()),
        }
    }

    /// Walk the project and return its sync set, keyed by relative path.
    ///
    /// Each physical file is visited exactly once, so path uniqueness
    /// holds by construction.
    pub fn collect(&self) -> Result<BTreeMap<String, FileRecord>> {
        let mut files = BTreeMap::new();

        // "No includes" means "include nothing".
        if self.config.includes.is_empty() {
            tracing::debug!(
                "project {} has no include patterns, collecting nothing",
                self.config.project_name
            );
            return Ok(files);
        }

        let include = PatternMatcher::new(&self.config.includes)?;
        let matchers = self.build_admission_matchers()?;
        let root = NormalizedPath::new(self.root_path);

        for base in self.traversal_roots() {
            if !base.is_dir() {
                tracing::warn!("specified root path does not exist: {}", base.display());
                continue;
            }
            self.walk_root(&base, &root, &include, &matchers, &mut files);
        }

        tracing::debug!(
            "collected {} files for project {}",
            files.len(),
            self.config.project_name
        );
        Ok(files)
    }

    fn walk_root(
        &self,
        base: &Path,
        root: &NormalizedPath,
        include: &PatternMatcher,
        matchers: &AdmissionMatchers,
        files: &mut BTreeMap<String, FileRecord>,
    ) {
        let walker = WalkDir::new(base)
            .follow_links(false)
            .into_iter()
            .filter_entry(|entry| {
                if entry.depth() == 0 || !entry.file_type().is_dir() {
                    return true;
                }
                !self.should_skip_directory(entry.path(), root, matchers)
            });

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    tracing::warn!("traversal error under {}: {e}", base.display());
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(rel) = root.relative_of(entry.path()) else {
                continue;
            };
            let rel_path = rel.as_str();

            if !include.matches(rel_path) {
                continue;
            }
            if !FileClassifier::should_include(entry.path(), rel_path, self.config, matchers) {
                continue;
            }

            match fingerprint_file(entry.path()) {
                Ok(Some(content_hash)) => {
                    files.insert(
                        rel_path.to_string(),
                        FileRecord {
                            relative_path: rel_path.to_string(),
                            content_hash,
                            source: self.source,
                            project_id: self.project_id.clone(),
                            root_path: self.root_path.to_path_buf(),
                            included: true,
                        },
                    );
                }
                Ok(None) => {} // not UTF-8 text, already logged
                Err(e) => {
                    tracing::error!("error reading file {rel_path}: {e}");
                }
            }
        }
    }

    fn should_skip_directory(
        &self,
        dir_path: &Path,
        root: &NormalizedPath,
        matchers: &AdmissionMatchers,
    ) -> bool {
        if let Some(name) = dir_path.file_name().and_then(|n| n.to_str())
            && SKIP_DIRS.contains(&name)
        {
            return true;
        }
        if let Some(rel) = root.relative_of(dir_path) {
            return matchers.skips_directory(rel.as_str());
        }
        false
    }

    fn build_admission_matchers(&self) -> Result<AdmissionMatchers> {
        let exclude = if self.config.excludes.is_empty() {
            None
        } else {
            Some(PatternMatcher::new(&self.config.excludes)?)
        };

        let (gitignore, claudeignore) = if self.config.use_ignore_files {
            (
                load_tolerant(self.root_path, WellKnown::Gitignore.as_str()),
                load_tolerant(self.root_path, WellKnown::Claudeignore.as_str()),
            )
        } else {
            (None, None)
        };

        Ok(AdmissionMatchers {
            exclude,
            gitignore,
            claudeignore,
        })
    }

    /// Traversal roots: configured push roots, else literal directory
    /// prefixes derived from include patterns, else the whole root.
    fn traversal_roots(&self) -> Vec<PathBuf> {
        if !self.config.push_roots.is_empty() {
            return self
                .config
                .push_roots
                .iter()
                .map(|push_root| self.root_path.join(push_root))
                .collect();
        }

        let mut prefixes = Vec::new();
        for pattern in &self.config.includes {
            match literal_dir_prefix(pattern) {
                Some(prefix) => {
                    let full = self.root_path.join(&prefix);
                    if !prefixes.contains(&full) {
                        prefixes.push(full);
                    }
                }
                // One unprefixed pattern forces a whole-root walk.
                None => return vec![self.root_path.to_path_buf()],
            }
        }
        if prefixes.is_empty() {
            vec![self.root_path.to_path_buf()]
        } else {
            prefixes
        }
    }
}

/// Directory prefix of an include pattern up to its first wildcard
/// segment, e.g. `src/**/*.py` -> `src`. `None` when the pattern gives
/// no literal directory to anchor traversal.
fn literal_dir_prefix(pattern: &str) -> Option<String> {
    if pattern.starts_with('!') {
        return None;
    }
    let body = pattern.strip_prefix('/').unwrap_or(pattern);
    let components: Vec<&str> = body.split('/').collect();
    let literal: Vec<&str> = components
        .iter()
        .take_while(|c| !c.contains(['*', '?', '[']))
        .copied()
        .collect();

    let dirs = if literal.len() == components.len() {
        // Fully literal pattern names a file; anchor at its directory.
        &literal[..literal.len().saturating_sub(1)]
    } else {
        &literal[..]
    };
    if dirs.is_empty() {
        None
    } else {
        Some(dirs.join("/"))
    }
}

/// Ignore-file loading is tolerant: a malformed pattern file is warned
/// about and treated as absent.
fn load_tolerant(root: &Path, file_name: &str) -> Option<PatternMatcher> {
    match pattern::load_ignore_file(root, file_name) {
        Ok(matcher) => matcher,
        Err(e) => {
            tracing::warn!("could not load {file_name}: {e}");
            None
        }
    }
}
