//! Cross-project reference resolution
//!
//! A project may declare `references` to other projects; each reference
//! id maps to the absolute path of the referenced project's config file
//! through the private id mapping. `get_referenced_projects` validates
//! hard (a bad reference is a user-correctable configuration error),
//! while the merge paths degrade softly: one bad reference is skipped
//! with a warning and the rest of the sync proceeds.
//!
//! Referenced projects are read for their file lists only; their own
//! `references` field is never followed, so resolution cannot recurse.

use crate::collect::ProjectFileCollector;
use crate::config::{ProjectConfig, Workspace};
use crate::record::FileRecord;
use crate::{Error, Result};
use csync_fs::WellKnown;
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

/// Key under which the main project's files appear in per-project maps.
pub const MAIN_PROJECT_KEY: &str = "main";

/// A relative path contributed by more than one project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileConflict {
    pub relative_path: String,
    /// Contributing projects, winner first
    pub projects: Vec<String>,
    /// Whether the colliding contents were identical
    pub identical: bool,
}

/// Result of flattening per-project file sets with main precedence.
#[derive(Debug, Default)]
pub struct MergeOutcome {
    pub files: BTreeMap<String, FileRecord>,
    pub conflicts: Vec<FileConflict>,
    /// Duplicate records dropped during the merge
    pub dropped: usize,
}

/// Resolves a project's references and merges their file sets.
///
/// Referenced configs are cached per resolver instance; the resolver is
/// created for one sync run and dropped with it.
pub struct ReferenceResolver<'a> {
    workspace: &'a Workspace,
    config_cache: HashMap<String, ProjectConfig>,
}

impl<'a> ReferenceResolver<'a> {
    pub fn new(workspace: &'a Workspace) -> Self {
        Self {
            workspace,
            config_cache: HashMap::new(),
        }
    }

    /// Resolve declared references to validated config-file paths.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first reference that has
    /// no path mapping or whose mapped path fails validation.
    pub fn get_referenced_projects(
        &self,
        project_path: &str,
    ) -> Result<BTreeMap<String, PathBuf>> {
        let config = self.workspace.load_project_config(project_path)?;
        let id_config = self.workspace.load_project_id(project_path)?;

        let mut resolved = BTreeMap::new();
        for ref_id in &config.references {
            let Some(raw_path) = id_config.reference_paths.get(ref_id) else {
                return Err(Error::configuration(format!(
                    "Referenced project '{ref_id}' has no path mapping in project_id.json"
                )));
            };
            let ref_path = PathBuf::from(raw_path);
            validate_reference_path(ref_id, &ref_path)?;
            resolved.insert(ref_id.clone(), ref_path);
        }
        Ok(resolved)
    }

    /// Collect files per project: the main project under
    /// [`MAIN_PROJECT_KEY`], plus one entry per resolvable reference.
    ///
    /// Reference failures are downgraded to warnings here; only the main
    /// project's collection can fail the call.
    pub fn collect_all(
        &mut self,
        project_path: &str,
    ) -> Result<BTreeMap<String, BTreeMap<String, FileRecord>>> {
        Ok(self.collect_ordered(project_path)?.into_iter().collect())
    }

    /// Collect and flatten with main-project precedence: a relative path
    /// already present is never overwritten; later duplicates are
    /// dropped silently but counted. References are folded in their
    /// declared order.
    pub fn collect_merged(&mut self, project_path: &str) -> Result<MergeOutcome> {
        let by_project = self.collect_ordered(project_path)?;
        Ok(merge_with_precedence(by_project))
    }

    /// Collect per-project file sets: the main project first, then each
    /// resolvable reference in the order `references` declares them.
    fn collect_ordered(
        &mut self,
        project_path: &str,
    ) -> Result<Vec<(String, BTreeMap<String, FileRecord>)>> {
        let mut by_project = Vec::new();

        let main_config = self.workspace.load_project_config(project_path)?;
        let main_root = self.workspace.project_root()?;
        let main_files = ProjectFileCollector::new(&main_root, &main_config).collect()?;
        tracing::debug!("found {} files in main project", main_files.len());
        by_project.push((MAIN_PROJECT_KEY.to_string(), main_files));

        let references = match self.get_referenced_projects(project_path) {
            Ok(references) => references,
            Err(e) => {
                tracing::warn!("error processing referenced projects: {e}");
                return Ok(by_project);
            }
        };

        for ref_id in &main_config.references {
            let Some(ref_config_path) = references.get(ref_id) else {
                continue;
            };
            match self.collect_reference(ref_id, ref_config_path) {
                Ok(files) => {
                    tracing::debug!("found {} files in referenced project {ref_id}", files.len());
                    by_project.push((ref_id.clone(), files));
                }
                Err(e) => {
                    tracing::warn!("error reading referenced project {ref_id}: {e}");
                }
            }
        }
        Ok(by_project)
    }

    fn collect_reference(
        &mut self,
        ref_id: &str,
        config_path: &Path,
    ) -> Result<BTreeMap<String, FileRecord>> {
        let config = match self.config_cache.get(ref_id) {
            Some(config) => config.clone(),
            None => {
                let content = std::fs::read_to_string(config_path)?;
                let config: ProjectConfig = serde_json::from_str(&content)?;
                self.config_cache.insert(ref_id.to_string(), config.clone());
                config
            }
        };

        // Config file lives at <root>/<config-dir>/<name>.project.json
        let ref_root = config_path
            .parent()
            .and_then(Path::parent)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Cannot derive project root for reference '{ref_id}' from {}",
                    config_path.display()
                ))
            })?;

        ProjectFileCollector::for_reference(ref_root, &config, ref_id).collect()
    }
}

/// Flatten per-project maps in the given order; the first contributor
/// of a path wins.
fn merge_with_precedence(
    by_project: Vec<(String, BTreeMap<String, FileRecord>)>,
) -> MergeOutcome {
    let mut outcome = MergeOutcome::default();

    for (project_id, files) in by_project {
        for (rel_path, record) in files {
            if let Some(existing) = outcome.files.get(&rel_path) {
                let winner = existing
                    .project_id
                    .clone()
                    .unwrap_or_else(|| MAIN_PROJECT_KEY.to_string());
                outcome.conflicts.push(FileConflict {
                    relative_path: rel_path,
                    projects: vec![winner, project_id.clone()],
                    identical: existing.content_hash == record.content_hash,
                });
                outcome.dropped += 1;
            } else {
                outcome.files.insert(rel_path, record);
            }
        }
    }
    outcome
}

/// Hard validation of a reference path: absolute, existing, readable,
/// not a symlink, a `.project.json` file inside a `.claudesync`
/// directory.
fn validate_reference_path(ref_id: &str, path: &Path) -> Result<()> {
    let fail = |reason: &str| {
        Err(Error::configuration(format!(
            "Invalid referenced project path for '{ref_id}': {} ({reason})",
            path.display()
        )))
    };

    if !path.is_absolute() {
        return fail("must be absolute");
    }
    match std::fs::symlink_metadata(path) {
        Ok(meta) if meta.file_type().is_symlink() => return fail("symlinks are not allowed"),
        Ok(meta) if !meta.is_file() => return fail("not a file"),
        Ok(_) => {}
        Err(_) => return fail("not accessible"),
    }
    let is_project_config = path
        .file_name()
        .and_then(|n| n.to_str())
        .is_some_and(|n| n.ends_with(WellKnown::ProjectConfigSuffix.as_str()));
    if !is_project_config {
        return fail("must point to a .project.json file");
    }
    let inside_config_dir = path
        .components()
        .any(|c| c.as_os_str() == WellKnown::ConfigDir.as_str());
    if !inside_config_dir {
        return fail("must be within a .claudesync directory");
    }
    // Must be readable and valid JSON
    match std::fs::read_to_string(path) {
        Ok(content) => {
            if serde_json::from_str::<serde_json::Value>(&content).is_err() {
                return fail("not a valid JSON file");
            }
        }
        Err(_) => return fail("not accessible"),
    }
    Ok(())
}

/// Human-readable summary of merge conflicts.
pub fn format_conflicts_report(conflicts: &[FileConflict]) -> String {
    if conflicts.is_empty() {
        return "No conflicts found.".to_string();
    }

    let mut report = vec!["File conflicts found:".to_string()];
    for conflict in conflicts {
        report.push(format!("\nFile: {}", conflict.relative_path));
        report.push(format!(
            "Found in projects: {}",
            conflict.projects.join(", ")
        ));
        if conflict.identical {
            report.push("Note: Files are identical".to_string());
        } else {
            report.push("Warning: Files have different content".to_string());
        }
        report.push(format!("Using version from: {}", conflict.projects[0]));
    }
    report.join("\n")
}
