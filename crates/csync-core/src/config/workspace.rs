//! Workspace discovery and project config resolution
//!
//! A workspace is a directory tree whose root contains a `.claudesync`
//! configuration directory. Project configs live inside it, optionally
//! nested (`datamodel/typeconstraints.project.json`).

use super::{ActiveProject, ProjectConfig, ProjectIdConfig};
use crate::{Error, Result};
use csync_fs::{ConfigStore, NormalizedPath, WellKnown};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Handle to one workspace's `.claudesync` directory.
#[derive(Debug, Clone)]
pub struct Workspace {
    config_dir: PathBuf,
    store: ConfigStore,
}

impl Workspace {
    /// Locate the nearest `.claudesync` directory at or above `start`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error when no workspace is found.
    pub fn discover(start: &Path) -> Result<Self> {
        for dir in start.ancestors() {
            let candidate = dir.join(WellKnown::ConfigDir.as_str());
            if candidate.is_dir() {
                return Ok(Self::from_config_dir(candidate));
            }
        }
        Err(Error::configuration(
            "No .claudesync directory found. Run from inside a configured project.",
        ))
    }

    /// Wrap an existing `.claudesync` directory.
    pub fn from_config_dir(config_dir: impl Into<PathBuf>) -> Self {
        Self {
            config_dir: config_dir.into(),
            store: ConfigStore::new(),
        }
    }

    /// The `.claudesync` directory itself.
    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// The project root (parent of the config directory).
    pub fn project_root(&self) -> Result<PathBuf> {
        self.config_dir
            .parent()
            .map(Path::to_path_buf)
            .ok_or_else(|| Error::configuration("Could not determine project root directory"))
    }

    /// Path of a project's shareable config file.
    pub fn project_config_path(&self, project_path: &str) -> PathBuf {
        self.config_dir
            .join(format!("{project_path}{}", WellKnown::ProjectConfigSuffix))
    }

    /// Path of a project's private id-mapping file.
    pub fn project_id_path(&self, project_path: &str) -> PathBuf {
        self.config_dir
            .join(format!("{project_path}{}", WellKnown::ProjectIdSuffix))
    }

    /// Load a project's shareable configuration.
    pub fn load_project_config(&self, project_path: &str) -> Result<ProjectConfig> {
        let path = self.project_config_path(project_path);
        if !path.is_file() {
            return Err(Error::configuration(format!(
                "Project configuration not found for {project_path}"
            )));
        }
        self.store
            .load(&NormalizedPath::new(&path))
            .map_err(|e| Error::configuration(format!("Invalid project configuration: {e}")))
    }

    /// Load a project's private id mapping.
    pub fn load_project_id(&self, project_path: &str) -> Result<ProjectIdConfig> {
        let path = self.project_id_path(project_path);
        if !path.is_file() {
            return Err(Error::configuration(format!(
                "Project ID configuration not found for {project_path}"
            )));
        }
        self.store
            .load(&NormalizedPath::new(&path))
            .map_err(|e| Error::configuration(format!("Invalid project ID configuration: {e}")))
    }

    /// Save a project's shareable configuration.
    pub fn save_project_config(&self, project_path: &str, config: &ProjectConfig) -> Result<()> {
        let path = self.project_config_path(project_path);
        Ok(self.store.save(&NormalizedPath::new(&path), config)?)
    }

    /// Save a project's private id mapping.
    pub fn save_project_id(&self, project_path: &str, config: &ProjectIdConfig) -> Result<()> {
        let path = self.project_id_path(project_path);
        Ok(self.store.save(&NormalizedPath::new(&path), config)?)
    }

    /// The currently active project, if one is set.
    pub fn active_project(&self) -> Result<Option<ActiveProject>> {
        let path = self.config_dir.join(WellKnown::ActiveProjectFile.as_str());
        if !path.is_file() {
            return Ok(None);
        }
        match self.store.load(&NormalizedPath::new(&path)) {
            Ok(active) => Ok(Some(active)),
            Err(e) => {
                tracing::warn!("unreadable active_project.json: {e}");
                Ok(None)
            }
        }
    }

    /// Record the active project.
    pub fn set_active_project(&self, active: &ActiveProject) -> Result<()> {
        let path = self.config_dir.join(WellKnown::ActiveProjectFile.as_str());
        Ok(self.store.save(&NormalizedPath::new(&path), active)?)
    }

    /// All configured projects, mapped to their remote project ids
    /// (empty when no id file exists yet).
    pub fn list_projects(&self) -> Result<BTreeMap<String, String>> {
        let mut projects = BTreeMap::new();
        let suffix = WellKnown::ProjectConfigSuffix.as_str();

        for entry in WalkDir::new(&self.config_dir)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            if !entry.file_type().is_file() {
                continue;
            }
            let Some(name) = entry.file_name().to_str() else {
                continue;
            };
            let Some(stem) = name.strip_suffix(suffix) else {
                continue;
            };

            let rel_dir = entry
                .path()
                .parent()
                .and_then(|p| p.strip_prefix(&self.config_dir).ok())
                .map(|p| NormalizedPath::new(p).as_str().to_string())
                .unwrap_or_default();
            let project_path = if rel_dir.is_empty() {
                stem.to_string()
            } else {
                format!("{rel_dir}/{stem}")
            };

            let project_id = match self.load_project_id(&project_path) {
                Ok(id_config) => id_config.project_id,
                Err(_) => String::new(),
            };
            projects.insert(project_path, project_id);
        }
        Ok(projects)
    }
}
