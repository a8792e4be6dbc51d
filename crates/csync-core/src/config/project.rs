//! Project configuration files
//!
//! Two JSON files describe a project inside the `.claudesync` directory:
//! the shareable `<path>.project.json` and the private
//! `<path>.project_id.json` holding the remote project id and the
//! reference-id to path mapping. Field order and 2-space indentation are
//! preserved for compatibility with existing installations.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Default size ceiling for a single synced file, in bytes.
pub fn default_max_file_size() -> u64 {
    32 * 1024
}

fn default_true() -> bool {
    true
}

/// Shareable per-project configuration (`<path>.project.json`).
///
/// Loaded once per project per sync run and read-only during the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectConfig {
    pub project_name: String,
    #[serde(default)]
    pub project_description: String,
    /// Include globs; an empty list includes nothing.
    #[serde(default)]
    pub includes: Vec<String>,
    #[serde(default)]
    pub excludes: Vec<String>,
    #[serde(default = "default_true")]
    pub use_ignore_files: bool,
    /// Subdirectories that scope traversal instead of the whole root.
    #[serde(default)]
    pub push_roots: Vec<String>,
    /// Reference ids resolved through the private id mapping.
    #[serde(default)]
    pub references: Vec<String>,
    #[serde(default = "default_max_file_size")]
    pub max_file_size: u64,
}

impl ProjectConfig {
    pub fn new(project_name: impl Into<String>) -> Self {
        Self {
            project_name: project_name.into(),
            project_description: String::new(),
            includes: Vec::new(),
            excludes: Vec::new(),
            use_ignore_files: true,
            push_roots: Vec::new(),
            references: Vec::new(),
            max_file_size: default_max_file_size(),
        }
    }
}

/// Private per-project id mapping (`<path>.project_id.json`).
///
/// Kept separate from the shareable config so reference paths can point
/// outside anything that gets committed or shared.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdConfig {
    pub project_id: String,
    #[serde(default)]
    pub reference_paths: BTreeMap<String, String>,
}

/// The active-project marker (`active_project.json`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveProject {
    pub project_path: String,
    pub project_id: String,
}
