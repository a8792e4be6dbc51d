//! Command implementations

mod organization;
mod project;
mod push;
mod simulate;

pub use organization::run_organization_list;
pub use project::{run_project_list, run_project_set_active, run_project_show};
pub use push::{PushArgs, run_push};
pub use simulate::run_simulate;

use crate::error::{CliError, Result};
use csync_core::{Settings, Workspace};

/// Settings for the current workspace: global file overlaid by the
/// workspace-local one.
pub(crate) fn load_settings(workspace: &Workspace) -> Result<Settings> {
    let global_dir = dirs::home_dir().map(|home| home.join(".claudesync"));
    Ok(Settings::load(
        global_dir.as_deref(),
        Some(workspace.config_dir()),
    )?)
}

/// The project to operate on: an explicit argument wins, otherwise the
/// workspace's active project.
pub(crate) fn resolve_project(workspace: &Workspace, explicit: Option<&str>) -> Result<String> {
    if let Some(project) = explicit {
        return Ok(project.to_string());
    }
    match workspace.active_project()? {
        Some(active) => Ok(active.project_path),
        None => Err(CliError::user(
            "No project specified and no active project set. \
             Run 'csync project set-active <path>' first.",
        )),
    }
}
