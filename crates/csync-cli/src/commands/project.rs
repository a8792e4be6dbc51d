//! `csync project` subcommands

use super::resolve_project;
use crate::error::Result;
use colored::Colorize;
use csync_core::{ActiveProject, Workspace};
use std::path::Path;

pub fn run_project_list(cwd: &Path, json: bool) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    let projects = workspace.list_projects()?;
    let active = workspace
        .active_project()?
        .map(|active| active.project_path);

    if json {
        let listing: Vec<_> = projects
            .iter()
            .map(|(path, id)| {
                serde_json::json!({
                    "path": path,
                    "project_id": id,
                    "active": active.as_deref() == Some(path.as_str()),
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    if projects.is_empty() {
        println!("No projects configured.");
        return Ok(());
    }
    for (path, project_id) in &projects {
        let marker = if active.as_deref() == Some(path.as_str()) {
            "*".green().bold().to_string()
        } else {
            " ".to_string()
        };
        if project_id.is_empty() {
            println!("{marker} {path} {}", "(no remote id)".dimmed());
        } else {
            println!("{marker} {path} {}", project_id.dimmed());
        }
    }
    Ok(())
}

pub fn run_project_set_active(cwd: &Path, project: &str) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    // Validates that both config files exist
    workspace.load_project_config(project)?;
    let id_config = workspace.load_project_id(project)?;

    workspace.set_active_project(&ActiveProject {
        project_path: project.to_string(),
        project_id: id_config.project_id,
    })?;
    println!("Active project set to {}", project.cyan());
    Ok(())
}

pub fn run_project_show(cwd: &Path, project: Option<&str>) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    let project = resolve_project(&workspace, project)?;
    let config = workspace.load_project_config(&project)?;
    println!("{}", serde_json::to_string_pretty(&config)?);
    Ok(())
}
