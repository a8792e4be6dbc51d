//! `csync simulate`
//!
//! Local-only preview: collects the merged sync set exactly as push
//! would, but prints it instead of contacting the remote.

use super::resolve_project;
use crate::error::Result;
use colored::Colorize;
use csync_core::references::MAIN_PROJECT_KEY;
use csync_core::{ReferenceResolver, Workspace, format_conflicts_report};
use std::collections::BTreeMap;
use std::path::Path;

pub fn run_simulate(cwd: &Path, project: Option<&str>, json: bool) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    let project = resolve_project(&workspace, project)?;

    let mut resolver = ReferenceResolver::new(&workspace);
    let outcome = resolver.collect_merged(&project)?;

    if json {
        let files: Vec<_> = outcome
            .files
            .values()
            .map(|record| {
                serde_json::json!({
                    "path": record.relative_path,
                    "hash": record.content_hash,
                    "project": record.project_id.as_deref().unwrap_or(MAIN_PROJECT_KEY),
                })
            })
            .collect();
        let output = serde_json::json!({
            "project": project,
            "files": files,
            "dropped": outcome.dropped,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!(
        "{} files would sync for project {}",
        outcome.files.len(),
        project.cyan()
    );
    for record in outcome.files.values() {
        let origin = record.project_id.as_deref().unwrap_or(MAIN_PROJECT_KEY);
        println!("  {} ({origin})", record.relative_path);
    }

    let mut per_project: BTreeMap<&str, usize> = BTreeMap::new();
    for record in outcome.files.values() {
        let origin = record.project_id.as_deref().unwrap_or(MAIN_PROJECT_KEY);
        *per_project.entry(origin).or_default() += 1;
    }
    println!();
    for (origin, count) in &per_project {
        println!("{origin}: {count} files");
    }
    if outcome.dropped > 0 {
        println!("{} duplicate paths dropped", outcome.dropped);
    }
    if !outcome.conflicts.is_empty() {
        println!();
        println!("{}", format_conflicts_report(&outcome.conflicts).yellow());
    }
    Ok(())
}
