//! Sync orchestration
//!
//! [`push`] is the top-level entry point: it collects the merged sync
//! set for a project (main plus references) and hands it to the
//! [`SyncEngine`] for reconciliation against the remote listing.

pub mod engine;
pub mod pack;
pub mod retry;

pub use engine::{SyncEngine, SyncPlan, SyncReport};
pub use retry::RetryPolicy;

use crate::config::{Settings, Workspace};
use crate::provider::RemoteProvider;
use crate::references::{ReferenceResolver, format_conflicts_report};
use crate::{Error, Result};

/// Collect and push one project.
///
/// The organization comes from the explicit override when given,
/// otherwise from the settings' active organization. A dry run stops
/// after planning and reports what would change without mutating
/// either side.
///
/// # Errors
///
/// Fails when no organization is configured, when the project has no
/// remote id yet, or when the provider rejects an operation after
/// retries are exhausted.
pub fn push(
    provider: &dyn RemoteProvider,
    workspace: &Workspace,
    settings: &Settings,
    organization_id: Option<&str>,
    project_path: &str,
    dry_run: bool,
) -> Result<SyncReport> {
    let org_id = organization_id
        .map(str::to_string)
        .or_else(|| settings.active_organization_id.clone())
        .ok_or_else(|| {
            Error::configuration(
                "No active organization. Set active_organization_id or pass one explicitly.",
            )
        })?;

    let id_config = workspace.load_project_id(project_path)?;
    if id_config.project_id.is_empty() {
        return Err(Error::configuration(format!(
            "Project {project_path} has no remote project id yet"
        )));
    }

    let mut resolver = ReferenceResolver::new(workspace);
    let outcome = resolver.collect_merged(project_path)?;
    if !outcome.conflicts.is_empty() {
        tracing::warn!("{}", format_conflicts_report(&outcome.conflicts));
    }
    tracing::info!(
        "pushing {} files for project {project_path}",
        outcome.files.len()
    );

    let root = workspace.project_root()?;
    let engine = SyncEngine::new(provider, org_id, id_config.project_id, root, settings.clone());

    if dry_run {
        let plan = engine.preview(&outcome.files)?;
        tracing::info!(
            "dry run: {} uploads, {} updates, {} unchanged, {} remote-only",
            plan.uploads.len(),
            plan.updates.len(),
            plan.unchanged.len(),
            plan.remote_only.len()
        );
        return Ok(SyncReport {
            uploaded: plan.uploads.len(),
            updated: plan.updates.len(),
            skipped: plan.unchanged.len(),
            downloaded: if settings.two_way_sync {
                plan.remote_only.len()
            } else {
                0
            },
            // Two-way runs download remote-only files before pruning
            // can see them
            pruned: if settings.prune_remote_files && !settings.two_way_sync {
                plan.remote_only.len()
            } else {
                0
            },
            errors: Vec::new(),
        });
    }
    engine.sync(&outcome.files)
}
