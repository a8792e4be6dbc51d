//! `csync push`

use super::{load_settings, resolve_project};
use crate::error::{CliError, Result};
use crate::session;
use colored::Colorize;
use csync_core::{Workspace, sync};
use std::path::Path;

/// Arguments for the push command.
#[derive(Debug, Default)]
pub struct PushArgs {
    pub project: Option<String>,
    pub organization: Option<String>,
    pub dry_run: bool,
    pub two_way: bool,
    pub prune: bool,
    pub no_prune: bool,
    pub yes: bool,
}

pub fn run_push(cwd: &Path, args: &PushArgs) -> Result<()> {
    let workspace = Workspace::discover(cwd)?;
    let project = resolve_project(&workspace, args.project.as_deref())?;

    let mut settings = load_settings(&workspace)?;
    if args.two_way {
        settings.two_way_sync = true;
    }
    if args.prune {
        settings.prune_remote_files = true;
    }
    if args.no_prune {
        settings.prune_remote_files = false;
    }

    if settings.prune_remote_files && !args.dry_run && !args.yes {
        let confirmed = dialoguer::Confirm::new()
            .with_prompt("Pruning deletes remote files with no local counterpart. Continue?")
            .default(false)
            .interact()?;
        if !confirmed {
            return Err(CliError::user("Push aborted."));
        }
    }

    let provider = session::connect()?;
    let report = sync::push(
        provider.as_ref(),
        &workspace,
        &settings,
        args.organization.as_deref(),
        &project,
        args.dry_run,
    )?;

    if args.dry_run {
        println!("{} {report}", "dry run:".yellow().bold());
        return Ok(());
    }
    println!("{} {report}", "synced:".green().bold());
    for error in &report.errors {
        println!("  {} {error}", "warning:".yellow().bold());
    }
    Ok(())
}
