//! ClaudeSync CLI
//!
//! The command-line interface for synchronizing local project files
//! with remote AI-service projects.

mod cli;
mod commands;
mod error;
mod session;

use clap::Parser;
use colored::Colorize;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use cli::{Cli, Commands, OrganizationAction, ProjectAction};
use commands::PushArgs;
use error::Result;

fn main() {
    if let Err(e) = run() {
        eprintln!("{}: {}", "error".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    // Setup tracing if verbose
    if cli.verbose {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::DEBUG)
            .with_target(true)
            .finish();
        if tracing::subscriber::set_global_default(subscriber).is_ok() {
            tracing::debug!("Verbose mode enabled");
        }
    }

    match cli.command {
        Some(cmd) => execute_command(cmd),
        None => {
            // No command provided - show help hint
            println!("{} ClaudeSync CLI", "csync".green().bold());
            println!();
            println!("Run {} for available commands.", "csync --help".cyan());
            Ok(())
        }
    }
}

fn execute_command(cmd: Commands) -> Result<()> {
    let cwd = std::env::current_dir()?;
    match cmd {
        Commands::Push {
            project,
            organization,
            dry_run,
            two_way,
            prune,
            no_prune,
            yes,
        } => commands::run_push(
            &cwd,
            &PushArgs {
                project,
                organization,
                dry_run,
                two_way,
                prune,
                no_prune,
                yes,
            },
        ),
        Commands::Simulate { project, json } => {
            commands::run_simulate(&cwd, project.as_deref(), json)
        }
        Commands::Project { action } => match action {
            ProjectAction::List { json } => commands::run_project_list(&cwd, json),
            ProjectAction::SetActive { project } => {
                commands::run_project_set_active(&cwd, &project)
            }
            ProjectAction::Show { project } => {
                commands::run_project_show(&cwd, project.as_deref())
            }
        },
        Commands::Organization { action } => match action {
            OrganizationAction::List => commands::run_organization_list(),
        },
    }
}
