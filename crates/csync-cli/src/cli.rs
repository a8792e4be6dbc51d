//! CLI argument parsing using clap derive

use clap::{Parser, Subcommand};

/// ClaudeSync - Synchronize local files with remote AI projects
#[derive(Parser, Debug)]
#[command(name = "csync")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Push local files to the remote project
    ///
    /// Collects the project's sync set (including referenced projects),
    /// compares it against the remote listing, and uploads what changed.
    ///
    /// Examples:
    ///   csync push                     # Push the active project
    ///   csync push -p backend          # Push a specific project
    ///   csync push --two-way           # Also download remote-only files
    ///   csync push --prune -y          # Delete remote strays, no prompt
    Push {
        /// Project path (defaults to the active project)
        #[arg(short, long)]
        project: Option<String>,

        /// Organization id override
        #[arg(long, env = "CLAUDESYNC_ORGANIZATION_ID")]
        organization: Option<String>,

        /// Plan the sync and report it without changing anything
        #[arg(long)]
        dry_run: bool,

        /// Also download remote-only files for this run
        #[arg(long)]
        two_way: bool,

        /// Delete remote files with no local counterpart
        #[arg(long)]
        prune: bool,

        /// Never delete remote files, overriding settings
        #[arg(long, conflicts_with = "prune")]
        no_prune: bool,

        /// Skip the confirmation prompt before pruning
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Preview the sync set without contacting the remote
    Simulate {
        /// Project path (defaults to the active project)
        #[arg(short, long)]
        project: Option<String>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Manage project configurations
    Project {
        #[command(subcommand)]
        action: ProjectAction,
    },

    /// Manage organizations
    Organization {
        #[command(subcommand)]
        action: OrganizationAction,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum ProjectAction {
    /// List configured projects
    List {
        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Set the active project
    SetActive {
        /// Project path inside the .claudesync directory
        project: String,
    },

    /// Show one project's configuration
    Show {
        /// Project path (defaults to the active project)
        project: Option<String>,
    },
}

/// Organization subcommands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum OrganizationAction {
    /// List organizations available to the session
    #[command(visible_alias = "ls")]
    List,
}
