//! File-selection and synchronization engine for ClaudeSync
//!
//! This crate decides which local files belong to a sync set and
//! reconciles that set against a remote project file listing:
//!
//! - **PatternMatcher**: gitignore-syntax include/exclude/ignore matching
//! - **FileClassifier**: per-file admission checks (size, temp suffix,
//!   ignore patterns, text-vs-binary sniffing)
//! - **ProjectFileCollector**: pruned traversal producing fingerprinted
//!   [`FileRecord`]s with provenance
//! - **ReferenceResolver**: cross-project reference resolution and merge
//!   with main-project precedence
//! - **SyncEngine**: idempotent create/update/delete reconciliation with
//!   a bounded retry policy, optional two-way sync, pruning, and a
//!   packed/compressed transport mode
//!
//! # Architecture
//!
//! ```text
//!          csync-cli
//!              |
//!          csync-core ---- RemoteProvider (external HTTP client)
//!              |
//!           csync-fs
//! ```

pub mod classify;
pub mod collect;
pub mod config;
pub mod error;
pub mod pattern;
pub mod provider;
pub mod record;
pub mod references;
pub mod sync;

pub use classify::{AdmissionMatchers, FileClassifier};
pub use collect::ProjectFileCollector;
pub use config::{ActiveProject, Compression, ProjectConfig, ProjectIdConfig, Settings, Workspace};
pub use error::{Error, Result};
pub use pattern::PatternMatcher;
pub use provider::{Organization, ProjectInfo, ProviderError, RemoteFileRecord, RemoteProvider};
pub use record::{FileRecord, FileSource};
pub use references::{FileConflict, MergeOutcome, ReferenceResolver, format_conflicts_report};
pub use sync::{RetryPolicy, SyncEngine, SyncPlan, SyncReport, push};
