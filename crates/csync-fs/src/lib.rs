//! Filesystem layer for ClaudeSync
//!
//! Provides normalized path handling, atomic I/O, content fingerprinting,
//! and the JSON configuration store shared by the sync core and the CLI.

pub mod config;
pub mod constants;
pub mod error;
pub mod fingerprint;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::WellKnown;
pub use error::{Error, Result};
pub use fingerprint::{compute_fingerprint, fingerprint_file};
pub use path::NormalizedPath;
