//! Remote session wiring
//!
//! The HTTP transport lives in a separate client crate and is injected
//! as a [`RemoteProvider`]; this build validates credentials and reports
//! the missing transport instead of silently doing nothing.

use crate::error::{CliError, Result};
use csync_core::RemoteProvider;

/// Environment variable holding the session key.
pub const SESSION_KEY_VAR: &str = "CLAUDESYNC_SESSION_KEY";

/// Open a provider session for remote commands.
pub fn connect() -> Result<Box<dyn RemoteProvider>> {
    let key = std::env::var(SESSION_KEY_VAR).unwrap_or_default();
    if key.trim().is_empty() {
        return Err(CliError::user(format!(
            "No session key found. Set {SESSION_KEY_VAR} to authenticate."
        )));
    }
    Err(CliError::user(
        "No remote provider transport is configured in this build. \
         Use 'csync simulate' for a local preview.",
    ))
}
