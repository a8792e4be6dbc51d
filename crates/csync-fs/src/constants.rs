//! Well-known filesystem names used across the workspace.

use std::path::Path;

/// Directories never descended into during collection, regardless of
/// patterns: VCS databases, the chat cache, and the tool's own config dir.
pub const SKIP_DIRS: &[&str] = &[
    ".git",
    ".svn",
    ".hg",
    ".bzr",
    "_darcs",
    "CVS",
    "claude_chats",
    ".claudesync",
];

/// Prefix of remote packed-sync artifacts (compressed mode).
pub const PACKED_FILE_PREFIX: &str = "claudesync_packed_";

/// Suffix of remote packed-sync artifacts.
pub const PACKED_FILE_SUFFIX: &str = ".dat";

/// Standard well-known filesystem markers and names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WellKnown {
    /// The `.claudesync` directory (configuration root)
    ConfigDir,
    /// The `.gitignore` pattern file at a project root
    Gitignore,
    /// The `.claudeignore` pattern file at a project root
    Claudeignore,
    /// Suffix of public project configuration files
    ProjectConfigSuffix,
    /// Suffix of private project id/reference-path files
    ProjectIdSuffix,
    /// The active-project marker file inside the config dir
    ActiveProjectFile,
    /// The local settings overlay inside the config dir
    LocalSettingsFile,
    /// The global settings file under the home directory config dir
    GlobalSettingsFile,
}

impl WellKnown {
    /// Get the string representation of the name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ConfigDir => ".claudesync",
            Self::Gitignore => ".gitignore",
            Self::Claudeignore => ".claudeignore",
            Self::ProjectConfigSuffix => ".project.json",
            Self::ProjectIdSuffix => ".project_id.json",
            Self::ActiveProjectFile => "active_project.json",
            Self::LocalSettingsFile => "config.local.json",
            Self::GlobalSettingsFile => "config.json",
        }
    }
}

impl AsRef<Path> for WellKnown {
    fn as_ref(&self) -> &Path {
        Path::new(self.as_str())
    }
}

impl AsRef<str> for WellKnown {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for WellKnown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
