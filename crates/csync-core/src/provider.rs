//! Remote provider interface
//!
//! The sync engine talks to the hosted service through this trait; the
//! concrete HTTP client lives outside this crate. Remote records are
//! read/write-through values, never cached across runs.

use serde::{Deserialize, Serialize};

/// A file as the remote provider reports it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoteFileRecord {
    pub file_name: String,
    pub uuid: String,
    pub content: String,
    /// ISO-8601 with milliseconds, UTC (`%Y-%m-%dT%H:%M:%S%.fZ`)
    pub created_at: String,
}

/// An organization the authenticated user belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub capabilities: Vec<String>,
}

/// A remote project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectInfo {
    pub uuid: String,
    pub name: String,
    #[serde(default)]
    pub archived_at: Option<String>,
}

/// Failure from a provider call, carrying an HTTP-status-like signal.
///
/// The retry policy only needs to tell the 403/rate-limit class apart
/// from everything else.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    pub status: Option<u16>,
    pub message: String,
}

impl ProviderError {
    pub fn new(status: Option<u16>, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// The retryable rate/permission class.
    pub fn is_rate_limited(&self) -> bool {
        self.status == Some(403) || self.message.contains("403 Forbidden")
    }
}

/// Result type for provider calls.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Abstract remote provider consumed by the sync engine.
pub trait RemoteProvider {
    fn list_files(&self, org_id: &str, project_id: &str) -> ProviderResult<Vec<RemoteFileRecord>>;

    fn upload_file(
        &self,
        org_id: &str,
        project_id: &str,
        file_name: &str,
        content: &str,
    ) -> ProviderResult<RemoteFileRecord>;

    fn delete_file(&self, org_id: &str, project_id: &str, file_uuid: &str) -> ProviderResult<()>;

    fn create_project(
        &self,
        org_id: &str,
        name: &str,
        description: &str,
    ) -> ProviderResult<ProjectInfo>;

    fn get_organizations(&self) -> ProviderResult<Vec<Organization>>;

    fn archive_project(&self, org_id: &str, project_id: &str) -> ProviderResult<()>;
}
