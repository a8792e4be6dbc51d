//! Shared test support for the integration suites
//!
//! [`MockProvider`] is an in-memory stand-in for the remote service: it
//! keeps the file listing in a mutex, records every call, and can be
//! scripted to fail the next N mutations with a given status.

use csync_core::provider::{
    Organization, ProjectInfo, ProviderError, ProviderResult, RemoteFileRecord, RemoteProvider,
};
use csync_core::{ProjectConfig, ProjectIdConfig, Settings, Workspace};
use std::path::Path;
use std::sync::Mutex;

/// In-memory remote provider.
#[derive(Default)]
pub struct MockProvider {
    files: Mutex<Vec<RemoteFileRecord>>,
    log: Mutex<Vec<String>>,
    failures: Mutex<Vec<ProviderError>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a remote file with a fixed timestamp.
    pub fn seed_file(&self, file_name: &str, content: &str, created_at: &str) -> String {
        let uuid = uuid::Uuid::new_v4().to_string();
        self.files.lock().unwrap().push(RemoteFileRecord {
            file_name: file_name.to_string(),
            uuid: uuid.clone(),
            content: content.to_string(),
            created_at: created_at.to_string(),
        });
        uuid
    }

    /// Queue failures consumed by the next mutating calls.
    pub fn fail_next(&self, count: usize, status: Option<u16>, message: &str) {
        let mut failures = self.failures.lock().unwrap();
        for _ in 0..count {
            failures.push(ProviderError::new(status, message));
        }
    }

    pub fn files(&self) -> Vec<RemoteFileRecord> {
        self.files.lock().unwrap().clone()
    }

    pub fn file_names(&self) -> Vec<String> {
        self.files()
            .into_iter()
            .map(|f| f.file_name)
            .collect()
    }

    pub fn log(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn clear_log(&self) {
        self.log.lock().unwrap().clear();
    }

    /// Remote mutations recorded since the last [`clear_log`].
    pub fn mutations(&self) -> Vec<String> {
        self.log()
            .into_iter()
            .filter(|entry| !entry.starts_with("list"))
            .collect()
    }

    fn take_failure(&self) -> Option<ProviderError> {
        self.failures.lock().unwrap().pop()
    }
}

impl RemoteProvider for MockProvider {
    fn list_files(&self, _org: &str, _project: &str) -> ProviderResult<Vec<RemoteFileRecord>> {
        self.log.lock().unwrap().push("list".to_string());
        Ok(self.files())
    }

    fn upload_file(
        &self,
        _org: &str,
        _project: &str,
        file_name: &str,
        content: &str,
    ) -> ProviderResult<RemoteFileRecord> {
        if let Some(failure) = self.take_failure() {
            self.log
                .lock()
                .unwrap()
                .push(format!("upload {file_name} -> failed"));
            return Err(failure);
        }
        self.log.lock().unwrap().push(format!("upload {file_name}"));
        let record = RemoteFileRecord {
            file_name: file_name.to_string(),
            uuid: uuid::Uuid::new_v4().to_string(),
            content: content.to_string(),
            created_at: now_timestamp(),
        };
        self.files.lock().unwrap().push(record.clone());
        Ok(record)
    }

    fn delete_file(&self, _org: &str, _project: &str, file_uuid: &str) -> ProviderResult<()> {
        if let Some(failure) = self.take_failure() {
            return Err(failure);
        }
        let mut files = self.files.lock().unwrap();
        let name = files
            .iter()
            .find(|f| f.uuid == file_uuid)
            .map(|f| f.file_name.clone())
            .unwrap_or_else(|| file_uuid.to_string());
        files.retain(|f| f.uuid != file_uuid);
        self.log.lock().unwrap().push(format!("delete {name}"));
        Ok(())
    }

    fn create_project(
        &self,
        _org: &str,
        name: &str,
        _description: &str,
    ) -> ProviderResult<ProjectInfo> {
        self.log.lock().unwrap().push(format!("create {name}"));
        Ok(ProjectInfo {
            uuid: uuid::Uuid::new_v4().to_string(),
            name: name.to_string(),
            archived_at: None,
        })
    }

    fn get_organizations(&self) -> ProviderResult<Vec<Organization>> {
        Ok(vec![Organization {
            id: "org-1".to_string(),
            name: "Test Org".to_string(),
            capabilities: vec!["api".to_string()],
        }])
    }

    fn archive_project(&self, _org: &str, project_id: &str) -> ProviderResult<()> {
        self.log
            .lock()
            .unwrap()
            .push(format!("archive {project_id}"));
        Ok(())
    }
}

/// Wire timestamp for a freshly uploaded file.
pub fn now_timestamp() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}

/// Build a workspace at `root` with one configured project that already
/// has a remote id.
pub fn setup_project(root: &Path, project: &str, includes: &[&str]) -> Workspace {
    let config_dir = root.join(".claudesync");
    std::fs::create_dir_all(&config_dir).unwrap();
    let ws = Workspace::from_config_dir(&config_dir);

    let mut config = ProjectConfig::new(project);
    config.includes = includes.iter().map(|s| s.to_string()).collect();
    ws.save_project_config(project, &config).unwrap();
    ws.save_project_id(
        project,
        &ProjectIdConfig {
            project_id: format!("{project}-uuid"),
            ..Default::default()
        },
    )
    .unwrap();
    ws
}

/// Write a file under `root`, creating parent directories.
pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

/// Settings with zeroed delays and an active organization, for fast
/// test runs.
pub fn fast_settings() -> Settings {
    Settings {
        upload_delay: 0.0,
        retry_delay: 0.0,
        active_organization_id: Some("org-1".to_string()),
        ..Settings::default()
    }
}
