//! Create/update/delete reconciliation against a remote listing
//!
//! The engine first derives a [`SyncPlan`] by comparing content
//! fingerprints, then executes it: updates as delete-then-reupload,
//! fresh uploads, optional two-way download of remote-only files, and
//! optional pruning of what is left. Running the same plan twice against
//! an unchanged tree performs no remote mutations.

use crate::config::{Compression, Settings};
use crate::provider::{RemoteFileRecord, RemoteProvider};
use crate::record::FileRecord;
use crate::sync::pack;
use crate::sync::retry::RetryPolicy;
use crate::Result;
use chrono::NaiveDateTime;
use csync_fs::compute_fingerprint;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};

/// Wire timestamp layout (`created_at`), UTC with fractional seconds.
const REMOTE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// What one sync run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub uploaded: usize,
    pub updated: usize,
    /// Files already in sync, no network call made
    pub skipped: usize,
    pub downloaded: usize,
    pub pruned: usize,
    /// Non-fatal per-file failures that were skipped
    pub errors: Vec<String>,
}

impl SyncReport {
    /// Remote create/update/delete operations performed.
    pub fn remote_mutations(&self) -> usize {
        self.uploaded + self.updated + self.pruned
    }
}

impl fmt::Display for SyncReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} uploaded, {} updated, {} skipped, {} downloaded, {} pruned",
            self.uploaded, self.updated, self.skipped, self.downloaded, self.pruned
        )?;
        if !self.errors.is_empty() {
            write!(f, ", {} errors", self.errors.len())?;
        }
        Ok(())
    }
}

/// The operations a sync run would perform, derived before any remote
/// mutation happens.
#[derive(Debug, Clone, Default)]
pub struct SyncPlan {
    /// Local files with no remote counterpart
    pub uploads: Vec<String>,
    /// Changed files as `(relative_path, remote_uuid)` pairs
    pub updates: Vec<(String, String)>,
    /// Files whose fingerprints already agree
    pub unchanged: Vec<String>,
    /// Remote files with no local counterpart
    pub remote_only: Vec<RemoteFileRecord>,
}

impl SyncPlan {
    pub fn is_noop(&self) -> bool {
        self.uploads.is_empty() && self.updates.is_empty()
    }
}

/// Reconciles one project's sync set against its remote listing.
pub struct SyncEngine<'a> {
    provider: &'a dyn RemoteProvider,
    org_id: String,
    project_id: String,
    local_root: PathBuf,
    settings: Settings,
    retry: RetryPolicy,
}

impl<'a> SyncEngine<'a> {
    pub fn new(
        provider: &'a dyn RemoteProvider,
        org_id: impl Into<String>,
        project_id: impl Into<String>,
        local_root: impl Into<PathBuf>,
        settings: Settings,
    ) -> Self {
        let retry = RetryPolicy::from_settings(&settings);
        Self {
            provider,
            org_id: org_id.into(),
            project_id: project_id.into(),
            local_root: local_root.into(),
            settings,
            retry,
        }
    }

    /// Replace the retry policy.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Compare fingerprints and produce the operation plan. Records
    /// flagged as not included are invisible to reconciliation.
    pub fn plan(local: &BTreeMap<String, FileRecord>, remote: &[RemoteFileRecord]) -> SyncPlan {
        let mut plan = SyncPlan::default();
        let mut remote_by_name: BTreeMap<&str, &RemoteFileRecord> =
            remote.iter().map(|r| (r.file_name.as_str(), r)).collect();

        for (rel_path, record) in local.iter().filter(|(_, r)| r.included) {
            match remote_by_name.remove(rel_path.as_str()) {
                Some(remote_file) => {
                    if compute_fingerprint(&remote_file.content) == record.content_hash {
                        plan.unchanged.push(rel_path.clone());
                    } else {
                        plan.updates
                            .push((rel_path.clone(), remote_file.uuid.clone()));
                    }
                }
                None => plan.uploads.push(rel_path.clone()),
            }
        }
        plan.remote_only = remote_by_name.into_values().cloned().collect();
        plan
    }

    /// List the remote and derive the plan without mutating either
    /// side.
    pub fn preview(&self, local: &BTreeMap<String, FileRecord>) -> Result<SyncPlan> {
        let remote = self
            .retry
            .run(|| self.provider.list_files(&self.org_id, &self.project_id))?;
        Ok(Self::plan(local, &remote))
    }

    /// Run a full sync: list the remote, then reconcile with the
    /// strategy the settings select.
    pub fn sync(&self, local: &BTreeMap<String, FileRecord>) -> Result<SyncReport> {
        let remote = self
            .retry
            .run(|| self.provider.list_files(&self.org_id, &self.project_id))?;
        tracing::debug!(
            "remote project {} lists {} files",
            self.project_id,
            remote.len()
        );

        match self.settings.compression_algorithm {
            Compression::None => self.sync_plain(local, &remote),
            algorithm => self.sync_packed(local, &remote, algorithm),
        }
    }

    fn sync_plain(
        &self,
        local: &BTreeMap<String, FileRecord>,
        remote: &[RemoteFileRecord],
    ) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let plan = Self::plan(local, remote);
        let mut synced: BTreeSet<String> = plan.unchanged.iter().cloned().collect();
        report.skipped = plan.unchanged.len();

        for (rel_path, uuid) in &plan.updates {
            let Some(record) = local.get(rel_path) else {
                continue;
            };
            tracing::debug!("updating {rel_path} on remote");
            self.retry
                .run(|| self.provider.delete_file(&self.org_id, &self.project_id, uuid))?;
            let content = std::fs::read_to_string(record.absolute_path()).map_err(|e| {
                tracing::error!("error reading local file {rel_path}: {e}");
                e
            })?;
            self.retry.run(|| {
                self.provider
                    .upload_file(&self.org_id, &self.project_id, rel_path, &content)
            })?;
            std::thread::sleep(self.settings.upload_delay_duration());
            synced.insert(rel_path.clone());
            report.updated += 1;
        }

        for rel_path in &plan.uploads {
            let Some(record) = local.get(rel_path) else {
                continue;
            };
            tracing::debug!("uploading new file {rel_path}");
            let content = std::fs::read_to_string(record.absolute_path()).map_err(|e| {
                tracing::error!("error reading local file {rel_path}: {e}");
                e
            })?;
            self.retry.run(|| {
                self.provider
                    .upload_file(&self.org_id, &self.project_id, rel_path, &content)
            })?;
            std::thread::sleep(self.settings.upload_delay_duration());
            synced.insert(rel_path.clone());
            report.uploaded += 1;
        }

        let mut prune_candidates: Vec<&RemoteFileRecord> = plan.remote_only.iter().collect();

        if self.settings.two_way_sync {
            let mut kept = Vec::new();
            for remote_file in prune_candidates {
                match self.download_file(remote_file) {
                    Ok(()) => {
                        synced.insert(remote_file.file_name.clone());
                        report.downloaded += 1;
                    }
                    Err(e) => {
                        report
                            .errors
                            .push(format!("download {}: {e}", remote_file.file_name));
                        kept.push(remote_file);
                    }
                }
            }
            prune_candidates = kept;
        }

        if self.settings.prune_remote_files {
            for remote_file in prune_candidates {
                tracing::debug!("pruning remote file {}", remote_file.file_name);
                self.retry.run(|| {
                    self.provider
                        .delete_file(&self.org_id, &self.project_id, &remote_file.uuid)
                })?;
                std::thread::sleep(self.settings.upload_delay_duration());
                report.pruned += 1;
            }
        }

        self.sync_local_timestamps(local, remote, &synced);
        Ok(report)
    }

    /// Packed strategy: one compressed artifact carries the whole set.
    fn sync_packed(
        &self,
        local: &BTreeMap<String, FileRecord>,
        remote: &[RemoteFileRecord],
        algorithm: Compression,
    ) -> Result<SyncReport> {
        let mut report = SyncReport::default();
        let included: BTreeMap<String, FileRecord> = local
            .iter()
            .filter(|(_, r)| r.included)
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let packed = pack::pack(&included)?;
        let encoded = pack::encode(&packed, algorithm)?;
        let artifact = pack::artifact_name();
        tracing::debug!("uploading packed artifact {artifact}");
        self.retry.run(|| {
            self.provider
                .upload_file(&self.org_id, &self.project_id, &artifact, &encoded)
        })?;
        std::thread::sleep(self.settings.upload_delay_duration());
        report.uploaded = included.len();

        if self.settings.two_way_sync
            && let Some(latest) = pack::latest_artifact(remote)
        {
            let contents = pack::unpack(&pack::decode(&latest.content, algorithm)?);
            for (rel_path, content) in contents {
                let path = self.local_root.join(&rel_path);
                if std::fs::read_to_string(&path).ok().as_deref() == Some(content.as_str()) {
                    continue;
                }
                match write_local(&path, &content) {
                    Ok(()) => report.downloaded += 1,
                    Err(e) => report.errors.push(format!("download {rel_path}: {e}")),
                }
            }
        }

        // Superseded artifacts from the pre-upload listing
        for stale in remote.iter().filter(|r| pack::is_artifact(&r.file_name)) {
            tracing::debug!("removing stale packed artifact {}", stale.file_name);
            self.retry.run(|| {
                self.provider
                    .delete_file(&self.org_id, &self.project_id, &stale.uuid)
            })?;
        }
        Ok(report)
    }

    fn download_file(&self, remote_file: &RemoteFileRecord) -> Result<()> {
        let path = self.local_root.join(&remote_file.file_name);
        tracing::debug!("downloading remote-only file {}", remote_file.file_name);
        write_local(&path, &remote_file.content)?;
        set_mtime(&path, &remote_file.created_at);
        Ok(())
    }

    /// Converge local mtimes toward the remote `created_at` of every
    /// synced file, using the pre-upload listing. Best-effort.
    fn sync_local_timestamps(
        &self,
        local: &BTreeMap<String, FileRecord>,
        remote: &[RemoteFileRecord],
        synced: &BTreeSet<String>,
    ) {
        for remote_file in remote {
            if !synced.contains(&remote_file.file_name) {
                continue;
            }
            let path = local
                .get(&remote_file.file_name)
                .map(FileRecord::absolute_path)
                .unwrap_or_else(|| self.local_root.join(&remote_file.file_name));
            if path.is_file() {
                set_mtime(&path, &remote_file.created_at);
            }
        }
    }
}

fn write_local(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, content)?;
    Ok(())
}

fn set_mtime(path: &Path, created_at: &str) {
    match NaiveDateTime::parse_from_str(created_at, REMOTE_TIMESTAMP_FORMAT) {
        Ok(naive) => {
            let utc = naive.and_utc();
            let mtime = filetime::FileTime::from_unix_time(
                utc.timestamp(),
                utc.timestamp_subsec_nanos(),
            );
            if let Err(e) = filetime::set_file_mtime(path, mtime) {
                tracing::warn!("could not set mtime on {}: {e}", path.display());
            }
        }
        Err(e) => {
            tracing::warn!("unparseable remote timestamp '{created_at}': {e}");
        }
    }
}
