//! Runtime sync settings
//!
//! Settings come from the global `~/.claudesync/config.json` overlaid by
//! the per-workspace `.claudesync/config.local.json`; a key present in
//! the local file wins.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Compression algorithm for the packed sync strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Plain per-file reconciliation (the default)
    #[default]
    None,
    Zlib,
    Gzip,
}

fn default_upload_delay() -> f64 {
    0.5
}

fn default_max_retries() -> u32 {
    3
}

fn default_retry_delay() -> f64 {
    1.0
}

/// Runtime settings consumed by the sync engine and the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Seconds to wait after each remote mutation (rate-limit respect)
    #[serde(default = "default_upload_delay")]
    pub upload_delay: f64,
    #[serde(default)]
    pub two_way_sync: bool,
    #[serde(default)]
    pub prune_remote_files: bool,
    #[serde(default)]
    pub compression_algorithm: Compression,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    /// Seconds between retry attempts on the rate-limit error class
    #[serde(default = "default_retry_delay")]
    pub retry_delay: f64,
    #[serde(default)]
    pub active_organization_id: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            upload_delay: default_upload_delay(),
            two_way_sync: false,
            prune_remote_files: false,
            compression_algorithm: Compression::None,
            max_retries: default_max_retries(),
            retry_delay: default_retry_delay(),
            active_organization_id: None,
        }
    }
}

impl Settings {
    /// Load settings: global file first, then the local overlay.
    ///
    /// Missing files contribute nothing; missing keys take defaults.
    pub fn load(global_dir: Option<&Path>, local_config_dir: Option<&Path>) -> Result<Self> {
        let mut merged = serde_json::Map::new();

        if let Some(dir) = global_dir {
            merge_file(&mut merged, &dir.join("config.json"))?;
        }
        if let Some(dir) = local_config_dir {
            merge_file(&mut merged, &dir.join("config.local.json"))?;
        }

        serde_json::from_value(serde_json::Value::Object(merged)).map_err(Error::from)
    }

    /// The inter-call delay as a [`Duration`].
    pub fn upload_delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.upload_delay.max(0.0))
    }

    /// The retry backoff as a [`Duration`].
    pub fn retry_delay_duration(&self) -> Duration {
        Duration::from_secs_f64(self.retry_delay.max(0.0))
    }
}

fn merge_file(target: &mut serde_json::Map<String, serde_json::Value>, path: &Path) -> Result<()> {
    if !path.is_file() {
        return Ok(());
    }
    let content = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&content).map_err(|e| {
        Error::configuration(format!("Invalid settings file {}: {e}", path.display()))
    })?;
    if let serde_json::Value::Object(map) = value {
        for (key, value) in map {
            target.insert(key, value);
        }
    }
    Ok(())
}
