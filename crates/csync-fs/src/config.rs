//! JSON configuration loading and saving
//!
//! Every file ClaudeSync persists is UTF-8 JSON with 2-space indentation;
//! the on-disk byte layout is part of the compatibility contract with the
//! original tool, so all reads and writes funnel through this store.

use crate::{Error, NormalizedPath, Result, io};
use serde::{Serialize, de::DeserializeOwned};

/// JSON configuration store with atomic writes.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConfigStore;

impl ConfigStore {
    pub fn new() -> Self {
        Self
    }

    /// Load a typed value from a JSON file.
    pub fn load<T: DeserializeOwned>(&self, path: &NormalizedPath) -> Result<T> {
        let content = io::read_text(path)?;
        serde_json::from_str(&content).map_err(|e| Error::ConfigParse {
            path: path.to_native(),
            message: e.to_string(),
        })
    }

    /// Save a typed value as 2-space-indented JSON.
    ///
    /// Uses atomic write to prevent corruption.
    pub fn save<T: Serialize>(&self, path: &NormalizedPath, value: &T) -> Result<()> {
        let content = serde_json::to_string_pretty(value).map_err(|e| Error::ConfigSerialize {
            path: path.to_native(),
            message: e.to_string(),
        })?;
        io::write_atomic(path, content.as_bytes())
    }
}
