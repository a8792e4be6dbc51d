//! MD5 content fingerprints
//!
//! The remote provider compares files by an MD5 hex digest over UTF-8
//! content, so the same digest has to come out of local hashing and
//! remote-content hashing. Line endings are normalized to `\n` before
//! hashing to keep the comparison stable across platforms.

use md5::{Digest, Md5};
use std::path::Path;

/// Compute the MD5 fingerprint of text content.
///
/// CRLF sequences are folded to LF before hashing.
pub fn compute_fingerprint(content: &str) -> String {
    let normalized = normalize_newlines(content);
    let mut hasher = Md5::new();
    hasher.update(normalized.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Compute the fingerprint of a file's contents.
///
/// Returns `Ok(None)` when the file is not valid UTF-8 text; such files
/// are excluded from the sync set rather than treated as errors.
///
/// # Errors
///
/// Returns an error if the file cannot be read.
pub fn fingerprint_file(path: &Path) -> std::io::Result<Option<String>> {
    let bytes = std::fs::read(path)?;
    match String::from_utf8(bytes) {
        Ok(content) => Ok(Some(compute_fingerprint(&content))),
        Err(_) => {
            tracing::debug!("unable to read {} as UTF-8 text, skipping", path.display());
            Ok(None)
        }
    }
}

fn normalize_newlines(content: &str) -> std::borrow::Cow<'_, str> {
    if content.contains("\r\n") {
        std::borrow::Cow::Owned(content.replace("\r\n", "\n"))
    } else {
        std::borrow::Cow::Borrowed(content)
    }
}
