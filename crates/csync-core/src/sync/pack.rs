//! Packed transport for the compressed sync strategy
//!
//! Instead of per-file reconciliation, the whole sync set is framed into
//! one text document, compressed, and carried as a single base64 remote
//! artifact named `claudesync_packed_<timestamp>.dat`. The frame markers
//! embed the file path, so file contents that merely look like markers
//! for other paths survive a round trip byte-for-byte.

use crate::config::Compression;
use crate::provider::RemoteFileRecord;
use crate::record::FileRecord;
use crate::{Error, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use csync_fs::constants::{PACKED_FILE_PREFIX, PACKED_FILE_SUFFIX};
use flate2::read::{GzDecoder, ZlibDecoder};
use flate2::write::{GzEncoder, ZlibEncoder};
use std::collections::BTreeMap;
use std::io::{Read, Write};

const BEGIN_MARKER: &str = "--- BEGIN FILE: ";
const MARKER_CLOSE: &str = " ---\n";

/// Read every record's content from disk and frame it into one packed
/// document, in path order.
pub fn pack(files: &BTreeMap<String, FileRecord>) -> Result<String> {
    let mut contents = BTreeMap::new();
    for (rel_path, record) in files {
        let content = std::fs::read_to_string(record.absolute_path())?;
        contents.insert(rel_path.clone(), content);
    }
    Ok(pack_contents(&contents))
}

/// Frame path/content pairs into the packed document.
pub fn pack_contents(contents: &BTreeMap<String, String>) -> String {
    let mut packed = String::new();
    for (path, content) in contents {
        packed.push_str(BEGIN_MARKER);
        packed.push_str(path);
        packed.push_str(MARKER_CLOSE);
        packed.push_str(content);
        packed.push_str(&format!("\n--- END FILE: {path} ---\n"));
    }
    packed
}

/// Recover path/content pairs from a packed document. A truncated
/// final frame flushes its remaining content as the last file.
pub fn unpack(packed: &str) -> BTreeMap<String, String> {
    let mut files = BTreeMap::new();
    let mut rest = packed;

    while let Some(start) = rest.find(BEGIN_MARKER) {
        let after = &rest[start + BEGIN_MARKER.len()..];
        let Some(name_end) = after.find(MARKER_CLOSE) else {
            break;
        };
        let path = &after[..name_end];
        let body = &after[name_end + MARKER_CLOSE.len()..];

        let end_marker = format!("\n--- END FILE: {path} ---");
        match body.find(&end_marker) {
            Some(end) => {
                files.insert(path.to_string(), body[..end].to_string());
                rest = &body[end + end_marker.len()..];
            }
            None => {
                files.insert(path.to_string(), body.to_string());
                break;
            }
        }
    }
    files
}

/// Compress and base64-encode a packed document for upload.
/// [`Compression::None`] passes the text through unchanged.
pub fn encode(packed: &str, algorithm: Compression) -> Result<String> {
    let compressed = match algorithm {
        Compression::None => return Ok(packed.to_string()),
        Compression::Zlib => {
            let mut encoder = ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(packed.as_bytes())?;
            encoder.finish()?
        }
        Compression::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), flate2::Compression::default());
            encoder.write_all(packed.as_bytes())?;
            encoder.finish()?
        }
    };
    Ok(BASE64.encode(compressed))
}

/// Reverse of [`encode`].
pub fn decode(encoded: &str, algorithm: Compression) -> Result<String> {
    let compressed = match algorithm {
        Compression::None => return Ok(encoded.to_string()),
        _ => BASE64
            .decode(encoded.trim())
            .map_err(|e| Error::configuration(format!("corrupt packed artifact: {e}")))?,
    };

    let mut packed = String::new();
    match algorithm {
        Compression::None => unreachable!(),
        Compression::Zlib => ZlibDecoder::new(compressed.as_slice())
            .read_to_string(&mut packed)
            .map_err(|e| Error::configuration(format!("corrupt packed artifact: {e}")))?,
        Compression::Gzip => GzDecoder::new(compressed.as_slice())
            .read_to_string(&mut packed)
            .map_err(|e| Error::configuration(format!("corrupt packed artifact: {e}")))?,
    };
    Ok(packed)
}

/// Name for a fresh packed artifact, timestamped to local time.
pub fn artifact_name() -> String {
    format!(
        "{PACKED_FILE_PREFIX}{}{PACKED_FILE_SUFFIX}",
        chrono::Local::now().format("%Y%m%d%H%M%S")
    )
}

/// Whether a remote file name is a packed artifact.
pub fn is_artifact(file_name: &str) -> bool {
    file_name.starts_with(PACKED_FILE_PREFIX) && file_name.ends_with(PACKED_FILE_SUFFIX)
}

/// The newest packed artifact in a remote listing. Timestamps embed as
/// `YYYYMMDDHHMMSS`, so lexical order is chronological order.
pub fn latest_artifact(remote: &[RemoteFileRecord]) -> Option<&RemoteFileRecord> {
    remote
        .iter()
        .filter(|r| is_artifact(&r.file_name))
        .max_by(|a, b| a.file_name.cmp(&b.file_name))
}
