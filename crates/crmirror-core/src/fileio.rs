//! JSON file reads and atomic writes.

use serde_json::Value;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a local file could not be read this tick.
#[derive(Error, Debug)]
pub enum FileError {
    /// The file does not exist.
    #[error("file does not exist")]
    Missing,

    /// The file exists but could not be read.
    #[error("unreadable: {0}")]
    Unreadable(#[source] io::Error),

    /// The file content is not well-formed JSON.
    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Read and parse a JSON file.
pub fn read_json(path: &Path) -> Result<Value, FileError> {
    let content = match fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Err(FileError::Missing),
        Err(e) => return Err(FileError::Unreadable(e)),
    };
    Ok(serde_json::from_str(&content)?)
}

/// Write a JSON document to `path` atomically.
///
/// The content goes to a sibling temp file first and is renamed over the
/// target, so a reader observes either the complete old content or the
/// complete new content, never a partial file. Intermediate directories are
/// created if needed.
pub fn write_json_atomic(path: &Path, value: &Value) -> io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let temp_path = temp_sibling(path);
    let content = serde_json::to_string_pretty(value)?;

    fs::write(&temp_path, content)?;
    fs::rename(&temp_path, path)
}

/// `<name>.tmp` next to the target, so the rename stays on one filesystem.
fn temp_sibling(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_else(|| OsString::from("out"));
    name.push(".tmp");
    path.with_file_name(name)
}
