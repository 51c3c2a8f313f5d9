//! Unified error type for sync operations.

use std::path::PathBuf;
use thiserror::Error;

use crate::fileio::FileError;
use crmirror_client::ClientError;

/// Per-tick, per-mapping sync failures.
///
/// None of these are fatal: the failing mapping is skipped for the tick and
/// retried on the next one, with fingerprint state untouched so a pending
/// change is never silently dropped.
#[derive(Error, Debug)]
pub enum SyncError {
    /// The local file is missing, unreadable, or not well-formed JSON.
    #[error("File unavailable at {path}: {source}")]
    FileUnavailable {
        path: PathBuf,
        #[source]
        source: FileError,
    },

    /// A control-plane call failed; see [`ClientError::is_transient`] for
    /// the severity split.
    #[error("Control plane error: {0}")]
    Client(#[from] ClientError),

    /// The local file could not be rewritten.
    #[error("Failed to write {path}: {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
