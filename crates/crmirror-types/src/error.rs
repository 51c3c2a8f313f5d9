//! Startup-fatal configuration errors.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while turning raw configuration into a runnable sync setup.
///
/// Every variant is fatal: the daemon refuses to start rather than run with
/// a partial or ambiguous mapping set.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "details")]
pub enum ConfigError {
    /// A mapping line does not match `path=plural:name`.
    #[error("Malformed mapping on line {line}: {text:?} (expected path=plural:name)")]
    MalformedMapping {
        /// 1-based line number within the mapping text
        line: usize,
        /// The offending line, trimmed
        text: String,
    },

    /// The same file path appears in more than one mapping.
    #[error("Duplicate file path in mapping: {path}")]
    DuplicateFilePath {
        /// The repeated path
        path: String,
    },

    /// A mapping component (path, plural, or name) is empty.
    #[error("Empty {field} on line {line}")]
    EmptyField {
        /// Which component was empty
        field: String,
        /// 1-based line number within the mapping text
        line: usize,
    },

    /// The polling interval is zero, negative, or not a number.
    #[error("Invalid sync interval: {value:?} (must be a positive number of seconds)")]
    InvalidInterval {
        /// The rejected raw value
        value: String,
    },

    /// Credentials for the control plane could not be resolved.
    #[error("Credential resolution failed: {message}")]
    Credentials {
        /// Description of what was missing or unreadable
        message: String,
    },
}
