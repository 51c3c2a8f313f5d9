//! Error types for the resource client.

use thiserror::Error;

/// Errors that can occur when talking to the control plane.
///
/// Each variant is either transient (worth retrying on the next tick with
/// unchanged fingerprint state) or permanent (logged at elevated severity,
/// still retried every tick). [`ClientError::is_transient`] is the single
/// classification point the engine relies on.
#[derive(Error, Debug)]
pub enum ClientError {
    /// HTTP request failed before a response arrived (connect, TLS,
    /// timeout). Timeouts land here: the per-call deadline expiring is a
    /// transient condition by contract.
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Server returned 429 Too Many Requests.
    #[error("Throttled (429): retry after {retry_after:?}s")]
    Throttled {
        /// Seconds to wait before retrying, if provided by the server.
        retry_after: Option<u64>,
    },

    /// Server returned a 5xx error.
    #[error("Server error ({status}): {message}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },

    /// Optimistic-concurrency conflict, or the replace target vanished
    /// between fetch and write. The next tick re-fetches and retries.
    #[error("Write conflict: {message}")]
    Conflict {
        /// Description of the conflicting write.
        message: String,
    },

    /// Credentials were rejected (401/403).
    #[error("Authorization rejected ({status}): {message}")]
    Unauthorized {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },

    /// The resource type's collection does not exist on the control plane.
    #[error("Resource type {plural:?} is not registered with the control plane")]
    UnknownResourceType {
        /// The plural whose collection was missing.
        plural: String,
    },

    /// The control plane rejected the payload against the resource schema
    /// (422).
    #[error("Payload rejected by resource schema: {message}")]
    SchemaRejected {
        /// Rejection detail from the server.
        message: String,
    },

    /// Any other client-side rejection (4xx).
    #[error("Request rejected ({status}): {message}")]
    Rejected {
        /// HTTP status code.
        status: u16,
        /// Error message from the server.
        message: String,
    },

    /// A success response that could not be parsed as a resource object.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The configured base URL is not a valid URL.
    #[error("Invalid base URL {url:?}: {message}")]
    InvalidBaseUrl {
        /// The rejected URL text.
        url: String,
        /// Parse failure detail.
        message: String,
    },
}

impl ClientError {
    /// Transient failures are retried on the next tick with fingerprint
    /// state untouched; everything else is permanent.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            ClientError::Request(_)
                | ClientError::Throttled { .. }
                | ClientError::Server { .. }
                | ClientError::Conflict { .. }
        )
    }
}
