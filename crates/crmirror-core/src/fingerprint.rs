//! Content fingerprinting and the per-mapping last-synchronized record.
//!
//! A fingerprint is a change-detection hash only, not a security or
//! integrity mechanism. Content is canonicalized before hashing so key
//! order and whitespace never register as change.

use dashmap::DashMap;
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::fmt;
use std::path::PathBuf;

use crmirror_types::SyncMapping;

/// Truncated hex SHA-256 of a JSON document in canonical form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint a JSON document.
    ///
    /// `serde_json::Value` keeps object keys sorted, so serializing
    /// compactly yields a canonical form: two documents that differ only in
    /// key order or whitespace hash identically.
    pub fn of(value: &Value) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(value.to_string().as_bytes());
        let hash = format!("{:x}", hasher.finalize());
        Self(format!("fp-{}", &hash[..16]))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last-synchronized fingerprints for one mapping.
///
/// Both sides are `None` until the first successful propagation, which is
/// what forces first-tick reconciliation after a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FingerprintRecord {
    pub last_file: Option<Fingerprint>,
    pub last_resource: Option<Fingerprint>,
}

/// In-memory fingerprint table, keyed by mapping identity (the file path).
///
/// Each key is written only by its own mapping's engine invocation, after a
/// successful propagation. Not persisted anywhere by design.
#[derive(Debug, Default)]
pub struct FingerprintStore {
    records: DashMap<PathBuf, FingerprintRecord>,
}

impl FingerprintStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// The record for a mapping; empty if the mapping was never synced.
    pub fn get(&self, mapping: &SyncMapping) -> FingerprintRecord {
        self.records
            .get(&mapping.file_path)
            .map(|r| r.clone())
            .unwrap_or_default()
    }

    pub fn record_file_sync(&self, mapping: &SyncMapping, fp: Fingerprint) {
        self.records
            .entry(mapping.file_path.clone())
            .or_default()
            .last_file = Some(fp);
    }

    pub fn record_resource_sync(&self, mapping: &SyncMapping, fp: Fingerprint) {
        self.records
            .entry(mapping.file_path.clone())
            .or_default()
            .last_resource = Some(fp);
    }
}
