use serde::{Deserialize, Serialize};

/// Coordinates shared by every synchronized resource: API group, version,
/// namespace, and the object kind the control plane expects in write bodies.
///
/// Immutable after startup. The per-resource part of a coordinate (plural,
/// name) lives on [`crate::SyncMapping`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct GlobalCoordinates {
    /// API group (e.g. "ha.example.com")
    pub group: String,
    /// API version (e.g. "v1")
    pub version: String,
    /// Namespace all synchronized resources live in
    pub namespace: String,
    /// Object kind for write bodies (e.g. "Data")
    pub kind: String,
}

impl GlobalCoordinates {
    /// `group/version` as sent in the `apiVersion` field.
    pub fn api_version(&self) -> String {
        format!("{}/{}", self.group, self.version)
    }
}
