use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A custom resource instance as observed from the control plane.
///
/// Carries the opaque mirrored payload and the server-assigned version
/// token. The token is threaded into optimistic-concurrency replace calls
/// only; change detection never looks at it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceInstance {
    /// The mirrored JSON document (the resource's `data` field)
    pub data: Value,
    /// Server-assigned version token (`metadata.resourceVersion`)
    pub resource_version: String,
}

impl ResourceInstance {
    pub fn new(data: Value, resource_version: impl Into<String>) -> Self {
        Self { data, resource_version: resource_version.into() }
    }

    /// True when the payload is the empty object `{}`.
    pub fn is_empty_payload(&self) -> bool {
        self.data.as_object().is_some_and(|m| m.is_empty())
    }
}
