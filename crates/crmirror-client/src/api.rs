use async_trait::async_trait;
use serde_json::Value;

use crate::error::ClientError;
use crmirror_types::ResourceInstance;

/// Facade over the control plane's custom-objects API.
///
/// The sync engine only ever needs these two calls. The plural/name pair is
/// the per-mapping half of a resource coordinate; the shared half (group,
/// version, namespace, kind) is fixed at client construction.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    /// Fetch a resource instance. `Ok(None)` means the resource does not
    /// exist — that is an ordinary observation, not an error.
    async fn fetch(&self, plural: &str, name: &str)
        -> Result<Option<ResourceInstance>, ClientError>;

    /// Create the resource (no `resource_version`) or replace its payload
    /// (with the version token observed on fetch, for optimistic
    /// concurrency). The control plane echoes the stored payload back.
    async fn upsert(
        &self,
        plural: &str,
        name: &str,
        payload: &Value,
        resource_version: Option<&str>,
    ) -> Result<ResourceInstance, ClientError>;
}
