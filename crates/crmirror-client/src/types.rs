use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Connection settings for [`crate::HttpResourceClient`].
///
/// Resolved by the surrounding layer (in-cluster service-account mount or
/// external credentials) before the core runs.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API server base URL (e.g. "https://10.96.0.1:443")
    pub base_url: String,
    /// Bearer token sent on every request, if any
    pub bearer_token: Option<String>,
    /// PEM bundle to trust for the server's TLS certificate
    pub ca_bundle_pem: Option<Vec<u8>>,
    /// Disable TLS verification (external development setups only)
    pub accept_invalid_certs: bool,
    /// Per-call deadline; expiry is a transient error
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "https://127.0.0.1:6443".to_string(),
            bearer_token: None,
            ca_bundle_pem: None,
            accept_invalid_certs: false,
            timeout_secs: 30,
        }
    }
}

/// Wire shape of a custom resource object.
///
/// The mirrored document travels verbatim under the unstructured `data`
/// field; the resource type's schema keeps that field open so arbitrary
/// JSON round-trips losslessly. Unknown metadata fields from the server are
/// ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResourceObject {
    pub api_version: String,
    pub kind: String,
    pub metadata: ObjectMeta,
    #[serde(default = "empty_object")]
    pub data: Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ObjectMeta {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_version: Option<String>,
}

fn empty_object() -> Value {
    Value::Object(serde_json::Map::new())
}
