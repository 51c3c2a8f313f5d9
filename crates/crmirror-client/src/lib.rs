//! Control-plane resource client for crmirror.
//!
//! Exposes the [`ResourceApi`] facade the sync engine drives — fetch a
//! resource instance or upsert its payload — together with the
//! reqwest-backed [`HttpResourceClient`] speaking the custom-objects REST
//! surface (`/apis/{group}/{version}/namespaces/{namespace}/{plural}`).
//!
//! Error classification is the client's second job: every failure is either
//! transient (retry on the next scheduler tick) or permanent (elevated
//! severity, still retried). See [`ClientError::is_transient`].

mod api;
mod client;
mod error;
mod types;

pub use api::ResourceApi;
pub use client::HttpResourceClient;
pub use error::ClientError;
pub use types::{ClientConfig, ObjectMeta, ResourceObject};
