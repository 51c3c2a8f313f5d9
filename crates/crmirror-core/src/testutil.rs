//! In-memory control-plane double for engine and scheduler tests.

use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Mutex;

use crmirror_client::{ClientError, ResourceApi};
use crmirror_types::ResourceInstance;

/// Which kind of failure to inject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Failure {
    Transient,
    Permanent,
}

fn make_error(failure: Failure) -> ClientError {
    match failure {
        Failure::Transient => {
            ClientError::Server { status: 503, message: "injected outage".to_string() }
        }
        Failure::Permanent => {
            ClientError::Unauthorized { status: 403, message: "injected denial".to_string() }
        }
    }
}

/// Scriptable [`ResourceApi`] over a `Mutex<HashMap>`, with call counting,
/// version-token bookkeeping, and per-plural failure injection.
#[derive(Default)]
pub struct MemoryResourceApi {
    objects: Mutex<HashMap<(String, String), (Value, u64)>>,
    version_counter: AtomicU64,
    fetch_calls: AtomicUsize,
    upsert_calls: AtomicUsize,
    failing: Mutex<HashMap<String, Failure>>,
    fail_next_upsert: Mutex<Option<Failure>>,
}

impl MemoryResourceApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed or externally mutate a resource, bumping its version token the
    /// way an in-cluster edit would.
    pub fn set(&self, plural: &str, name: &str, payload: Value) {
        let ver = self.next_version();
        self.objects
            .lock()
            .unwrap()
            .insert((plural.to_string(), name.to_string()), (payload, ver));
    }

    pub fn delete(&self, plural: &str, name: &str) {
        self.objects.lock().unwrap().remove(&(plural.to_string(), name.to_string()));
    }

    pub fn get(&self, plural: &str, name: &str) -> Option<Value> {
        self.objects
            .lock()
            .unwrap()
            .get(&(plural.to_string(), name.to_string()))
            .map(|(v, _)| v.clone())
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn upsert_calls(&self) -> usize {
        self.upsert_calls.load(Ordering::SeqCst)
    }

    /// Make every call touching `plural` fail until cleared.
    pub fn fail_plural(&self, plural: &str, failure: Failure) {
        self.failing.lock().unwrap().insert(plural.to_string(), failure);
    }

    pub fn clear_failures(&self) {
        self.failing.lock().unwrap().clear();
    }

    /// Fail exactly the next upsert, then recover.
    pub fn fail_next_upsert(&self, failure: Failure) {
        *self.fail_next_upsert.lock().unwrap() = Some(failure);
    }

    fn next_version(&self) -> u64 {
        self.version_counter.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn injected_failure(&self, plural: &str) -> Option<Failure> {
        self.failing.lock().unwrap().get(plural).copied()
    }
}

#[async_trait]
impl ResourceApi for MemoryResourceApi {
    async fn fetch(
        &self,
        plural: &str,
        name: &str,
    ) -> Result<Option<ResourceInstance>, ClientError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.injected_failure(plural) {
            return Err(make_error(failure));
        }

        Ok(self
            .objects
            .lock()
            .unwrap()
            .get(&(plural.to_string(), name.to_string()))
            .map(|(v, ver)| ResourceInstance::new(v.clone(), ver.to_string())))
    }

    async fn upsert(
        &self,
        plural: &str,
        name: &str,
        payload: &Value,
        resource_version: Option<&str>,
    ) -> Result<ResourceInstance, ClientError> {
        self.upsert_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.injected_failure(plural) {
            return Err(make_error(failure));
        }
        if let Some(failure) = self.fail_next_upsert.lock().unwrap().take() {
            return Err(make_error(failure));
        }

        let key = (plural.to_string(), name.to_string());
        let mut objects = self.objects.lock().unwrap();
        match (objects.get(&key), resource_version) {
            (Some((_, ver)), Some(rv)) if rv != ver.to_string() => {
                return Err(ClientError::Conflict {
                    message: format!("stale version token {rv} (current {ver})"),
                });
            }
            (Some(_), None) => {
                return Err(ClientError::Conflict {
                    message: format!("{plural}/{name} already exists"),
                });
            }
            (None, Some(_)) => {
                return Err(ClientError::Conflict {
                    message: format!("{plural}/{name} vanished during replace"),
                });
            }
            _ => {}
        }

        let ver = self.version_counter.fetch_add(1, Ordering::SeqCst) + 1;
        objects.insert(key, (payload.clone(), ver));
        Ok(ResourceInstance::new(payload.clone(), ver.to_string()))
    }
}
