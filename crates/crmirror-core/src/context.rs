//! Explicitly constructed shared state for engine and scheduler.
//!
//! Built once after configuration parsing and passed around by `Arc`; there
//! are no ambient singletons and no teardown-time persistence.

use std::sync::Arc;
use std::time::Duration;

use crate::fingerprint::FingerprintStore;
use crmirror_client::ResourceApi;
use crmirror_types::SyncMapping;

/// What to do when file and resource were both edited between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConflictPolicy {
    /// The co-located file-writing application is authoritative: propagate
    /// file → resource, discarding the cluster-side edit. Trades losing
    /// that edit for guaranteed livelock-freedom.
    #[default]
    PreferFile,
    /// Propagate resource → file instead.
    PreferResource,
}

/// Tunable propagation guards.
#[derive(Debug, Clone)]
pub struct SyncPolicy {
    pub conflict: ConflictPolicy,
    /// When the resource is absent, never touch the local file; recreate
    /// the resource from it instead.
    pub protect_local_on_absent: bool,
    /// Skip resource → file when the resource payload is the empty object.
    pub skip_empty_remote: bool,
}

impl Default for SyncPolicy {
    fn default() -> Self {
        Self {
            conflict: ConflictPolicy::default(),
            protect_local_on_absent: true,
            skip_empty_remote: true,
        }
    }
}

/// Shared state for one daemon run: the immutable mapping set, the
/// fingerprint table, the control-plane client handle, and the policy.
pub struct SyncContext {
    pub mappings: Vec<SyncMapping>,
    pub fingerprints: FingerprintStore,
    pub client: Arc<dyn ResourceApi>,
    pub policy: SyncPolicy,
    pub interval: Duration,
}

impl SyncContext {
    pub fn new(
        mappings: Vec<SyncMapping>,
        client: Arc<dyn ResourceApi>,
        policy: SyncPolicy,
        interval: Duration,
    ) -> Self {
        Self { mappings, fingerprints: FingerprintStore::new(), client, policy, interval }
    }
}
