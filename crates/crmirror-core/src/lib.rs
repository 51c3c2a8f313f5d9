//! # crmirror Core
//!
//! The bidirectional synchronization engine keeping local JSON files and
//! cluster-resident custom resources mutually consistent:
//!
//! - **`fingerprint`** - Canonical content hashing and the per-mapping
//!   last-synchronized record (the loop-prevention mechanism)
//! - **`fileio`** - JSON file reads and atomic writes
//! - **`engine`** - The per-mapping compare-and-propagate algorithm and its
//!   conflict policy
//! - **`scheduler`** - One interval-driven worker per mapping
//! - **`context`** - The explicitly constructed state shared by engine and
//!   scheduler
//!
//! State is deliberately non-durable: a restart clears every fingerprint
//! record and the first tick re-compares both sides from live content.

pub mod context;
pub mod engine;
pub mod error;
pub mod fileio;
pub mod fingerprint;
pub mod scheduler;

#[cfg(test)]
pub mod testutil;

pub use context::{ConflictPolicy, SyncContext, SyncPolicy};
pub use engine::{SyncEngine, SyncOutcome};
pub use error::SyncError;
pub use fileio::FileError;
pub use fingerprint::{Fingerprint, FingerprintRecord, FingerprintStore};
