//! # crmirror Types
//!
//! Core types, models, and error definitions for crmirror.
//!
//! This crate provides the foundational type system for the crmirror
//! workspace:
//!
//! - **`error`** - Startup-fatal configuration errors
//! - **`models`** - Domain models (SyncMapping, GlobalCoordinates, ResourceInstance)
//!
//! ## Architecture Role
//!
//! `crmirror-types` sits at the bottom of the dependency graph:
//!
//! ```text
//!          crmirror-types (this crate)
//!                  │
//!         ┌────────┴────────┐
//!         ▼                 ▼
//!  crmirror-client   crmirror-core
//!         │                 │
//!         └────────┬────────┘
//!                  ▼
//!          crmirror-daemon
//! ```
//!
//! All types are designed to be:
//! - **Serializable** via serde
//! - **Clone** for cheap sharing across async boundaries
//! - **PartialEq** for testing and comparison

pub mod error;
pub mod models;

// Re-export error types for convenience
pub use error::ConfigError;

// Re-export core model types
pub use models::{GlobalCoordinates, MappingSet, ResourceInstance, SyncMapping};
