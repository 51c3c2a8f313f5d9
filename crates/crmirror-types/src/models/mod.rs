//! Domain models for file ↔ custom-resource synchronization.

mod coordinates;
mod mapping;
mod resource;

pub use coordinates::GlobalCoordinates;
pub use mapping::{MappingSet, SyncMapping};
pub use resource::ResourceInstance;
