//! Field mapping between API-facing names and backing entity properties
//!
//! A [`PropertyMapping`] translates the public names clients use in `orderBy`
//! (`Name`, `Age`) into the entity properties records are actually sorted by
//! (`LastName`, `FirstName`, `DateOfBirth`). The [`PropertyMappingRegistry`]
//! holds one mapping per (entity, DTO) type pair and is built once at startup.

mod property;
mod registry;

pub use property::{PropertyMapping, PropertyMappingBuilder, PropertyMappingValue};
pub use registry::PropertyMappingRegistry;
