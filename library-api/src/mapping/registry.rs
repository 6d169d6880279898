//! Startup-built registry of property mappings keyed by (source, destination) type pair
//!
//! The source is the public DTO whose names clients send; the destination is
//! the entity whose properties back them.

use std::any::{type_name, TypeId};

use crate::error::{Error, Result};
use crate::model::{Author, AuthorDto, Book, BookDto};

use super::property::PropertyMapping;

#[derive(Debug)]
struct Registration {
    source: TypeId,
    destination: TypeId,
    source_name: &'static str,
    destination_name: &'static str,
    mapping: PropertyMapping,
}

/// Immutable set of [`PropertyMapping`]s, one per (DTO, entity) pair
///
/// Built once at startup and shared read-only (typically behind an `Arc`).
/// Lookups that find zero or several registrations for a pair are wiring
/// mistakes and surface as [`Error::Configuration`].
///
/// # Example
///
/// ```rust
/// use library_api::mapping::PropertyMappingRegistry;
/// use library_api::model::{Author, AuthorDto};
///
/// let registry = PropertyMappingRegistry::library().unwrap();
/// let mapping = registry.get_mapping::<AuthorDto, Author>().unwrap();
/// assert!(mapping.contains_key("age"));
/// ```
#[derive(Debug, Default)]
pub struct PropertyMappingRegistry {
    registrations: Vec<Registration>,
}

impl PropertyMappingRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the author and book sort mappings
    pub fn library() -> Result<Self> {
        let authors = PropertyMapping::builder()
            .map("Id", ["Id"])
            .map("Genre", ["Genre"])
            .map_reverted("Age", ["DateOfBirth"])
            .map("Name", ["LastName", "FirstName"])
            .build()?;

        let books = PropertyMapping::builder()
            .map("Id", ["Id"])
            .map("Title", ["Title"])
            .map("Description", ["Description"])
            .build()?;

        Ok(Self::new()
            .register::<AuthorDto, Author>(authors)
            .register::<BookDto, Book>(books))
    }

    /// Add a mapping for the `S` → `D` pair
    #[must_use]
    pub fn register<S: 'static, D: 'static>(mut self, mapping: PropertyMapping) -> Self {
        tracing::debug!(
            source = type_name::<S>(),
            destination = type_name::<D>(),
            "Registered property mapping"
        );
        self.registrations.push(Registration {
            source: TypeId::of::<S>(),
            destination: TypeId::of::<D>(),
            source_name: type_name::<S>(),
            destination_name: type_name::<D>(),
            mapping,
        });
        self
    }

    /// The single mapping registered for `S` → `D`
    pub fn get_mapping<S: 'static, D: 'static>(&self) -> Result<&PropertyMapping> {
        let source = TypeId::of::<S>();
        let destination = TypeId::of::<D>();

        let mut matches = self
            .registrations
            .iter()
            .filter(|r| r.source == source && r.destination == destination);

        match (matches.next(), matches.next()) {
            (Some(registration), None) => Ok(&registration.mapping),
            (None, _) => {
                tracing::error!(
                    source = type_name::<S>(),
                    destination = type_name::<D>(),
                    "No property mapping registered"
                );
                Err(Error::configuration(format!(
                    "Cannot find exact property mapping instance for <{},{}>: none registered",
                    type_name::<S>(),
                    type_name::<D>()
                )))
            }
            (Some(_), Some(_)) => {
                tracing::error!(
                    source = type_name::<S>(),
                    destination = type_name::<D>(),
                    "Ambiguous property mapping registration"
                );
                Err(Error::configuration(format!(
                    "Cannot find exact property mapping instance for <{},{}>: registered more than once",
                    type_name::<S>(),
                    type_name::<D>()
                )))
            }
        }
    }

    /// Check `fields` against the `S` → `D` mapping
    pub fn valid_mapping_exists_for<S: 'static, D: 'static>(&self, fields: &str) -> Result<bool> {
        Ok(self.get_mapping::<S, D>()?.has_valid_mapping(fields))
    }

    /// Registered pairs as (source, destination) type names
    pub fn pairs(&self) -> impl Iterator<Item = (&'static str, &'static str)> + '_ {
        self.registrations
            .iter()
            .map(|r| (r.source_name, r.destination_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(key: &str) -> PropertyMapping {
        PropertyMapping::builder().map(key, [key]).build().unwrap()
    }

    #[test]
    fn test_library_registry_resolves_both_pairs() {
        let registry = PropertyMappingRegistry::library().unwrap();
        let authors = registry.get_mapping::<AuthorDto, Author>().unwrap();
        assert!(authors.contains_key("Name"));
        assert!(authors.get("Age").unwrap().revert());

        let books = registry.get_mapping::<BookDto, Book>().unwrap();
        assert!(books.contains_key("title"));
        assert!(!books.contains_key("age"));
    }

    #[test]
    fn test_missing_pair_is_configuration_error() {
        let registry = PropertyMappingRegistry::new().register::<BookDto, Book>(single("Title"));
        let err = registry.get_mapping::<AuthorDto, Author>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_duplicate_pair_is_configuration_error() {
        let registry = PropertyMappingRegistry::new()
            .register::<AuthorDto, Author>(single("Name"))
            .register::<AuthorDto, Author>(single("Genre"));
        let err = registry.get_mapping::<AuthorDto, Author>().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_pair_direction_matters() {
        let registry = PropertyMappingRegistry::new().register::<AuthorDto, Author>(single("Name"));
        assert!(registry.get_mapping::<AuthorDto, Author>().is_ok());
        assert!(registry.get_mapping::<Author, AuthorDto>().is_err());
    }

    #[test]
    fn test_valid_mapping_exists_for() {
        let registry = PropertyMappingRegistry::library().unwrap();
        assert!(registry
            .valid_mapping_exists_for::<AuthorDto, Author>("name, age desc")
            .unwrap());
        assert!(!registry
            .valid_mapping_exists_for::<AuthorDto, Author>("title")
            .unwrap());
    }

    #[test]
    fn test_pairs_lists_registrations() {
        let registry = PropertyMappingRegistry::library().unwrap();
        let pairs: Vec<_> = registry.pairs().collect();
        assert_eq!(pairs.len(), 2);
        assert!(pairs[0].0.ends_with("AuthorDto"));
        assert!(pairs[0].1.ends_with("Author"));
    }

    #[test]
    fn test_registry_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<PropertyMappingRegistry>();
    }
}
