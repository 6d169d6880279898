//! Public field name to backing property translation tables

use std::collections::HashMap;

use crate::error::{Error, Result};

/// Backing properties for one public field
///
/// `revert` marks fields whose natural sort sense is the opposite of their
/// backing property (ascending age means descending date of birth).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMappingValue {
    destinations: Vec<String>,
    revert: bool,
}

impl PropertyMappingValue {
    /// Backing properties in declared order, first one dominant
    #[must_use]
    pub fn destinations(&self) -> &[String] {
        &self.destinations
    }

    /// Whether the requested direction is flipped for this field
    #[must_use]
    pub fn revert(&self) -> bool {
        self.revert
    }
}

/// Immutable table of public field name → [`PropertyMappingValue`]
///
/// Lookups ignore ASCII case. Built through [`PropertyMapping::builder`].
///
/// # Example
///
/// ```rust
/// use library_api::mapping::PropertyMapping;
///
/// let mapping = PropertyMapping::builder()
///     .map("Name", ["LastName", "FirstName"])
///     .map_reverted("Age", ["DateOfBirth"])
///     .build()
///     .unwrap();
///
/// assert!(mapping.get("age").unwrap().revert());
/// assert!(mapping.has_valid_mapping("name, age desc"));
/// assert!(!mapping.has_valid_mapping("name, title"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyMapping {
    entries: HashMap<String, PropertyMappingValue>,
    keys: Vec<String>,
}

impl PropertyMapping {
    /// Start building a mapping table
    #[must_use]
    pub fn builder() -> PropertyMappingBuilder {
        PropertyMappingBuilder::default()
    }

    /// Look up a public field name, ignoring case
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropertyMappingValue> {
        self.entries.get(&key.to_ascii_lowercase())
    }

    /// Whether `key` names a mapped public field, ignoring case
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Public field names in registration order, with their declared casing
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.keys.iter().map(String::as_str)
    }

    /// Check a comma separated field or sort list against the table
    ///
    /// Every token is trimmed and cut at its first space, so `"age desc"`
    /// is looked up as `"age"`. A blank list is always valid.
    #[must_use]
    pub fn has_valid_mapping(&self, fields: &str) -> bool {
        if fields.trim().is_empty() {
            return true;
        }

        fields.split(',').all(|field| {
            let trimmed = field.trim();
            let name = match trimmed.find(' ') {
                Some(index) => &trimmed[..index],
                None => trimmed,
            };
            self.contains_key(name)
        })
    }
}

/// Builder for [`PropertyMapping`]
///
/// Duplicate keys (ignoring case) and entries without destinations are
/// reported by [`build`](Self::build) as configuration errors.
#[derive(Debug, Default)]
pub struct PropertyMappingBuilder {
    entries: Vec<(String, PropertyMappingValue)>,
}

impl PropertyMappingBuilder {
    /// Map a public field onto one or more backing properties
    #[must_use]
    pub fn map<I, S>(self, key: impl Into<String>, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(key.into(), destinations, false)
    }

    /// Map a public field whose sort direction is inverted relative to its backing properties
    #[must_use]
    pub fn map_reverted<I, S>(self, key: impl Into<String>, destinations: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.push(key.into(), destinations, true)
    }

    fn push<I, S>(mut self, key: String, destinations: I, revert: bool) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let destinations = destinations.into_iter().map(Into::into).collect();
        self.entries.push((
            key,
            PropertyMappingValue {
                destinations,
                revert,
            },
        ));
        self
    }

    /// Validate and freeze the table
    pub fn build(self) -> Result<PropertyMapping> {
        let mut entries = HashMap::with_capacity(self.entries.len());
        let mut keys = Vec::with_capacity(self.entries.len());

        for (key, value) in self.entries {
            if value.destinations.is_empty() {
                return Err(Error::configuration(format!(
                    "Mapping for '{}' has no destination properties",
                    key
                )));
            }
            if entries.insert(key.to_ascii_lowercase(), value).is_some() {
                return Err(Error::configuration(format!(
                    "Mapping key '{}' is registered more than once",
                    key
                )));
            }
            keys.push(key);
        }

        Ok(PropertyMapping { entries, keys })
    }
}
