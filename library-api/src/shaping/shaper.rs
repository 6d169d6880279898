//! Projection of DTOs onto requested field subsets

use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{Error, Result};

use super::fields::{resolve_field, Shape};

/// Ordered field name → value map produced by [`shape`]
///
/// Serializes as a plain JSON object with keys in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ShapedRecord(Map<String, Value>);

impl ShapedRecord {
    /// Value of `key`
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Insert or replace a value; a replaced key keeps its position
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        self.0.insert(key.into(), value);
    }

    /// Keys in output order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl From<ShapedRecord> for Value {
    fn from(record: ShapedRecord) -> Self {
        Value::Object(record.0)
    }
}

/// Project `record` onto the comma separated `fields`
///
/// Blank `fields` yields every declared field in declared order. Otherwise
/// fields appear in the caller's order under their declared spelling. A
/// repeated field keeps the position of its first occurrence. Unknown fields
/// fail with [`Error::InvalidArgument`]; callers normally reject them earlier
/// with [`type_has_properties`](super::type_has_properties).
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use library_api::model::{Author, AuthorDto};
/// use library_api::shaping::shape;
///
/// let author = Author::new("Stephen", "King", NaiveDate::from_ymd_opt(1947, 9, 21).unwrap(), "Horror");
/// let dto = AuthorDto::from_author(&author, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
///
/// let shaped = shape(&dto, "Name,id").unwrap();
/// assert_eq!(shaped.keys().collect::<Vec<_>>(), vec!["name", "id"]);
/// ```
pub fn shape<T: Shape>(record: &T, fields: &str) -> Result<ShapedRecord> {
    let mut shaped = ShapedRecord::default();

    if fields.trim().is_empty() {
        for field in T::FIELDS {
            shaped.insert(*field, record.field_value(field).unwrap_or(Value::Null));
        }
        return Ok(shaped);
    }

    for requested in fields.split(',') {
        let requested = requested.trim();
        let field = resolve_field::<T>(requested).ok_or_else(|| {
            Error::invalid_argument(format!(
                "Property {} wasn't found on {}",
                requested,
                std::any::type_name::<T>()
            ))
        })?;
        shaped.insert(field, record.field_value(field).unwrap_or(Value::Null));
    }

    Ok(shaped)
}

/// [`shape`] every record, failing on the first error
pub fn shape_many<T: Shape>(records: &[T], fields: &str) -> Result<Vec<ShapedRecord>> {
    records.iter().map(|record| shape(record, fields)).collect()
}
