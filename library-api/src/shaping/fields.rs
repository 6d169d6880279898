//! Declared field sets and `fields` parameter validation

use serde_json::Value;

/// A DTO with a fixed, declared list of public fields
///
/// `FIELDS` is the field registry used instead of runtime reflection: its
/// order is the order shaped output uses when no fields are requested, and
/// its spelling is the key spelling of shaped output.
pub trait Shape {
    /// Declared public field names
    const FIELDS: &'static [&'static str];

    /// JSON value of a declared field
    ///
    /// Only ever called with a name taken from [`FIELDS`](Self::FIELDS).
    fn field_value(&self, field: &str) -> Option<Value>;
}

/// Resolve a caller-supplied field name to its declared spelling, ignoring case
#[must_use]
pub fn resolve_field<T: Shape>(name: &str) -> Option<&'static str> {
    T::FIELDS
        .iter()
        .copied()
        .find(|field| field.eq_ignore_ascii_case(name))
}

/// Check that every entry of a comma separated `fields` list names a field of `T`
///
/// A blank list means "all fields" and is always valid. One unknown entry
/// fails the whole list.
///
/// # Example
///
/// ```rust
/// use library_api::model::AuthorDto;
/// use library_api::shaping::type_has_properties;
///
/// assert!(type_has_properties::<AuthorDto>(""));
/// assert!(type_has_properties::<AuthorDto>("Id, name"));
/// assert!(!type_has_properties::<AuthorDto>("id,title"));
/// ```
#[must_use]
pub fn type_has_properties<T: Shape>(fields: &str) -> bool {
    if fields.trim().is_empty() {
        return true;
    }

    let valid = fields
        .split(',')
        .all(|field| resolve_field::<T>(field.trim()).is_some());

    if !valid {
        tracing::debug!(
            fields,
            shape = std::any::type_name::<T>(),
            "Requested fields do not exist on shape"
        );
    }

    valid
}
