//! `orderBy` expression parsing and in-memory multi-key sorting
//!
//! An expression such as `"name, age desc"` is resolved through a
//! [`PropertyMapping`] into a [`SortClause`]: the backing-property keys in the
//! order they are applied. Keys are applied one after another with a stable
//! sort, so the key applied last dominates. To make the first listed public
//! field the primary key, clauses are applied last-to-first, and the
//! destinations of each mapping entry are applied last-to-first as well.

use std::cmp::Ordering;
use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::mapping::PropertyMapping;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Sort in ascending order (A-Z, 0-9, oldest first)
    #[default]
    Asc,
    /// Sort in descending order (Z-A, 9-0, newest first)
    Desc,
}

impl SortOrder {
    /// The opposite direction
    #[must_use]
    pub const fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "asc"),
            Self::Desc => write!(f, "desc"),
        }
    }
}

/// Comparable value of a backing property
///
/// `Null` orders before every other value. Text compares ordinally.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub enum SortValue {
    /// Absent optional value
    Null,
    /// Calendar date
    Date(NaiveDate),
    /// Identifier
    Uuid(Uuid),
    /// Text value
    Text(String),
}

impl From<&str> for SortValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Option<&str>> for SortValue {
    fn from(value: Option<&str>) -> Self {
        value.map_or(Self::Null, Self::from)
    }
}

/// Records that can be ordered by named backing properties
pub trait Sortable {
    /// Value of `property`, or `None` if the record has no such property
    fn sort_value(&self, property: &str) -> Option<SortValue>;
}

/// One backing-property sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Backing property name
    pub property: String,
    /// Effective direction, after any revert flip
    pub order: SortOrder,
}

/// Resolved `orderBy` expression
///
/// [`keys`](Self::keys) are in application order: the last key is the
/// primary one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortClause {
    keys: Vec<SortKey>,
}

impl SortClause {
    /// Parse `order_by` against `mapping`
    ///
    /// A clause is descending when it ends with the literal, case-sensitive
    /// `" desc"`. The lookup key is the clause text before its first space.
    /// Unknown keys fail with [`Error::InvalidArgument`].
    pub fn parse(order_by: &str, mapping: &PropertyMapping) -> Result<Self> {
        let mut keys = Vec::new();
        if order_by.trim().is_empty() {
            return Ok(Self { keys });
        }

        for clause in order_by.split(',').rev() {
            let trimmed = clause.trim();
            let requested = if trimmed.ends_with(" desc") {
                SortOrder::Desc
            } else {
                SortOrder::Asc
            };

            let property_name = match trimmed.find(' ') {
                Some(index) => &trimmed[..index],
                None => trimmed,
            };

            let Some(value) = mapping.get(property_name) else {
                tracing::warn!(key = property_name, "Unknown sort key in orderBy");
                return Err(Error::invalid_argument(format!(
                    "Key mapping for {} is missing",
                    property_name
                )));
            };

            let order = if value.revert() {
                requested.flip()
            } else {
                requested
            };

            for destination in value.destinations().iter().rev() {
                keys.push(SortKey {
                    property: destination.clone(),
                    order,
                });
            }
        }

        Ok(Self { keys })
    }

    /// Keys in application order
    #[must_use]
    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    /// Sort `items` in place
    ///
    /// Fails with [`Error::Configuration`] before touching `items` when a key
    /// names a property the records do not expose.
    pub fn apply<T: Sortable>(&self, items: &mut [T]) -> Result<()> {
        let Some(first) = items.first() else {
            return Ok(());
        };

        if let Some(key) = self
            .keys
            .iter()
            .find(|key| first.sort_value(&key.property).is_none())
        {
            return Err(Error::configuration(format!(
                "Mapped sort property '{}' does not exist on {}",
                key.property,
                std::any::type_name::<T>()
            )));
        }

        for key in &self.keys {
            items.sort_by(|a, b| compare(a, b, key));
        }

        Ok(())
    }
}

fn compare<T: Sortable>(a: &T, b: &T, key: &SortKey) -> Ordering {
    let ordering = a
        .sort_value(&key.property)
        .cmp(&b.sort_value(&key.property));
    match key.order {
        SortOrder::Asc => ordering,
        SortOrder::Desc => ordering.reverse(),
    }
}

/// Parse `order_by` and sort `items` in place
///
/// A blank expression leaves `items` unchanged. On any error `items` is left
/// exactly as it was.
pub fn apply_sort<T: Sortable>(
    items: &mut [T],
    order_by: &str,
    mapping: &PropertyMapping,
) -> Result<()> {
    let clause = SortClause::parse(order_by, mapping)?;
    tracing::debug!(order_by, keys = clause.keys().len(), "Applying sort");
    clause.apply(items)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        first: &'static str,
        last: &'static str,
        born: NaiveDate,
        genre: &'static str,
    }

    impl Sortable for Row {
        fn sort_value(&self, property: &str) -> Option<SortValue> {
            match property {
                "FirstName" => Some(self.first.into()),
                "LastName" => Some(self.last.into()),
                "DateOfBirth" => Some(SortValue::Date(self.born)),
                "Genre" => Some(self.genre.into()),
                _ => None,
            }
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn row(first: &'static str, last: &'static str, born: NaiveDate, genre: &'static str) -> Row {
        Row {
            first,
            last,
            born,
            genre,
        }
    }

    fn mapping() -> PropertyMapping {
        PropertyMapping::builder()
            .map("Name", ["LastName", "FirstName"])
            .map_reverted("Age", ["DateOfBirth"])
            .map("Genre", ["Genre"])
            .build()
            .unwrap()
    }

    fn rows() -> Vec<Row> {
        vec![
            row("Stephen", "King", date(1947, 9, 21), "Horror"),
            row("George", "Martin", date(1948, 9, 20), "Fantasy"),
            row("Neil", "Gaiman", date(1960, 11, 10), "Fantasy"),
            row("Tom", "Lanoye", date(1958, 8, 27), "Various"),
            row("Douglas", "Adams", date(1952, 3, 11), "Science fiction"),
            row("Anne", "King", date(1947, 9, 21), "Drama"),
        ]
    }

    fn firsts(rows: &[Row]) -> Vec<&'static str> {
        rows.iter().map(|r| r.first).collect()
    }

    #[test]
    fn test_blank_order_by_is_noop() {
        let mut data = rows();
        apply_sort(&mut data, "  ", &mapping()).unwrap();
        assert_eq!(data, rows());
    }

    #[test]
    fn test_multi_destination_first_listed_dominates() {
        let mut data = rows();
        apply_sort(&mut data, "name", &mapping()).unwrap();
        assert_eq!(
            firsts(&data),
            vec!["Douglas", "Neil", "Anne", "Stephen", "Tom", "George"]
        );
    }

    #[test]
    fn test_name_desc() {
        let mut data = rows();
        apply_sort(&mut data, "Name desc", &mapping()).unwrap();
        assert_eq!(
            firsts(&data),
            vec!["George", "Tom", "Stephen", "Anne", "Neil", "Douglas"]
        );
    }

    #[test]
    fn test_revert_ascending_age_is_descending_birth_date() {
        let mut data = rows();
        apply_sort(&mut data, "age", &mapping()).unwrap();
        let born: Vec<_> = data.iter().map(|r| r.born).collect();
        let mut expected = born.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(born, expected);
        assert_eq!(data[0].first, "Neil");
    }

    #[test]
    fn test_age_desc_is_reverse_of_age_in_birth_date_dimension() {
        let mut ascending = rows();
        apply_sort(&mut ascending, "age", &mapping()).unwrap();
        let mut descending = rows();
        apply_sort(&mut descending, "age desc", &mapping()).unwrap();

        let asc_dates: Vec<_> = ascending.iter().map(|r| r.born).collect();
        let mut desc_dates: Vec<_> = descending.iter().map(|r| r.born).collect();
        desc_dates.reverse();
        assert_eq!(asc_dates, desc_dates);
    }

    #[test]
    fn test_reverted_primary_with_plain_secondary() {
        // King, Stephen and King, Anne share a birth date; genre breaks the tie
        let mut data = rows();
        apply_sort(&mut data, "age desc, genre", &mapping()).unwrap();
        assert_eq!(
            firsts(&data),
            vec!["Anne", "Stephen", "George", "Douglas", "Tom", "Neil"]
        );

        let mut data = rows();
        apply_sort(&mut data, "age desc, genre desc", &mapping()).unwrap();
        assert_eq!(
            firsts(&data),
            vec!["Stephen", "Anne", "George", "Douglas", "Tom", "Neil"]
        );
    }

    #[test]
    fn test_first_clause_is_primary() {
        let mut data = rows();
        apply_sort(&mut data, "genre, name", &mapping()).unwrap();
        assert_eq!(
            firsts(&data),
            vec!["Anne", "Neil", "George", "Stephen", "Douglas", "Tom"]
        );
    }

    #[test]
    fn test_unknown_key_is_invalid_argument_and_data_untouched() {
        let mut data = rows();
        let err = apply_sort(&mut data, "name, unknownField", &mapping()).unwrap_err();
        match err {
            Error::InvalidArgument(message) => assert!(message.contains("unknownField")),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(data, rows());
    }

    #[test]
    fn test_desc_suffix_is_case_sensitive() {
        let mut upper = rows();
        apply_sort(&mut upper, "name DESC", &mapping()).unwrap();
        let mut plain = rows();
        apply_sort(&mut plain, "name", &mapping()).unwrap();
        assert_eq!(upper, plain);
    }

    #[test]
    fn test_desc_suffix_is_a_literal_substring_check() {
        let spaced = PropertyMapping::builder()
            .map("Summary desc", ["Genre"])
            .map("Summary", ["Genre"])
            .build()
            .unwrap();
        let clause = SortClause::parse("Summary desc", &spaced).unwrap();
        assert_eq!(clause.keys()[0].order, SortOrder::Desc);

        // Any clause ending in " desc" is descending; only its first word is looked up
        let clause = SortClause::parse("Genre foo desc", &mapping()).unwrap();
        assert_eq!(
            clause.keys(),
            &[SortKey {
                property: "Genre".to_string(),
                order: SortOrder::Desc,
            }]
        );

        let clause = SortClause::parse("Age anything desc", &mapping()).unwrap();
        assert_eq!(clause.keys()[0].property, "DateOfBirth");
        assert_eq!(clause.keys()[0].order, SortOrder::Asc);

        let err = SortClause::parse("Unknown name desc", &mapping()).unwrap_err();
        assert!(matches!(err, Error::InvalidArgument(ref m) if m.contains("Unknown")));
    }

    #[test]
    fn test_clause_keys_in_application_order() {
        let clause = SortClause::parse("name, age", &mapping()).unwrap();
        let keys: Vec<_> = clause
            .keys()
            .iter()
            .map(|k| (k.property.as_str(), k.order))
            .collect();
        assert_eq!(
            keys,
            vec![
                ("DateOfBirth", SortOrder::Desc),
                ("FirstName", SortOrder::Asc),
                ("LastName", SortOrder::Asc),
            ]
        );
    }

    #[test]
    fn test_missing_backing_property_is_configuration_error() {
        let mapping = PropertyMapping::builder()
            .map("Title", ["Title"])
            .build()
            .unwrap();
        let mut data = rows();
        let err = apply_sort(&mut data, "title", &mapping).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
        assert_eq!(data, rows());
    }

    #[test]
    fn test_sort_value_null_orders_first() {
        assert!(SortValue::Null < SortValue::from("a"));
        assert_eq!(SortValue::from(None), SortValue::Null);
    }

    #[test]
    fn test_sort_order_display_and_flip() {
        assert_eq!(SortOrder::Asc.to_string(), "asc");
        assert_eq!(SortOrder::Desc.to_string(), "desc");
        assert_eq!(SortOrder::Asc.flip(), SortOrder::Desc);
    }
}
