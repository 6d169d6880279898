//! Author entity and its API representations

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shaping::Shape;
use crate::sorting::{SortValue, Sortable};

use super::book::BookForCreation;

/// Stored author record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub genre: String,
}

impl Author {
    /// Create an author with a fresh identifier
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        genre: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            genre: genre.into(),
        }
    }

    /// Whole years between the date of birth and `today`
    #[must_use]
    pub fn age_on(&self, today: NaiveDate) -> u32 {
        today.years_since(self.date_of_birth).unwrap_or(0)
    }

    /// "First Last"
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Sortable for Author {
    fn sort_value(&self, property: &str) -> Option<SortValue> {
        match property {
            "Id" => Some(SortValue::Uuid(self.id)),
            "FirstName" => Some(self.first_name.as_str().into()),
            "LastName" => Some(self.last_name.as_str().into()),
            "DateOfBirth" => Some(SortValue::Date(self.date_of_birth)),
            "Genre" => Some(self.genre.as_str().into()),
            _ => None,
        }
    }
}

/// Author as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: u32,
    pub genre: String,
}

impl AuthorDto {
    /// Map an entity, computing the age as of `today`
    #[must_use]
    pub fn from_author(author: &Author, today: NaiveDate) -> Self {
        Self {
            id: author.id,
            name: author.full_name(),
            age: author.age_on(today),
            genre: author.genre.clone(),
        }
    }
}

impl Shape for AuthorDto {
    const FIELDS: &'static [&'static str] = &["id", "name", "age", "genre"];

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::String(self.id.to_string())),
            "name" => Some(Value::String(self.name.clone())),
            "age" => Some(Value::from(self.age)),
            "genre" => Some(Value::String(self.genre.clone())),
            _ => None,
        }
    }
}

/// Payload for creating an author, optionally with books
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorForCreation {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub genre: String,
    #[serde(default)]
    pub books: Vec<BookForCreation>,
}
