//! Book entity and its API representations

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::shaping::Shape;
use crate::sorting::{SortValue, Sortable};

/// Stored book record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

impl Book {
    /// Create a book for `author_id` with a fresh identifier
    pub fn new(author_id: Uuid, title: impl Into<String>, description: Option<String>) -> Self {
        Self::with_id(Uuid::new_v4(), author_id, title, description)
    }

    /// Create a book under a caller-chosen identifier
    pub fn with_id(
        id: Uuid,
        author_id: Uuid,
        title: impl Into<String>,
        description: Option<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description,
            author_id,
        }
    }

    /// Overwrite the editable fields
    pub fn apply(&mut self, update: BookForUpdate) {
        self.title = update.title;
        self.description = update.description;
    }
}

impl Sortable for Book {
    fn sort_value(&self, property: &str) -> Option<SortValue> {
        match property {
            "Id" => Some(SortValue::Uuid(self.id)),
            "Title" => Some(self.title.as_str().into()),
            "Description" => Some(self.description.as_deref().into()),
            _ => None,
        }
    }
}

/// Book as exposed by the API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub author_id: Uuid,
}

impl From<&Book> for BookDto {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            description: book.description.clone(),
            author_id: book.author_id,
        }
    }
}

impl Shape for BookDto {
    const FIELDS: &'static [&'static str] = &["id", "title", "description", "authorId"];

    fn field_value(&self, field: &str) -> Option<Value> {
        match field {
            "id" => Some(Value::String(self.id.to_string())),
            "title" => Some(Value::String(self.title.clone())),
            "description" => Some(
                self.description
                    .as_ref()
                    .map_or(Value::Null, |d| Value::String(d.clone())),
            ),
            "authorId" => Some(Value::String(self.author_id.to_string())),
            _ => None,
        }
    }
}

/// Payload for creating a book
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForCreation {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Full replacement of a book's editable fields (`PUT`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookForUpdate {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl From<&Book> for BookForUpdate {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            description: book.description.clone(),
        }
    }
}

/// Partial update (`PATCH`); absent fields keep their current value
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl BookPatch {
    /// `target` with every present field replaced
    #[must_use]
    pub fn apply_to(self, mut target: BookForUpdate) -> BookForUpdate {
        if let Some(title) = self.title {
            target.title = title;
        }
        if self.description.is_some() {
            target.description = self.description;
        }
        target
    }
}
