//! In-memory author and book store
//!
//! Stands in for the persistence collaborator: it owns the records and runs
//! the sort → filter → paginate part of the pipeline for author listings.

use uuid::Uuid;

use crate::config::PaginationConfig;
use crate::error::{Error, Result};
use crate::handlers::AuthorsQuery;
use crate::mapping::PropertyMappingRegistry;
use crate::model::{Author, AuthorDto, AuthorForCreation, Book, BookDto, BookForCreation, BookForUpdate};
use crate::pagination::PagedList;
use crate::sorting::apply_sort;

/// Whether an upsert stored a new record or replaced an existing one
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Upserted<T> {
    Created(T),
    Updated(T),
}

impl<T> Upserted<T> {
    #[must_use]
    pub fn is_created(&self) -> bool {
        matches!(self, Self::Created(_))
    }

    pub fn into_inner(self) -> T {
        match self {
            Self::Created(value) | Self::Updated(value) => value,
        }
    }
}

/// Authors and their books
#[derive(Debug, Clone, Default)]
pub struct Library {
    authors: Vec<Author>,
    books: Vec<Book>,
}

impl Library {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One page of authors for `query`
    ///
    /// Sorting uses the registered `AuthorDto` → `Author` mapping; an unknown
    /// `orderBy` key fails with an invalid-argument error. Both filters are
    /// trimmed, case-insensitive equality matches: `genre` against the genre,
    /// the search query against the genre, first name or last name.
    pub fn authors(
        &self,
        query: &AuthorsQuery,
        mappings: &PropertyMappingRegistry,
        limits: &PaginationConfig,
    ) -> Result<PagedList<Author>> {
        let mapping = mappings.get_mapping::<AuthorDto, Author>()?;

        let mut authors = self.authors.clone();
        apply_sort(&mut authors, query.order_by(), mapping)?;

        if let Some(genre) = query.genre().map(|g| g.trim().to_lowercase()) {
            authors.retain(|a| a.genre.to_lowercase() == genre);
        }

        if let Some(search) = query.search_query().map(|s| s.trim().to_lowercase()) {
            authors.retain(|a| {
                a.genre.to_lowercase() == search
                    || a.first_name.to_lowercase() == search
                    || a.last_name.to_lowercase() == search
            });
        }

        Ok(PagedList::create(
            authors,
            query.page_number(),
            query.page_size_within(limits),
        ))
    }

    #[must_use]
    pub fn author(&self, id: Uuid) -> Option<&Author> {
        self.authors.iter().find(|a| a.id == id)
    }

    #[must_use]
    pub fn author_exists(&self, id: Uuid) -> bool {
        self.author(id).is_some()
    }

    /// Authors whose id is in `ids`, ordered by first name then last name
    ///
    /// Unknown ids are skipped, so the result can be shorter than `ids`.
    #[must_use]
    pub fn authors_by_ids(&self, ids: &[Uuid]) -> Vec<&Author> {
        let mut authors: Vec<&Author> = self
            .authors
            .iter()
            .filter(|a| ids.contains(&a.id))
            .collect();
        authors.sort_by(|a, b| {
            a.first_name
                .cmp(&b.first_name)
                .then_with(|| a.last_name.cmp(&b.last_name))
        });
        authors
    }

    /// Store a new author together with any books in the payload
    pub fn add_author(&mut self, payload: AuthorForCreation) -> Author {
        let author = Author::new(
            payload.first_name,
            payload.last_name,
            payload.date_of_birth,
            payload.genre,
        );
        for book in payload.books {
            self.books
                .push(Book::new(author.id, book.title, book.description));
        }
        self.authors.push(author.clone());
        tracing::debug!(author_id = %author.id, "Added author");
        author
    }

    /// Remove an author and their books; `false` when no such author exists
    pub fn delete_author(&mut self, id: Uuid) -> bool {
        let before = self.authors.len();
        self.authors.retain(|a| a.id != id);
        if self.authors.len() == before {
            return false;
        }
        self.books.retain(|b| b.author_id != id);
        true
    }

    /// Books of `author_id` sorted by `order_by` through the `BookDto` → `Book` mapping
    pub fn books_for_author(
        &self,
        author_id: Uuid,
        order_by: &str,
        mappings: &PropertyMappingRegistry,
    ) -> Result<Vec<Book>> {
        let mapping = mappings.get_mapping::<BookDto, Book>()?;
        let mut books: Vec<Book> = self
            .books
            .iter()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect();
        apply_sort(&mut books, order_by, mapping)?;
        Ok(books)
    }

    #[must_use]
    pub fn book_for_author(&self, author_id: Uuid, book_id: Uuid) -> Option<&Book> {
        self.books
            .iter()
            .find(|b| b.author_id == author_id && b.id == book_id)
    }

    /// Store a book for an existing author; `None` when the author is unknown
    pub fn add_book_for_author(&mut self, author_id: Uuid, payload: BookForCreation) -> Option<Book> {
        if !self.author_exists(author_id) {
            return None;
        }
        let book = Book::new(author_id, payload.title, payload.description);
        self.books.push(book.clone());
        Some(book)
    }

    /// Replace the book `book_id` of `author_id`, or store it under that id
    ///
    /// Fails when the author is unknown or the id already belongs to another
    /// author's book.
    pub fn upsert_book_for_author(
        &mut self,
        author_id: Uuid,
        book_id: Uuid,
        update: BookForUpdate,
    ) -> Result<Upserted<Book>> {
        if !self.author_exists(author_id) {
            return Err(Error::invalid_argument(format!(
                "Author {} does not exist",
                author_id
            )));
        }

        if let Some(book) = self.books.iter_mut().find(|b| b.id == book_id) {
            if book.author_id != author_id {
                return Err(Error::invalid_argument(format!(
                    "Book {} belongs to another author",
                    book_id
                )));
            }
            book.apply(update);
            return Ok(Upserted::Updated(book.clone()));
        }

        let book = Book::with_id(book_id, author_id, update.title, update.description);
        self.books.push(book.clone());
        tracing::debug!(author_id = %author_id, book_id = %book_id, "Stored book under requested id");
        Ok(Upserted::Created(book))
    }

    /// Remove a book; `false` when it does not exist
    pub fn delete_book(&mut self, book_id: Uuid) -> bool {
        let before = self.books.len();
        self.books.retain(|b| b.id != book_id);
        self.books.len() != before
    }
}
