//! Resource handlers for the API root, authors and books
//!
//! This module ties the pipeline stages together behind HTTP-aware types:
//! query parsing with defaults and limits, error mapping to status codes, and
//! media-type dependent representations.
//!
//! # Features
//!
//! - **Query**: [`AuthorsQuery`] with paging defaults, clamping and filters;
//!   [`BooksQuery`] for an author's books
//! - **Pipelines**: [`AuthorResource`], [`BookResource`] and [`RootResource`]
//! - **Representations**: [`CollectionRepresentation`] and [`ItemRepresentation`],
//!   switched by [`MediaType`]; [`Created`], [`NoContent`] and
//!   [`UpsertRepresentation`] for writes
//! - **Error Handling**: [`ApiError`] with automatic HTTP status code mapping
//!
//! # Integration with Axum
//!
//! Representations and errors implement `IntoResponse`, so they can be
//! returned directly from Axum handlers:
//!
//! ```rust,ignore
//! use axum::{extract::{Query, State}, http::HeaderMap, http::header::ACCEPT};
//! use library_api::handlers::{ApiError, AuthorResource, AuthorsQuery, CollectionRepresentation, MediaType};
//!
//! async fn list_authors(
//!     State((state, library)): State<(AppState, Arc<Library>)>,
//!     headers: HeaderMap,
//!     Query(query): Query<AuthorsQuery>,
//! ) -> Result<CollectionRepresentation, ApiError> {
//!     let accept = headers.get(ACCEPT).and_then(|v| v.to_str().ok());
//!     let media_type = MediaType::from_accept(accept, &state.config().hypermedia);
//!     AuthorResource::new(&state).list(&library, &query, media_type)
//! }
//! ```

mod authors;
mod books;
mod error;
mod query;
mod response;
mod root;

pub use authors::AuthorResource;
pub use books::BookResource;
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use query::{AuthorsQuery, BooksQuery, DEFAULT_BOOK_ORDER_BY, DEFAULT_ORDER_BY};
pub use response::{
    CollectionRepresentation, Created, ItemRepresentation, MediaType, NoContent,
    RootRepresentation, UpsertRepresentation,
};
pub use root::RootResource;
