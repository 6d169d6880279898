//! # library-api
//!
//! Query and representation pipeline for an author/book REST API.
//!
//! A collection request flows through the same stages every time:
//!
//! 1. **Validate**: `orderBy` keys against the registered property mapping,
//!    `fields` against the DTO's declared fields
//! 2. **Sort**: multi-key stable ordering over entity properties, with
//!    reverted mappings (sorting by age means sorting by date of birth)
//! 3. **Filter and page**: genre and search filters, then one page of the
//!    result with navigation metadata
//! 4. **Shape**: project each DTO onto the requested fields
//! 5. **Link**: attach hypermedia links when the client asks for the vendor
//!    media type, otherwise put page links in the pagination header
//!
//! ## Example
//!
//! ```rust
//! use library_api::prelude::*;
//!
//! # fn main() -> library_api::Result<()> {
//! let config = Config::default();
//! let state = AppState::new(config)?;
//!
//! let mut library = Library::new();
//! library.add_author(AuthorForCreation {
//!     first_name: "Stephen".to_string(),
//!     last_name: "King".to_string(),
//!     date_of_birth: chrono::NaiveDate::from_ymd_opt(1947, 9, 21).unwrap(),
//!     genre: "Horror".to_string(),
//!     books: Vec::new(),
//! });
//!
//! let query = AuthorsQuery::new().with_fields("name,genre");
//! let page = AuthorResource::new(&state)
//!     .list(&library, &query, MediaType::Plain)
//!     .map_err(|e| Error::invalid_argument(e.to_string()))?;
//! assert_eq!(page.items()[0].keys().collect::<Vec<_>>(), vec!["name", "genre"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod handlers;
pub mod library;
pub mod links;
pub mod mapping;
pub mod model;
pub mod observability;
pub mod pagination;
pub mod shaping;
pub mod sorting;
pub mod state;

pub use error::{Error, Result};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::config::{Config, HypermediaConfig, PaginationConfig};
    pub use crate::error::{Error, Result};
    pub use crate::handlers::{
        ApiError, AuthorResource, AuthorsQuery, BookResource, BooksQuery,
        CollectionRepresentation, ItemRepresentation, MediaType, RootResource,
    };
    pub use crate::library::Library;
    pub use crate::links::{Link, RouteResolver, RouteTable};
    pub use crate::mapping::{PropertyMapping, PropertyMappingRegistry};
    pub use crate::model::{
        Author, AuthorDto, AuthorForCreation, Book, BookDto, BookForCreation, BookForUpdate,
        BookPatch,
    };
    pub use crate::observability::init_tracing;
    pub use crate::pagination::{paginate, PagedList, PaginationMetadata};
    pub use crate::shaping::{shape, shape_many, type_has_properties, Shape, ShapedRecord};
    pub use crate::sorting::{apply_sort, SortOrder, Sortable};
    pub use crate::state::AppState;
}
