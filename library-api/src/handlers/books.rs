//! Book resource pipelines, nested under an author
//!
//! Every operation answers 404 for an unknown author before looking at the
//! book. `PUT` and `PATCH` create the book under the requested id when it
//! does not exist yet.

use uuid::Uuid;

use crate::library::Library;
use crate::links::{self, routes, RouteResolver};
use crate::model::{Book, BookDto, BookForCreation, BookForUpdate, BookPatch};
use crate::shaping::{shape, shape_many, ShapedRecord};
use crate::state::AppState;

use super::authors::{check_fields, failed};
use super::error::{ApiError, ApiOperation};
use super::query::BooksQuery;
use super::response::{
    CollectionRepresentation, Created, ItemRepresentation, MediaType, NoContent,
    UpsertRepresentation,
};

/// Book endpoints nested under an author
#[derive(Debug, Clone, Copy)]
pub struct BookResource<'a> {
    state: &'a AppState,
}

impl<'a> BookResource<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    fn ensure_author(
        library: &Library,
        author_id: Uuid,
        operation: ApiOperation,
    ) -> Result<(), ApiError> {
        if library.author_exists(author_id) {
            return Ok(());
        }
        Err(ApiError::not_found("Author", author_id.to_string()).with_operation(operation))
    }

    fn location(&self, book: &Book) -> crate::Result<String> {
        self.state.routes().url_for(
            routes::BOOK_FOR_AUTHOR,
            &[
                ("authorId", book.author_id.to_string()),
                ("id", book.id.to_string()),
            ],
        )
    }

    /// `GET /api/authors/{authorId}/books`
    pub fn list(
        &self,
        library: &Library,
        author_id: Uuid,
        query: &BooksQuery,
        media_type: MediaType,
    ) -> Result<CollectionRepresentation, ApiError> {
        let order_by = query.order_by();
        if !self
            .state
            .mappings()
            .valid_mapping_exists_for::<BookDto, Book>(order_by)?
        {
            tracing::debug!(order_by, "Rejected unknown sort key");
            return Err(ApiError::bad_request(format!(
                "Cannot order books by: {}",
                order_by
            )));
        }
        check_fields::<BookDto>(query.fields(), ApiOperation::List)?;
        Self::ensure_author(library, author_id, ApiOperation::List)?;

        let dtos: Vec<BookDto> = library
            .books_for_author(author_id, order_by, self.state.mappings())?
            .iter()
            .map(BookDto::from)
            .collect();
        let mut items = shape_many(&dtos, query.fields())?;
        let config = &self.state.config().hypermedia;

        if !media_type.is_hypermedia() {
            return Ok(CollectionRepresentation::unpaged(items, None, config));
        }

        let resolver = self.state.routes();
        for (item, dto) in items.iter_mut().zip(&dtos) {
            let links = links::book_links(resolver, author_id, dto.id)?;
            item.insert(
                "links",
                serde_json::to_value(links).map_err(crate::Error::from)?,
            );
        }
        let links = links::book_collection_links(resolver, author_id)?;
        Ok(CollectionRepresentation::unpaged(items, Some(links), config))
    }

    /// `GET /api/authors/{authorId}/books/{id}`
    pub fn get(
        &self,
        library: &Library,
        author_id: Uuid,
        id: Uuid,
        fields: &str,
        media_type: MediaType,
    ) -> Result<ItemRepresentation, ApiError> {
        check_fields::<BookDto>(fields, ApiOperation::Get)?;
        Self::ensure_author(library, author_id, ApiOperation::Get)?;

        let book = library
            .book_for_author(author_id, id)
            .ok_or_else(|| ApiError::not_found("Book", id.to_string()))?;
        let record = shape(&BookDto::from(book), fields)?;

        if media_type.is_hypermedia() {
            let links = links::book_links(self.state.routes(), author_id, id)?;
            Ok(ItemRepresentation::hypermedia(
                record,
                &links,
                &self.state.config().hypermedia,
            )?)
        } else {
            Ok(ItemRepresentation::plain(record))
        }
    }

    /// `POST /api/authors/{authorId}/books`
    pub fn create(
        &self,
        library: &mut Library,
        author_id: Uuid,
        payload: BookForCreation,
    ) -> Result<Created<ShapedRecord>, ApiError> {
        let book = library.add_book_for_author(author_id, payload).ok_or_else(|| {
            ApiError::not_found("Author", author_id.to_string())
                .with_operation(ApiOperation::Create)
        })?;
        let record = shape(&BookDto::from(&book), "").map_err(failed(ApiOperation::Create))?;
        let location = self.location(&book).map_err(failed(ApiOperation::Create))?;
        Ok(Created::new(record).with_location(location))
    }

    /// `DELETE /api/authors/{authorId}/books/{id}`
    pub fn delete(
        &self,
        library: &mut Library,
        author_id: Uuid,
        id: Uuid,
    ) -> Result<NoContent, ApiError> {
        Self::ensure_author(library, author_id, ApiOperation::Delete)?;
        if library.book_for_author(author_id, id).is_none() || !library.delete_book(id) {
            return Err(
                ApiError::not_found("Book", id.to_string()).with_operation(ApiOperation::Delete)
            );
        }
        tracing::debug!(author_id = %author_id, book_id = %id, "Deleted book");
        Ok(NoContent)
    }

    /// `PUT /api/authors/{authorId}/books/{id}`
    pub fn update(
        &self,
        library: &mut Library,
        author_id: Uuid,
        id: Uuid,
        update: BookForUpdate,
    ) -> Result<UpsertRepresentation, ApiError> {
        Self::ensure_author(library, author_id, ApiOperation::Update)?;
        self.upsert(library, author_id, id, update)
    }

    /// `PATCH /api/authors/{authorId}/books/{id}`
    ///
    /// Absent fields keep their value. A patch that creates the book must
    /// carry a title.
    pub fn partially_update(
        &self,
        library: &mut Library,
        author_id: Uuid,
        id: Uuid,
        patch: BookPatch,
    ) -> Result<UpsertRepresentation, ApiError> {
        Self::ensure_author(library, author_id, ApiOperation::Update)?;

        let update = match library.book_for_author(author_id, id) {
            Some(book) => patch.apply_to(BookForUpdate::from(book)),
            None if patch.title.is_none() => {
                return Err(ApiError::bad_request("A new book needs a title")
                    .with_operation(ApiOperation::Update)
                    .with_entity("Book", id.to_string()));
            }
            None => patch.apply_to(BookForUpdate::default()),
        };
        self.upsert(library, author_id, id, update)
    }

    fn upsert(
        &self,
        library: &mut Library,
        author_id: Uuid,
        id: Uuid,
        update: BookForUpdate,
    ) -> Result<UpsertRepresentation, ApiError> {
        let stored = library
            .upsert_book_for_author(author_id, id, update)
            .map_err(failed(ApiOperation::Update))?;
        let created = stored.is_created();
        let book = stored.into_inner();
        let record = shape(&BookDto::from(&book), "").map_err(failed(ApiOperation::Update))?;

        if created {
            let location = self.location(&book).map_err(failed(ApiOperation::Update))?;
            return Ok(UpsertRepresentation::Created(
                Created::new(record).with_location(location),
            ));
        }
        Ok(UpsertRepresentation::Updated(ItemRepresentation::plain(record)))
    }
}
