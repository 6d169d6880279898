//! Author resource pipelines
//!
//! Each request runs the same steps: reject unknown sort keys and fields
//! before touching data, sort/filter/page the store, map entities to DTOs,
//! shape them to the requested fields, then attach links according to the
//! negotiated media type.
//!
//! # Example
//!
//! ```rust
//! use library_api::config::Config;
//! use library_api::handlers::{AuthorResource, AuthorsQuery, MediaType};
//! use library_api::library::Library;
//! use library_api::state::AppState;
//!
//! let state = AppState::new(Config::default()).unwrap();
//! let library = Library::new();
//!
//! let page = AuthorResource::new(&state)
//!     .list(&library, &AuthorsQuery::new(), MediaType::Plain)
//!     .unwrap();
//! assert!(page.items().is_empty());
//! ```

use chrono::{Local, NaiveDate};
use uuid::Uuid;

use crate::error::Error;
use crate::library::Library;
use crate::links::{self, routes, RouteResolver};
use crate::model::{Author, AuthorDto, AuthorForCreation};
use crate::shaping::{shape, shape_many, type_has_properties, Shape, ShapedRecord};
use crate::state::AppState;

use super::error::{ApiError, ApiErrorKind, ApiOperation};
use super::query::AuthorsQuery;
use super::response::{
    CollectionRepresentation, Created, ItemRepresentation, MediaType, NoContent,
};

/// Reject a field selection naming anything `T` does not declare
pub(super) fn check_fields<T: Shape>(fields: &str, operation: ApiOperation) -> Result<(), ApiError> {
    if type_has_properties::<T>(fields) {
        return Ok(());
    }
    tracing::debug!(fields, "Rejected unknown fields");
    Err(ApiError::bad_request(format!("Unknown fields requested: {}", fields))
        .with_operation(operation))
}

/// Map a pipeline error onto `operation`
pub(super) fn failed(operation: ApiOperation) -> impl Fn(Error) -> ApiError {
    move |err| ApiError::from(err).with_operation(operation)
}

/// Ids of an author collection: `a,b` or `(a,b)`
fn parse_ids(ids: &str) -> Result<Vec<Uuid>, ApiError> {
    let trimmed = ids.trim();
    let inner = trimmed
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .unwrap_or(trimmed);

    let parsed = inner
        .split(',')
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| {
            Uuid::parse_str(token).map_err(|_| {
                ApiError::bad_request(format!("Not an author id: {}", token))
                    .with_operation(ApiOperation::Get)
            })
        })
        .collect::<Result<Vec<_>, _>>()?;

    if parsed.is_empty() {
        return Err(ApiError::bad_request("No author ids given").with_operation(ApiOperation::Get));
    }
    Ok(parsed)
}

/// Author endpoints over a [`Library`]
#[derive(Debug, Clone, Copy)]
pub struct AuthorResource<'a> {
    state: &'a AppState,
    today: NaiveDate,
}

impl<'a> AuthorResource<'a> {
    /// Resource computing ages against the local date
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self {
            state,
            today: Local::now().date_naive(),
        }
    }

    /// Fix the date ages are computed against
    #[must_use]
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    fn dto(&self, author: &Author) -> AuthorDto {
        AuthorDto::from_author(author, self.today)
    }

    /// `GET /api/authors`
    pub fn list(
        &self,
        library: &Library,
        query: &AuthorsQuery,
        media_type: MediaType,
    ) -> Result<CollectionRepresentation, ApiError> {
        let config = self.state.config();
        let order_by = query.order_by();

        if !self
            .state
            .mappings()
            .valid_mapping_exists_for::<AuthorDto, Author>(order_by)?
        {
            tracing::debug!(order_by, "Rejected unknown sort key");
            return Err(ApiError::bad_request(format!(
                "Cannot order authors by: {}",
                order_by
            )));
        }
        check_fields::<AuthorDto>(query.fields(), ApiOperation::List)?;

        let page = library
            .authors(query, self.state.mappings(), &config.pagination)?
            .map(|author| self.dto(&author));

        let resolver = self.state.routes();
        let query = query.normalized(&config.pagination);
        let fields = query.fields();
        let mut items = shape_many(page.items(), fields)?;

        let representation = if media_type.is_hypermedia() {
            for (item, dto) in items.iter_mut().zip(page.items()) {
                let links = links::author_links(resolver, dto.id, fields)?;
                item.insert("links", serde_json::to_value(links).map_err(Error::from)?);
            }
            let links = links::collection_links(resolver, routes::AUTHORS, &query, &page)?;
            CollectionRepresentation::hypermedia(items, links, page.metadata(), &config.hypermedia)
        } else {
            let page_links = links::page_links(resolver, routes::AUTHORS, &query, &page)?;
            CollectionRepresentation::plain(
                items,
                page.metadata().with_links(page_links),
                &config.hypermedia,
            )
        };

        tracing::debug!(
            page = page.current_page(),
            page_size = page.page_size(),
            returned = page.items().len(),
            total = page.total_count(),
            hypermedia = media_type.is_hypermedia(),
            "Listed authors"
        );
        Ok(representation)
    }

    /// `GET /api/authors/{id}`
    pub fn get(
        &self,
        library: &Library,
        id: Uuid,
        fields: &str,
        media_type: MediaType,
    ) -> Result<ItemRepresentation, ApiError> {
        check_fields::<AuthorDto>(fields, ApiOperation::Get)?;

        let author = library
            .author(id)
            .ok_or_else(|| ApiError::not_found("Author", id.to_string()))?;
        let record = shape(&self.dto(author), fields)?;

        if media_type.is_hypermedia() {
            let links = links::author_links(self.state.routes(), id, fields)?;
            Ok(ItemRepresentation::hypermedia(
                record,
                &links,
                &self.state.config().hypermedia,
            )?)
        } else {
            Ok(ItemRepresentation::plain(record))
        }
    }

    /// `POST /api/authors`
    pub fn create(
        &self,
        library: &mut Library,
        payload: AuthorForCreation,
    ) -> Result<Created<ShapedRecord>, ApiError> {
        let author = library.add_author(payload);
        let record = shape(&self.dto(&author), "").map_err(failed(ApiOperation::Create))?;
        let location = self
            .state
            .routes()
            .url_for(routes::AUTHOR, &[("id", author.id.to_string())])
            .map_err(failed(ApiOperation::Create))?;

        Ok(Created::new(record).with_location(location))
    }

    /// `POST /api/authors/{id}`: creating at a chosen id is never allowed
    ///
    /// Answers 409 when the author already exists and 404 otherwise.
    #[must_use]
    pub fn block_creation(&self, library: &Library, id: Uuid) -> ApiError {
        if library.author_exists(id) {
            tracing::debug!(author_id = %id, "Blocked creation over existing author");
            return ApiError::conflict(ApiOperation::Create, "Author already exists")
                .with_entity("Author", id.to_string());
        }
        ApiError::not_found("Author", id.to_string()).with_operation(ApiOperation::Create)
    }

    /// `DELETE /api/authors/{id}`, together with the author's books
    pub fn delete(&self, library: &mut Library, id: Uuid) -> Result<NoContent, ApiError> {
        if !library.delete_author(id) {
            return Err(
                ApiError::not_found("Author", id.to_string()).with_operation(ApiOperation::Delete)
            );
        }
        tracing::debug!(author_id = %id, "Deleted author");
        Ok(NoContent)
    }

    /// `GET /api/authorcollections/({ids})`
    ///
    /// Fails with 404 unless every listed id (duplicates included) matches
    /// an author.
    pub fn get_collection(
        &self,
        library: &Library,
        ids: &str,
    ) -> Result<CollectionRepresentation, ApiError> {
        let ids = parse_ids(ids)?;
        let authors = library.authors_by_ids(&ids);

        if authors.len() != ids.len() {
            tracing::debug!(
                requested = ids.len(),
                found = authors.len(),
                "Author collection is incomplete"
            );
            return Err(ApiError::new(
                ApiOperation::Get,
                ApiErrorKind::NotFound,
                format!("Found {} of {} authors", authors.len(), ids.len()),
            ));
        }

        let dtos: Vec<AuthorDto> = authors.into_iter().map(|a| self.dto(a)).collect();
        let items = shape_many(&dtos, "")?;
        Ok(CollectionRepresentation::unpaged(
            items,
            None,
            &self.state.config().hypermedia,
        ))
    }

    /// `POST /api/authorcollections`
    ///
    /// The `Location` header names the new authors as a collection.
    pub fn create_collection(
        &self,
        library: &mut Library,
        payloads: Vec<AuthorForCreation>,
    ) -> Result<Created<Vec<ShapedRecord>>, ApiError> {
        if payloads.is_empty() {
            return Err(
                ApiError::bad_request("An author collection needs at least one author")
                    .with_operation(ApiOperation::Create),
            );
        }

        let dtos: Vec<AuthorDto> = payloads
            .into_iter()
            .map(|payload| self.dto(&library.add_author(payload)))
            .collect();
        let ids = dtos
            .iter()
            .map(|dto| dto.id.to_string())
            .collect::<Vec<_>>()
            .join(",");

        let items = shape_many(&dtos, "").map_err(failed(ApiOperation::Create))?;
        let location = self
            .state
            .routes()
            .url_for(routes::AUTHOR_COLLECTION, &[("ids", ids)])
            .map_err(failed(ApiOperation::Create))?;

        tracing::debug!(created = dtos.len(), "Created author collection");
        Ok(Created::new(items).with_location(location))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use axum::http::header::LOCATION;
    use axum::response::IntoResponse;
    use serde_json::Value;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn state() -> AppState {
        let mut config = Config::default();
        config.hypermedia.base_url = "http://host".to_string();
        AppState::new(config).unwrap()
    }

    fn author(first: &str, last: &str, born: NaiveDate, genre: &str) -> AuthorForCreation {
        AuthorForCreation {
            first_name: first.to_string(),
            last_name: last.to_string(),
            date_of_birth: born,
            genre: genre.to_string(),
            books: Vec::new(),
        }
    }

    /// `count` authors whose last names sort as "Author01", "Author02", ...
    fn library_of(count: u32) -> Library {
        let mut library = Library::new();
        for n in (1..=count).rev() {
            library.add_author(author(
                &format!("First{:03}", count + 1 - n),
                &format!("Author{:02}", n),
                date(1900 + n as i32, 1, 1),
                if n % 2 == 0 { "Horror" } else { "Fantasy" },
            ));
        }
        library
    }

    fn library_of_25() -> Library {
        library_of(25)
    }

    fn names(representation: &CollectionRepresentation) -> Vec<String> {
        representation
            .items()
            .iter()
            .map(|item| item.get("name").and_then(Value::as_str).unwrap().to_string())
            .collect()
    }

    #[test]
    fn test_second_page_by_name() {
        let state = state();
        let library = library_of_25();
        let query = AuthorsQuery::new()
            .with_order_by("name")
            .with_page_number(2)
            .with_page_size(10);

        let page = AuthorResource::new(&state)
            .list(&library, &query, MediaType::Plain)
            .unwrap();

        let expected: Vec<String> = (11..=20u32)
            .map(|n| format!("First{:03} Author{:02}", 26 - n, n))
            .collect();
        assert_eq!(names(&page), expected);

        let metadata = page.metadata().unwrap();
        assert_eq!(metadata.total_count, 25);
        assert_eq!(metadata.total_pages, 3);
        assert_eq!(metadata.current_page, 2);
        let links = metadata.links.as_ref().unwrap();
        assert_eq!(
            links.previous_page_link.as_deref(),
            Some("http://host/api/authors?orderBy=name&pageNumber=1&pageSize=10")
        );
        assert_eq!(
            links.next_page_link.as_deref(),
            Some("http://host/api/authors?orderBy=name&pageNumber=3&pageSize=10")
        );
    }

    #[test]
    fn test_page_links_follow_configured_max_page_size() {
        let mut config = Config::default();
        config.hypermedia.base_url = "http://host".to_string();
        config.pagination.max_page_size = 50;
        let state = AppState::new(config).unwrap();
        let library = library_of(100);
        let query = AuthorsQuery::new().with_page_size(30);

        let page = AuthorResource::new(&state)
            .list(&library, &query, MediaType::Plain)
            .unwrap();
        let metadata = page.metadata().unwrap();
        assert_eq!(metadata.page_size, 30);
        assert_eq!(page.items().len(), 30);
        let next = metadata
            .links
            .as_ref()
            .and_then(|links| links.next_page_link.as_deref())
            .unwrap();
        assert!(next.contains("pageSize=30"), "{next}");

        let linked = AuthorResource::new(&state)
            .list(&library, &query, MediaType::Hypermedia)
            .unwrap();
        assert!(linked
            .links()
            .unwrap()
            .iter()
            .all(|link| link.href.contains("pageSize=30")));
    }

    #[test]
    fn test_hypermedia_list_links() {
        let state = state();
        let library = library_of_25();
        let query = AuthorsQuery::new()
            .with_fields("id,name")
            .with_page_number(2);

        let page = AuthorResource::new(&state)
            .list(&library, &query, MediaType::Hypermedia)
            .unwrap();

        assert!(page.metadata().unwrap().links.is_none());
        let rels: Vec<&str> = page
            .links()
            .unwrap()
            .iter()
            .map(|l| l.rel.as_str())
            .collect();
        assert_eq!(rels, vec!["self", "nextPage", "previousPage"]);

        let first = &page.items()[0];
        assert_eq!(first.keys().collect::<Vec<_>>(), vec!["id", "name", "links"]);
        let item_links = first.get("links").and_then(Value::as_array).unwrap();
        assert_eq!(item_links.len(), 4);
        assert_eq!(item_links[0]["rel"], "self");
        assert!(item_links[0]["href"]
            .as_str()
            .unwrap()
            .ends_with("?fields=id%2Cname"));
    }

    #[test]
    fn test_filters_and_oversized_page() {
        let state = state();
        let library = library_of_25();
        let query = AuthorsQuery::new()
            .with_genre("horror")
            .with_page_size(50);

        let page = AuthorResource::new(&state)
            .list(&library, &query, MediaType::Plain)
            .unwrap();

        let metadata = page.metadata().unwrap();
        assert_eq!(metadata.page_size, 20);
        assert_eq!(metadata.total_count, 12);
        assert_eq!(page.items().len(), 12);
    }

    #[test]
    fn test_age_sort_is_reverted_date_of_birth() {
        let state = state();
        let library = library_of_25();
        let query = AuthorsQuery::new().with_order_by("age desc").with_page_size(3);

        let page = AuthorResource::new(&state)
            .with_today(date(2020, 6, 1))
            .list(&library, &query, MediaType::Plain)
            .unwrap();

        let ages: Vec<u64> = page
            .items()
            .iter()
            .map(|item| item.get("age").and_then(Value::as_u64).unwrap())
            .collect();
        assert_eq!(ages, vec![119, 118, 117]);
    }

    #[test]
    fn test_unknown_order_by_is_bad_request() {
        let state = state();
        let err = AuthorResource::new(&state)
            .list(
                &library_of_25(),
                &AuthorsQuery::new().with_order_by("Title"),
                MediaType::Plain,
            )
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
    }

    #[test]
    fn test_unknown_field_is_bad_request() {
        let state = state();
        let err = AuthorResource::new(&state)
            .list(
                &library_of_25(),
                &AuthorsQuery::new().with_fields("id,salary"),
                MediaType::Plain,
            )
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(err.operation, ApiOperation::List);
    }

    #[test]
    fn test_get_author_shapes_and_links() {
        let state = state();
        let mut library = Library::new();
        let king = library.add_author(author("Stephen", "King", date(1947, 9, 21), "Horror"));

        let resource = AuthorResource::new(&state).with_today(date(2020, 1, 1));
        let plain = resource
            .get(&library, king.id, "name,age", MediaType::Plain)
            .unwrap();
        assert_eq!(plain.record().keys().collect::<Vec<_>>(), vec!["name", "age"]);
        assert_eq!(plain.record().get("age"), Some(&Value::from(72)));

        let linked = resource
            .get(&library, king.id, "", MediaType::Hypermedia)
            .unwrap();
        let rels: Vec<&str> = linked
            .record()
            .get("links")
            .and_then(Value::as_array)
            .unwrap()
            .iter()
            .filter_map(|l| l["rel"].as_str())
            .collect();
        assert_eq!(
            rels,
            vec!["self", "delete_author", "create_book_for_author", "books"]
        );
    }

    #[test]
    fn test_get_unknown_author_is_not_found() {
        let state = state();
        let err = AuthorResource::new(&state)
            .get(&Library::new(), Uuid::new_v4(), "", MediaType::Plain)
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
    }

    #[test]
    fn test_create_returns_location_of_new_author() {
        let state = state();
        let mut library = Library::new();
        let created = AuthorResource::new(&state)
            .create(
                &mut library,
                author("Tom", "Lanoye", date(1958, 8, 27), "Various"),
            )
            .unwrap();

        let id = created.data().get("id").and_then(Value::as_str).unwrap().to_string();
        assert!(library.author_exists(Uuid::parse_str(&id).unwrap()));

        let response = created.into_response();
        assert_eq!(response.status(), axum::http::StatusCode::CREATED);
        assert_eq!(
            response.headers()[LOCATION],
            format!("http://host/api/authors/{id}").as_str()
        );
    }

    #[test]
    fn test_block_creation() {
        let state = state();
        let mut library = Library::new();
        let king = library.add_author(author("Stephen", "King", date(1947, 9, 21), "Horror"));
        let resource = AuthorResource::new(&state);

        let err = resource.block_creation(&library, king.id);
        assert_eq!(err.kind, ApiErrorKind::Conflict);
        assert_eq!(err.operation, ApiOperation::Create);
        assert_eq!(
            err.into_response().status(),
            axum::http::StatusCode::CONFLICT
        );

        let err = resource.block_creation(&library, Uuid::new_v4());
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Create);
    }

    #[test]
    fn test_delete_author() {
        let state = state();
        let mut library = Library::new();
        let king = library.add_author(author("Stephen", "King", date(1947, 9, 21), "Horror"));
        let resource = AuthorResource::new(&state);

        assert_eq!(resource.delete(&mut library, king.id).unwrap(), NoContent);
        assert!(!library.author_exists(king.id));

        let err = resource.delete(&mut library, king.id).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);
        assert_eq!(err.operation, ApiOperation::Delete);
    }

    #[test]
    fn test_author_collection_round_trip() {
        let state = state();
        let mut library = Library::new();
        let resource = AuthorResource::new(&state).with_today(date(2020, 1, 1));

        let created = resource
            .create_collection(
                &mut library,
                vec![
                    author("Stephen", "King", date(1947, 9, 21), "Horror"),
                    author("Neil", "Gaiman", date(1960, 11, 10), "Fantasy"),
                ],
            )
            .unwrap();
        let ids: Vec<String> = created
            .data()
            .iter()
            .map(|item| item.get("id").and_then(Value::as_str).unwrap().to_string())
            .collect();
        let response = created.into_response();
        let location = response.headers()[LOCATION].to_str().unwrap().to_string();
        assert!(location.starts_with("http://host/api/authorcollections/("));

        let collection = resource
            .get_collection(&library, &format!("({})", ids.join(",")))
            .unwrap();
        assert!(collection.metadata().is_none());
        assert_eq!(names(&collection), vec!["Neil Gaiman", "Stephen King"]);
    }

    #[test]
    fn test_author_collection_with_unknown_id_is_not_found() {
        let state = state();
        let mut library = Library::new();
        let king = library.add_author(author("Stephen", "King", date(1947, 9, 21), "Horror"));
        let resource = AuthorResource::new(&state);

        let ids = format!("{},{}", king.id, Uuid::new_v4());
        let err = resource.get_collection(&library, &ids).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);

        let repeated = format!("{},{}", king.id, king.id);
        let err = resource.get_collection(&library, &repeated).unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::NotFound);

        assert_eq!(
            resource.get_collection(&library, &king.id.to_string()).unwrap().items().len(),
            1
        );
    }

    #[test]
    fn test_author_collection_rejects_malformed_ids() {
        let state = state();
        let resource = AuthorResource::new(&state);
        for ids in ["", "()", " , ", "not-an-id"] {
            let err = resource.get_collection(&Library::new(), ids).unwrap_err();
            assert_eq!(err.kind, ApiErrorKind::BadRequest, "{ids:?}");
        }

        let err = resource
            .create_collection(&mut Library::new(), Vec::new())
            .unwrap_err();
        assert_eq!(err.kind, ApiErrorKind::BadRequest);
        assert_eq!(err.operation, ApiOperation::Create);
    }
}
