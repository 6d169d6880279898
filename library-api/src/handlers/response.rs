//! Media-type aware representations
//!
//! Pagination, shaping and linking produce plain data; this module decides
//! where it goes. With `application/json` the body is the bare array of
//! shaped items and the pagination header carries previous/next page links.
//! With the hypermedia media type the body wraps items and collection links
//! as `{ "value": [...], "links": [...] }` and the header drops the links.
//! Unpaged collections (an author's books, author collections) send no
//! pagination header at all.

use axum::{
    http::{
        header::{HeaderName, HeaderValue, CONTENT_TYPE, LOCATION},
        StatusCode,
    },
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::config::HypermediaConfig;
use crate::error::{Error, Result};
use crate::links::Link;
use crate::pagination::PaginationMetadata;
use crate::shaping::ShapedRecord;

/// Negotiated representation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MediaType {
    /// `application/json`
    #[default]
    Plain,
    /// The configured vendor type; embeds links in the body
    Hypermedia,
}

impl MediaType {
    /// Pick the style from an `Accept` header value
    ///
    /// Any listed media range equal to the configured vendor type (ignoring
    /// case and parameters) selects hypermedia.
    #[must_use]
    pub fn from_accept(accept: Option<&str>, config: &HypermediaConfig) -> Self {
        let wanted = config.media_type.as_str();
        let hypermedia = accept.is_some_and(|header| {
            header
                .split(',')
                .filter_map(|range| range.split(';').next())
                .any(|range| range.trim().eq_ignore_ascii_case(wanted))
        });

        if hypermedia {
            Self::Hypermedia
        } else {
            Self::Plain
        }
    }

    #[must_use]
    pub fn is_hypermedia(self) -> bool {
        matches!(self, Self::Hypermedia)
    }
}

/// Shaped items ready to be written out, optionally one page of many
#[derive(Debug, Clone)]
pub struct CollectionRepresentation {
    items: Vec<ShapedRecord>,
    links: Option<Vec<Link>>,
    metadata: Option<PaginationMetadata>,
    header: String,
    content_type: Option<String>,
}

impl CollectionRepresentation {
    /// Bare array body; `metadata` should already carry page links
    #[must_use]
    pub fn plain(
        items: Vec<ShapedRecord>,
        metadata: PaginationMetadata,
        config: &HypermediaConfig,
    ) -> Self {
        Self {
            items,
            links: None,
            metadata: Some(metadata),
            header: config.pagination_header.clone(),
            content_type: None,
        }
    }

    /// `{value, links}` body; page links are stripped from `metadata`
    #[must_use]
    pub fn hypermedia(
        items: Vec<ShapedRecord>,
        links: Vec<Link>,
        mut metadata: PaginationMetadata,
        config: &HypermediaConfig,
    ) -> Self {
        metadata.links = None;
        Self {
            items,
            links: Some(links),
            metadata: Some(metadata),
            header: config.pagination_header.clone(),
            content_type: Some(config.media_type.clone()),
        }
    }

    /// Whole collection without paging; `links` switches to the `{value, links}` body
    #[must_use]
    pub fn unpaged(
        items: Vec<ShapedRecord>,
        links: Option<Vec<Link>>,
        config: &HypermediaConfig,
    ) -> Self {
        let content_type = links.as_ref().map(|_| config.media_type.clone());
        Self {
            items,
            links,
            metadata: None,
            header: config.pagination_header.clone(),
            content_type,
        }
    }

    #[must_use]
    pub fn items(&self) -> &[ShapedRecord] {
        &self.items
    }

    #[must_use]
    pub fn links(&self) -> Option<&[Link]> {
        self.links.as_deref()
    }

    /// Paging metadata; `None` for unpaged collections
    #[must_use]
    pub fn metadata(&self) -> Option<&PaginationMetadata> {
        self.metadata.as_ref()
    }

    /// JSON body as it will be sent
    pub fn body(&self) -> Result<Value> {
        let items = serde_json::to_value(&self.items)?;
        Ok(match &self.links {
            Some(links) => json!({ "value": items, "links": links }),
            None => items,
        })
    }

    /// Pagination header name and JSON value; `None` for unpaged collections
    pub fn pagination_header(&self) -> Result<Option<(HeaderName, HeaderValue)>> {
        let Some(metadata) = &self.metadata else {
            return Ok(None);
        };
        let name = HeaderName::from_bytes(self.header.as_bytes()).map_err(|e| {
            Error::configuration(format!("Invalid pagination header '{}': {}", self.header, e))
        })?;
        let encoded = serde_json::to_string(metadata)?;
        let value = HeaderValue::from_str(&encoded).map_err(|e| {
            Error::configuration(format!("Pagination metadata is not a valid header: {}", e))
        })?;
        Ok(Some((name, value)))
    }

    fn try_into_response(self) -> Result<Response> {
        let header = self.pagination_header()?;
        let body = self.body()?;
        let mut response = (StatusCode::OK, Json(body)).into_response();
        if let Some((name, value)) = header {
            response.headers_mut().insert(name, value);
        }
        set_content_type(&mut response, self.content_type.as_deref());
        Ok(response)
    }
}

impl IntoResponse for CollectionRepresentation {
    fn into_response(self) -> Response {
        match self.try_into_response() {
            Ok(response) => response,
            Err(err) => err.into_response(),
        }
    }
}

/// A single shaped resource
#[derive(Debug, Clone)]
pub struct ItemRepresentation {
    record: ShapedRecord,
    content_type: Option<String>,
}

impl ItemRepresentation {
    #[must_use]
    pub fn plain(record: ShapedRecord) -> Self {
        Self {
            record,
            content_type: None,
        }
    }

    /// Record with its `links` array added
    pub fn hypermedia(
        mut record: ShapedRecord,
        links: &[Link],
        config: &HypermediaConfig,
    ) -> Result<Self> {
        record.insert("links", serde_json::to_value(links)?);
        Ok(Self {
            record,
            content_type: Some(config.media_type.clone()),
        })
    }

    #[must_use]
    pub fn record(&self) -> &ShapedRecord {
        &self.record
    }
}

impl IntoResponse for ItemRepresentation {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::OK, Json(self.record)).into_response();
        set_content_type(&mut response, self.content_type.as_deref());
        response
    }
}

/// `201 Created` with an optional `Location` header
#[derive(Debug)]
pub struct Created<T> {
    data: T,
    location: Option<String>,
}

impl<T> Created<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            location: None,
        }
    }

    /// Add a Location header pointing to the created resource
    #[must_use]
    pub fn with_location(mut self, location: impl Into<String>) -> Self {
        self.location = Some(location.into());
        self
    }

    pub fn data(&self) -> &T {
        &self.data
    }
}

impl<T: Serialize> IntoResponse for Created<T> {
    fn into_response(self) -> Response {
        let mut response = (StatusCode::CREATED, Json(&self.data)).into_response();

        if let Some(value) = self
            .location
            .and_then(|location| HeaderValue::from_str(&location).ok())
        {
            response.headers_mut().insert(LOCATION, value);
        }

        response
    }
}

/// `204 No Content`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoContent;

impl IntoResponse for NoContent {
    fn into_response(self) -> Response {
        StatusCode::NO_CONTENT.into_response()
    }
}

/// Outcome of a `PUT` or `PATCH` that creates its target when missing
#[derive(Debug)]
pub enum UpsertRepresentation {
    Created(Created<ShapedRecord>),
    Updated(ItemRepresentation),
}

impl UpsertRepresentation {
    /// The stored record, whichever way it got there
    #[must_use]
    pub fn record(&self) -> &ShapedRecord {
        match self {
            Self::Created(created) => created.data(),
            Self::Updated(item) => item.record(),
        }
    }
}

impl IntoResponse for UpsertRepresentation {
    fn into_response(self) -> Response {
        match self {
            Self::Created(created) => created.into_response(),
            Self::Updated(item) => item.into_response(),
        }
    }
}

/// API entry point: links under the vendor type, otherwise nothing
#[derive(Debug, Clone)]
pub enum RootRepresentation {
    Links {
        links: Vec<Link>,
        content_type: String,
    },
    Empty,
}

impl IntoResponse for RootRepresentation {
    fn into_response(self) -> Response {
        match self {
            Self::Links {
                links,
                content_type,
            } => {
                let mut response = (StatusCode::OK, Json(links)).into_response();
                set_content_type(&mut response, Some(&content_type));
                response
            }
            Self::Empty => NoContent.into_response(),
        }
    }
}

fn set_content_type(response: &mut Response, content_type: Option<&str>) {
    if let Some(value) = content_type.and_then(|ct| HeaderValue::from_str(ct).ok()) {
        response.headers_mut().insert(CONTENT_TYPE, value);
    }
}
