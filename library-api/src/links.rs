//! Hypermedia link generation
//!
//! Links are plain string templating: a [`RouteResolver`] turns a route name
//! and parameters into a URL, and the functions here decide which relations
//! apply to a resource or a collection page. Nothing here performs I/O.

use std::collections::HashMap;

use http::Method;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::pagination::{PageLinks, PagedList};

/// Route names understood by [`RouteTable::library`]
pub mod routes {
    pub const ROOT: &str = "GetRoot";
    pub const AUTHORS: &str = "GetAuthors";
    pub const AUTHOR: &str = "GetAuthor";
    pub const AUTHOR_COLLECTION: &str = "GetAuthorCollection";
    pub const CREATE_AUTHOR: &str = "CreateAuthor";
    pub const DELETE_AUTHOR: &str = "DeleteAuthor";
    pub const BOOKS_FOR_AUTHOR: &str = "GetBooksForAuthor";
    pub const BOOK_FOR_AUTHOR: &str = "GetBookForAuthor";
    pub const CREATE_BOOK_FOR_AUTHOR: &str = "CreateBookForAuthor";
    pub const DELETE_BOOK_FOR_AUTHOR: &str = "DeleteBookForAuthor";
    pub const UPDATE_BOOK_FOR_AUTHOR: &str = "UpdateBookForAuthor";
    pub const PARTIALLY_UPDATE_BOOK_FOR_AUTHOR: &str = "PartiallyUpdateBookForAuthor";
}

/// A hypermedia relation: where, what it means, and which HTTP method to use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    pub rel: String,
    pub method: String,
}

impl Link {
    pub fn new(href: impl Into<String>, rel: impl Into<String>, method: Method) -> Self {
        Self {
            href: href.into(),
            rel: rel.into(),
            method: method.as_str().to_string(),
        }
    }
}

/// Turns a route name plus parameters into a URL
///
/// Implemented by the web layer; [`RouteTable`] is a self-contained version
/// driven by path templates.
pub trait RouteResolver {
    /// URL for `route`; parameters not consumed by the path go to the query string
    fn url_for(&self, route: &str, params: &[(&str, String)]) -> Result<String>;
}

/// Route name → path template table
///
/// Templates use `{name}` placeholders. Parameters without a placeholder are
/// appended as a query string in the order given; empty values are skipped.
///
/// # Example
///
/// ```rust
/// use library_api::links::{RouteResolver, RouteTable};
///
/// let table = RouteTable::new("http://localhost:8080")
///     .with_route("GetAuthor", "/api/authors/{id}");
///
/// let url = table
///     .url_for("GetAuthor", &[("id", "42".to_string()), ("fields", "id,name".to_string())])
///     .unwrap();
/// assert_eq!(url, "http://localhost:8080/api/authors/42?fields=id%2Cname");
/// ```
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    base_url: String,
    routes: HashMap<String, String>,
}

impl RouteTable {
    /// Empty table prefixing every URL with `base_url`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            routes: HashMap::new(),
        }
    }

    /// Table with the author and book routes
    pub fn library(base_url: impl Into<String>) -> Self {
        Self::new(base_url)
            .with_route(routes::ROOT, "/api")
            .with_route(routes::AUTHORS, "/api/authors")
            .with_route(routes::AUTHOR, "/api/authors/{id}")
            .with_route(routes::AUTHOR_COLLECTION, "/api/authorcollections/({ids})")
            .with_route(routes::CREATE_AUTHOR, "/api/authors")
            .with_route(routes::DELETE_AUTHOR, "/api/authors/{id}")
            .with_route(routes::BOOKS_FOR_AUTHOR, "/api/authors/{authorId}/books")
            .with_route(routes::BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
            .with_route(routes::CREATE_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books")
            .with_route(routes::DELETE_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
            .with_route(routes::UPDATE_BOOK_FOR_AUTHOR, "/api/authors/{authorId}/books/{id}")
            .with_route(
                routes::PARTIALLY_UPDATE_BOOK_FOR_AUTHOR,
                "/api/authors/{authorId}/books/{id}",
            )
    }

    /// Register or replace a route template
    #[must_use]
    pub fn with_route(mut self, name: impl Into<String>, template: impl Into<String>) -> Self {
        self.routes.insert(name.into(), template.into());
        self
    }
}

impl RouteResolver for RouteTable {
    fn url_for(&self, route: &str, params: &[(&str, String)]) -> Result<String> {
        let template = self.routes.get(route).ok_or_else(|| {
            tracing::error!(route, "Link requested for unregistered route");
            Error::configuration(format!("No route named '{}' is registered", route))
        })?;

        let mut path = template.clone();
        let mut query = Vec::new();

        for (name, value) in params {
            let placeholder = format!("{{{}}}", name);
            if path.contains(&placeholder) {
                path = path.replace(&placeholder, &urlencoding::encode(value));
            } else if !value.is_empty() {
                query.push(format!("{}={}", name, urlencoding::encode(value)));
            }
        }

        if path.contains('{') {
            return Err(Error::configuration(format!(
                "Route '{}' is missing a path parameter: {}",
                route, path
            )));
        }

        let mut url = format!("{}{}", self.base_url, path);
        if !query.is_empty() {
            url.push('?');
            url.push_str(&query.join("&"));
        }
        Ok(url)
    }
}

/// Which neighbouring page a collection URL points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageTarget {
    Previous,
    Current,
    Next,
}

/// Query-string parameters of a collection request, for the given page
pub trait PageParams {
    fn page_params(&self, page_number: u32) -> Vec<(&'static str, String)>;
}

/// URL of a neighbouring page of a collection
pub fn collection_page_url<R, Q, T>(
    resolver: &R,
    route: &str,
    query: &Q,
    page: &PagedList<T>,
    target: PageTarget,
) -> Result<String>
where
    R: RouteResolver + ?Sized,
    Q: PageParams + ?Sized,
{
    let page_number = match target {
        PageTarget::Previous => page.current_page().saturating_sub(1).max(1),
        PageTarget::Current => page.current_page(),
        PageTarget::Next => page.current_page().saturating_add(1),
    };
    resolver.url_for(route, &query.page_params(page_number))
}

/// `previousPageLink` / `nextPageLink` for the pagination header
pub fn page_links<R, Q, T>(resolver: &R, route: &str, query: &Q, page: &PagedList<T>) -> Result<PageLinks>
where
    R: RouteResolver + ?Sized,
    Q: PageParams + ?Sized,
{
    let previous_page_link = if page.has_previous() {
        Some(collection_page_url(resolver, route, query, page, PageTarget::Previous)?)
    } else {
        None
    };
    let next_page_link = if page.has_next() {
        Some(collection_page_url(resolver, route, query, page, PageTarget::Next)?)
    } else {
        None
    };
    Ok(PageLinks {
        previous_page_link,
        next_page_link,
    })
}

/// `self`, plus `nextPage` / `previousPage` when those pages exist
pub fn collection_links<R, Q, T>(
    resolver: &R,
    route: &str,
    query: &Q,
    page: &PagedList<T>,
) -> Result<Vec<Link>>
where
    R: RouteResolver + ?Sized,
    Q: PageParams + ?Sized,
{
    let mut links = vec![Link::new(
        collection_page_url(resolver, route, query, page, PageTarget::Current)?,
        "self",
        Method::GET,
    )];

    if page.has_next() {
        links.push(Link::new(
            collection_page_url(resolver, route, query, page, PageTarget::Next)?,
            "nextPage",
            Method::GET,
        ));
    }

    if page.has_previous() {
        links.push(Link::new(
            collection_page_url(resolver, route, query, page, PageTarget::Previous)?,
            "previousPage",
            Method::GET,
        ));
    }

    Ok(links)
}

/// Relations of a single author
///
/// `self` keeps the requested `fields` so following it reproduces the same shape.
pub fn author_links<R: RouteResolver + ?Sized>(
    resolver: &R,
    id: Uuid,
    fields: &str,
) -> Result<Vec<Link>> {
    let id = id.to_string();
    let mut self_params = vec![("id", id.clone())];
    if !fields.trim().is_empty() {
        self_params.push(("fields", fields.to_string()));
    }

    Ok(vec![
        Link::new(resolver.url_for(routes::AUTHOR, &self_params)?, "self", Method::GET),
        Link::new(
            resolver.url_for(routes::DELETE_AUTHOR, &[("id", id.clone())])?,
            "delete_author",
            Method::DELETE,
        ),
        Link::new(
            resolver.url_for(routes::CREATE_BOOK_FOR_AUTHOR, &[("authorId", id.clone())])?,
            "create_book_for_author",
            Method::POST,
        ),
        Link::new(
            resolver.url_for(routes::BOOKS_FOR_AUTHOR, &[("authorId", id)])?,
            "books",
            Method::GET,
        ),
    ])
}

/// Relations of a single book
pub fn book_links<R: RouteResolver + ?Sized>(
    resolver: &R,
    author_id: Uuid,
    id: Uuid,
) -> Result<Vec<Link>> {
    let params = [("authorId", author_id.to_string()), ("id", id.to_string())];

    Ok(vec![
        Link::new(resolver.url_for(routes::BOOK_FOR_AUTHOR, &params)?, "self", Method::GET),
        Link::new(
            resolver.url_for(routes::DELETE_BOOK_FOR_AUTHOR, &params)?,
            "delete_book",
            Method::DELETE,
        ),
        Link::new(
            resolver.url_for(routes::UPDATE_BOOK_FOR_AUTHOR, &params)?,
            "update_book",
            Method::PUT,
        ),
        Link::new(
            resolver.url_for(routes::PARTIALLY_UPDATE_BOOK_FOR_AUTHOR, &params)?,
            "partially_update_book",
            Method::PATCH,
        ),
    ])
}

/// Relations of an author's book collection
pub fn book_collection_links<R: RouteResolver + ?Sized>(
    resolver: &R,
    author_id: Uuid,
) -> Result<Vec<Link>> {
    let params = [("authorId", author_id.to_string())];

    Ok(vec![
        Link::new(resolver.url_for(routes::BOOKS_FOR_AUTHOR, &params)?, "self", Method::GET),
        Link::new(
            resolver.url_for(routes::CREATE_BOOK_FOR_AUTHOR, &params)?,
            "create_book_for_author",
            Method::POST,
        ),
    ])
}

/// Entry-point document relations
pub fn root_links<R: RouteResolver + ?Sized>(resolver: &R) -> Result<Vec<Link>> {
    Ok(vec![
        Link::new(resolver.url_for(routes::ROOT, &[])?, "self", Method::GET),
        Link::new(resolver.url_for(routes::AUTHORS, &[])?, "authors", Method::GET),
        Link::new(
            resolver.url_for(routes::CREATE_AUTHOR, &[])?,
            "create_author",
            Method::POST,
        ),
    ])
}
