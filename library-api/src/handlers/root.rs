//! API entry point

use crate::links;
use crate::state::AppState;

use super::error::ApiError;
use super::response::{MediaType, RootRepresentation};

/// `GET /api`
#[derive(Debug, Clone, Copy)]
pub struct RootResource<'a> {
    state: &'a AppState,
}

impl<'a> RootResource<'a> {
    #[must_use]
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    /// Top-level links under the vendor media type, an empty 204 otherwise
    pub fn get(&self, media_type: MediaType) -> Result<RootRepresentation, ApiError> {
        if !media_type.is_hypermedia() {
            return Ok(RootRepresentation::Empty);
        }
        Ok(RootRepresentation::Links {
            links: links::root_links(self.state.routes())?,
            content_type: self.state.config().hypermedia.media_type.clone(),
        })
    }
}
