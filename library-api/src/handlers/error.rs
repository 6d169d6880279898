//! Errors surfaced by resource handlers
//!
//! Client mistakes (unknown sort key, unknown field, missing author) map to
//! 4xx responses with the offending value in the body. Wiring problems are
//! logged in full and reported as an opaque 500.
//!
//! # Example
//!
//! ```rust
//! use library_api::handlers::{ApiError, ApiErrorKind};
//!
//! let error = ApiError::not_found("Author", "0d1b");
//! assert!(matches!(error.kind, ApiErrorKind::NotFound));
//! assert_eq!(error.entity_id, Some("0d1b".to_string()));
//! ```

use std::fmt;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Operation being performed when the error occurred
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiOperation {
    List,
    Get,
    Create,
    Update,
    Delete,
}

impl fmt::Display for ApiOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::List => write!(f, "list"),
            Self::Get => write!(f, "get"),
            Self::Create => write!(f, "create"),
            Self::Update => write!(f, "update"),
            Self::Delete => write!(f, "delete"),
        }
    }
}

/// Category of API error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiErrorKind {
    /// Entity was not found
    NotFound,
    /// Invalid query parameter, such as an unknown sort key or field
    BadRequest,
    /// Request conflicts with existing state
    Conflict,
    /// Internal server error
    InternalError,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "not_found"),
            Self::BadRequest => write!(f, "bad_request"),
            Self::Conflict => write!(f, "conflict"),
            Self::InternalError => write!(f, "internal_error"),
        }
    }
}

impl ApiErrorKind {
    /// HTTP status code for this kind
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Error code string, e.g. `BAD_REQUEST`
    #[must_use]
    pub fn error_code(&self) -> String {
        self.to_string().to_uppercase()
    }
}

/// Structured API error with operation context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// The operation being performed when the error occurred
    pub operation: ApiOperation,
    /// The category of error
    pub kind: ApiErrorKind,
    /// Human-readable error message
    pub message: String,
    /// The type of entity involved, e.g. "Author"
    pub entity_type: Option<String>,
    /// The ID of the entity involved
    pub entity_id: Option<String>,
}

impl ApiError {
    pub fn new(operation: ApiOperation, kind: ApiErrorKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            kind,
            message: message.into(),
            entity_type: None,
            entity_id: None,
        }
    }

    /// "Not found" error with entity context
    pub fn not_found(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::NotFound, "Entity not found")
            .with_entity(entity_type, entity_id)
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::List, ApiErrorKind::BadRequest, message)
    }

    pub fn conflict(operation: ApiOperation, message: impl Into<String>) -> Self {
        Self::new(operation, ApiErrorKind::Conflict, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ApiOperation::Get, ApiErrorKind::InternalError, message)
    }

    #[must_use]
    pub fn with_entity(
        mut self,
        entity_type: impl Into<String>,
        entity_id: impl Into<String>,
    ) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.into());
        self
    }

    #[must_use]
    pub fn with_operation(mut self, operation: ApiOperation) -> Self {
        self.operation = operation;
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "API {} error during {}: {}",
            self.kind, self.operation, self.message
        )?;
        if let (Some(entity_type), Some(entity_id)) = (&self.entity_type, &self.entity_id) {
            write!(f, " [{}: {}]", entity_type, entity_id)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Response body for API errors
#[derive(Debug, Serialize, Deserialize)]
struct ApiErrorResponse {
    error: String,
    code: String,
    status: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    operation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    entity_id: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.kind.status_code();
        let code = self.kind.error_code();

        if status.is_server_error() {
            tracing::error!(
                operation = %self.operation,
                kind = %self.kind,
                "API error: {}", self.message
            );
        } else {
            tracing::debug!(
                operation = %self.operation,
                kind = %self.kind,
                entity_type = ?self.entity_type,
                entity_id = ?self.entity_id,
                "API error: {}", self.message
            );
        }

        let response = ApiErrorResponse {
            error: self.message,
            code,
            status: status.as_u16(),
            operation: Some(self.operation.to_string()),
            entity_type: self.entity_type,
            entity_id: self.entity_id,
        };

        (status, Json(response)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        if err.is_client_error() {
            let message = match err {
                Error::InvalidArgument(message) => message,
                other => other.to_string(),
            };
            return Self::bad_request(message);
        }

        // Wiring details stay in the log
        tracing::error!(error = %err, "Query pipeline failure");
        Self::internal("An internal error occurred")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_kind_status_codes() {
        assert_eq!(ApiErrorKind::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ApiErrorKind::BadRequest.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiErrorKind::Conflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(
            ApiErrorKind::InternalError.status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_error_kind_error_code() {
        assert_eq!(ApiErrorKind::NotFound.error_code(), "NOT_FOUND");
        assert_eq!(ApiErrorKind::BadRequest.error_code(), "BAD_REQUEST");
        assert_eq!(ApiErrorKind::Conflict.error_code(), "CONFLICT");
    }

    #[test]
    fn test_not_found_display() {
        let error = ApiError::not_found("Author", "abc");
        assert_eq!(
            error.to_string(),
            "API not_found error during get: Entity not found [Author: abc]"
        );
    }

    #[test]
    fn test_invalid_argument_becomes_bad_request() {
        let error = ApiError::from(Error::invalid_argument("Key mapping for Title is missing"));
        assert_eq!(error.kind, ApiErrorKind::BadRequest);
        assert_eq!(error.message, "Key mapping for Title is missing");
    }

    #[test]
    fn test_configuration_error_is_hidden() {
        let error = ApiError::from(Error::configuration("Cannot find exact property mapping"));
        assert_eq!(error.kind, ApiErrorKind::InternalError);
        assert_eq!(error.message, "An internal error occurred");
    }

    #[test]
    fn test_into_response_status() {
        let response = ApiError::bad_request("Unknown field").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::not_found("Author", "x").into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_with_operation() {
        let error = ApiError::internal("boom").with_operation(ApiOperation::Delete);
        assert_eq!(error.operation, ApiOperation::Delete);
        assert_eq!(
            error.to_string(),
            "API internal_error error during delete: boom"
        );
    }

    #[test]
    fn test_conflict_display() {
        let error = ApiError::conflict(ApiOperation::Create, "Author already exists")
            .with_entity("Author", "abc");
        assert_eq!(
            error.to_string(),
            "API conflict error during create: Author already exists [Author: abc]"
        );
    }
}
