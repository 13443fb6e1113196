//! Error handling utilities for API responses.
//!
//! Provides structured error responses and conversion between service-layer errors
//! and HTTP responses. Includes:
//! - Standard error response format
//! - ServiceError to HTTP status code mapping
//! - Pagination support for list endpoints
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `detail`: Human-readable message
//! - `error_type`: Machine-readable error category
//! - `timestamp`: When the error was produced
//!
//! 401 responses additionally carry a `WWW-Authenticate: Bearer` challenge.
//! Request bodies, paths and queries are read through the `Api*` extractors
//! below so that malformed input is reported in the same format.
//!
//! # Error Handling Flow
//! 1. Service layer returns domain-specific `ServiceError`
//! 2. `service_error_to_http` converts to an `ApiError`
//! 3. `ApiError` renders itself as the HTTP response

use crate::errors::ServiceError;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts,
        rejection::{FormRejection, JsonRejection, PathRejection, QueryRejection},
    },
    http::{HeaderValue, StatusCode, header::WWW_AUTHENTICATE},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};

/// Body of every error response.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Human-readable message
    pub detail: String,
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Response timestamp
    pub timestamp: String,
}

/// An HTTP error ready to be returned from a handler.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error_type: &'static str,
    pub detail: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error_type: &'static str, detail: impl Into<String>) -> Self {
        Self {
            status,
            error_type,
            detail: detail.into(),
        }
    }

    /// 401 with the bearer challenge.
    pub fn unauthorized(detail: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, "unauthorized", detail)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.detail,
            error_type: self.error_type.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        let mut response = (self.status, Json(body)).into_response();
        if self.status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<ServiceError> for ApiError {
    fn from(error: ServiceError) -> Self {
        service_error_to_http(error)
    }
}

/// JSON body extractor.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// URL-encoded form extractor.
#[derive(FromRequest)]
#[from_request(via(axum::Form), rejection(ApiError))]
pub struct ApiForm<T>(pub T);

/// Path parameter extractor.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(ApiError))]
pub struct ApiPath<T>(pub T);

/// Query string extractor.
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(ApiError))]
pub struct ApiQuery<T>(pub T);

/// Keeps axum's status (400, 415 or 422) and its description of the problem.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(rejection.status(), "validation_error", rejection.body_text())
    }
}

impl From<FormRejection> for ApiError {
    fn from(rejection: FormRejection) -> Self {
        ApiError::new(rejection.status(), "validation_error", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::new(rejection.status(), "validation_error", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::new(rejection.status(), "validation_error", rejection.body_text())
    }
}

/// Skip/limit query parameters for list endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationFilter {
    /// Number of rows to skip
    pub skip: Option<u32>,
    /// Maximum number of rows to return
    pub limit: Option<u32>,
}

impl PaginationFilter {
    /// Calculate offset for database queries
    pub fn offset(&self) -> i64 {
        i64::from(self.skip.unwrap_or(0))
    }

    /// Get limit for database queries
    pub fn limit(&self) -> i64 {
        i64::from(self.limit.unwrap_or(100))
    }
}

impl Default for PaginationFilter {
    fn default() -> Self {
        Self {
            skip: Some(0),
            limit: Some(100),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    match error {
        ServiceError::Validation { message } => {
            ApiError::new(StatusCode::UNPROCESSABLE_ENTITY, "validation_error", message)
        }
        ServiceError::NotFound { entity, .. } => ApiError::new(
            StatusCode::NOT_FOUND,
            "not_found",
            format!("{} not found", entity),
        ),
        ServiceError::AlreadyExists { message } => {
            ApiError::new(StatusCode::BAD_REQUEST, "already_exists", message)
        }
        ServiceError::Unauthorized { message } => ApiError::unauthorized(message),
        ServiceError::Template { message } => {
            tracing::error!("Template rendering failed: {}", message);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "template_error",
                "Internal server error",
            )
        }
        ServiceError::Database { source } => {
            tracing::error!("Database error: {:#}", source);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "database_error",
                "Internal server error",
            )
        }
        ServiceError::InternalError { message } => {
            tracing::error!("Internal error: {}", message);
            ApiError::new(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "Internal server error",
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_filter() {
        let filter = PaginationFilter {
            skip: Some(20),
            limit: Some(50),
        };
        assert_eq!(filter.offset(), 20);
        assert_eq!(filter.limit(), 50);

        let empty = PaginationFilter {
            skip: None,
            limit: None,
        };
        assert_eq!(empty.offset(), 0);
        assert_eq!(empty.limit(), 100);
    }

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ServiceError::validation("bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (ServiceError::not_found("Template", 7), StatusCode::NOT_FOUND),
            (
                ServiceError::already_exists("Email already registered"),
                StatusCode::BAD_REQUEST,
            ),
            (ServiceError::unauthorized("nope"), StatusCode::UNAUTHORIZED),
            (ServiceError::template("unclosed"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                ServiceError::from(anyhow::anyhow!("disk I/O error")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(service_error_to_http(error).status, expected);
        }
    }

    #[test]
    fn test_unauthorized_carries_bearer_challenge() {
        let response = ApiError::unauthorized("Could not validate credentials").into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.headers().get(WWW_AUTHENTICATE).unwrap(), "Bearer");

        let response = ApiError::new(StatusCode::NOT_FOUND, "not_found", "x").into_response();
        assert!(response.headers().get(WWW_AUTHENTICATE).is_none());
    }

    #[test]
    fn test_database_details_are_not_leaked() {
        let error = service_error_to_http(anyhow::anyhow!("secret table layout").into());
        assert_eq!(error.detail, "Internal server error");
    }
}
