//! API error types and responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use ledgerly_core::UserError;
use ledgerly_store::StoreError;

use crate::upload::UploadError;

/// Error type returned by the domain modules (users, circles, friends, …).
///
/// Handlers convert this into an [`ApiError`]; validation and conflict
/// failures are raised before any write is attempted.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// A domain-rule failure.
    #[error(transparent)]
    User(#[from] UserError),

    /// A storage failure.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The image host reported a failure.
    #[error(transparent)]
    Upload(#[from] UploadError),
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Unauthorized - missing or invalid credentials.
    #[error("unauthorized")]
    Unauthorized,

    /// Resource not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Bad request - invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Conflict - resource already exists.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error.
    #[error("internal error: {0}")]
    Internal(String),

    /// External service error.
    #[error("external service error: {0}")]
    ExternalService(String),
}

/// JSON error response body.
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    code: String,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            Self::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized", self.to_string()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, "not_found", msg.clone()),
            Self::BadRequest(msg) => (StatusCode::BAD_REQUEST, "bad_request", msg.clone()),
            Self::Conflict(msg) => (StatusCode::CONFLICT, "conflict", msg.clone()),
            Self::Internal(msg) => {
                tracing::error!(error = %msg, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                )
            }
            Self::ExternalService(msg) => {
                (StatusCode::BAD_GATEWAY, "external_service_error", msg.clone())
            }
        };

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message,
            },
        };

        (status, Json(body)).into_response()
    }
}

impl From<UserError> for ApiError {
    fn from(err: UserError) -> Self {
        match &err {
            UserError::InvalidUsername
            | UserError::SelfFriendship
            | UserError::SelfSettlement
            | UserError::NotAMember { .. }
            | UserError::InvalidId(_) => Self::BadRequest(err.to_string()),
            UserError::UsernameTaken { .. }
            | UserError::UserAlreadyExists { .. }
            | UserError::AlreadyFriends => Self::Conflict(err.to_string()),
            UserError::UserNotFound { .. }
            | UserError::CircleNotFound { .. }
            | UserError::FriendRequestNotFound { .. } => Self::NotFound(err.to_string()),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound { entity, id } => Self::NotFound(format!("{entity} not found: {id}")),
            StoreError::Database(msg) | StoreError::Serialization(msg) => Self::Internal(msg),
        }
    }
}

impl From<UploadError> for ApiError {
    fn from(err: UploadError) -> Self {
        Self::ExternalService(err.to_string())
    }
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::User(err) => err.into(),
            ServiceError::Store(err) => err.into(),
            ServiceError::Upload(err) => err.into(),
        }
    }
}
