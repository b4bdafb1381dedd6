//! Unified error handling.
//!
//! Provides a unified `AppError` type mapping service failures onto HTTP
//! responses. All route handlers return `Result<T, AppError>`; the response
//! body is a JSON object with a human-readable `message`, which the calling
//! layer presents verbatim or maps to localized text.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::services::auth::AuthError;
use crate::services::cart::CartError;
use crate::services::orders::OrderError;
use crate::store::StoreError;

/// Application-level error type for the server.
#[derive(Debug, Error)]
pub enum AppError {
    /// Identity operation failed.
    #[error("auth error: {0}")]
    Auth(#[from] AuthError),

    /// Cart operation failed.
    #[error("cart error: {0}")]
    Cart(#[from] CartError),

    /// Order operation failed.
    #[error("order error: {0}")]
    Order(#[from] OrderError),

    /// Persistence operation failed.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Bad request from client.
    #[error("bad request: {0}")]
    BadRequest(String),
}

impl AppError {
    fn status(&self) -> StatusCode {
        match self {
            Self::Auth(err) => match err {
                AuthError::InvalidEmail(_)
                | AuthError::WeakPassword(_)
                | AuthError::MissingField(_) => StatusCode::BAD_REQUEST,
                AuthError::InvalidCredentials
                | AuthError::UserNotFound
                | AuthError::InvalidToken => StatusCode::UNAUTHORIZED,
                AuthError::UserAlreadyExists => StatusCode::CONFLICT,
                AuthError::TokenIssue | AuthError::PasswordHash => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
                AuthError::Store(err) => store_status(err),
            },
            Self::Cart(err) => match err {
                CartError::InvalidQuantity
                | CartError::InvalidPrice
                | CartError::MissingField(_) => StatusCode::BAD_REQUEST,
                CartError::ItemNotFound => StatusCode::NOT_FOUND,
                CartError::Store(err) => store_status(err),
            },
            Self::Order(err) => match err {
                OrderError::MissingAddressField(_)
                | OrderError::IncompleteCard
                | OrderError::EmptyCart => StatusCode::BAD_REQUEST,
                OrderError::UnknownUser => StatusCode::UNAUTHORIZED,
                OrderError::NotFound => StatusCode::NOT_FOUND,
                OrderError::Store(err) => store_status(err),
            },
            Self::Store(err) => store_status(err),
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    fn message(&self) -> String {
        let status = self.status();
        if status.is_server_error() {
            // Don't expose internal error details to clients.
            if status == StatusCode::SERVICE_UNAVAILABLE {
                "Storage temporarily unavailable, please retry".to_owned()
            } else {
                "Internal server error".to_owned()
            }
        } else {
            match self {
                Self::Auth(err) => err.to_string(),
                Self::Cart(err) => err.to_string(),
                Self::Order(err) => err.to_string(),
                Self::Store(err) => err.to_string(),
                Self::BadRequest(message) => message.clone(),
            }
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        StoreError::Corrupt(_) | StoreError::Encode(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self, "request error");
        }

        (status, Json(json!({ "message": self.message() }))).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;
