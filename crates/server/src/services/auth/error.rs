//! Authentication error types.

use thiserror::Error;

use crate::store::StoreError;

/// Errors that can occur during identity operations.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("invalid email: {0}")]
    InvalidEmail(#[from] clothesline_core::EmailError),

    /// Invalid credentials. One message for unknown email and wrong
    /// password alike, so callers cannot probe which emails exist.
    #[error("invalid email or password")]
    InvalidCredentials,

    /// Caller presented a valid-looking id that resolves to no user.
    #[error("user not found")]
    UserNotFound,

    /// Registration against an email that is already taken.
    #[error("user already registered, please login")]
    UserAlreadyExists,

    /// Password too weak or invalid.
    #[error("password validation failed: {0}")]
    WeakPassword(String),

    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// Session token missing, malformed, tampered with, or expired.
    #[error("invalid or expired session token")]
    InvalidToken,

    /// Session token could not be signed.
    #[error("failed to issue session token")]
    TokenIssue,

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,

    /// Persistence error.
    #[error(transparent)]
    Store(#[from] StoreError),
}
