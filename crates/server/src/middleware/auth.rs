//! Bearer-token authentication extractor.
//!
//! Every cart and order route is keyed by an authenticated user id. The
//! transport presents `Authorization: Bearer <token>`; the extractor
//! verifies the token and hands the handler a resolved [`CurrentUser`].

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use clothesline_core::UserId;

use crate::error::AppError;
use crate::services::auth::AuthError;
use crate::state::AppState;

/// The authenticated caller, as resolved from the bearer token.
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User id the token was issued for.
    pub id: UserId,
    /// Email at token issue time.
    pub email: String,
}

/// Extractor that requires a valid bearer session token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireUser(user): RequireUser) -> impl IntoResponse {
///     format!("hello, {}", user.email)
/// }
/// ```
pub struct RequireUser(pub CurrentUser);

impl FromRequestParts<AppState> for RequireUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Auth(AuthError::InvalidToken))?;

        let claims = state.tokens().verify(token)?;

        Ok(Self(CurrentUser {
            id: claims.user_id(),
            email: claims.email,
        }))
    }
}
