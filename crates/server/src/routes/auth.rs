//! Authentication route handlers.
//!
//! Signup and login issue stateless bearer tokens; the profile and password
//! routes operate on the token's user.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::models::UserView;
use crate::services::auth::AuthService;
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Signup request payload.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Login request payload.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Password change request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

/// Profile update request payload.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: String,
}

/// Response carrying a session token and the user it belongs to.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: String,
    pub token: String,
    pub user: UserView,
}

/// Response carrying just a message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

/// Response carrying the user.
#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    pub message: String,
    pub user: UserView,
}

// =============================================================================
// Handlers
// =============================================================================

/// Register a new user and issue a session token.
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    let auth = AuthService::new(state.store());
    let user = auth
        .register(&request.name, &request.email, &request.password)
        .await?;
    let token = state.tokens().issue(&user)?;

    Ok((
        StatusCode::CREATED,
        Json(SessionResponse {
            message: "User created successfully".to_owned(),
            token,
            user: UserView::from(&user),
        }),
    ))
}

/// Authenticate and issue a session token.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<SessionResponse>> {
    let auth = AuthService::new(state.store());
    let user = auth.login(&request.email, &request.password).await?;
    let token = state.tokens().issue(&user)?;

    Ok(Json(SessionResponse {
        message: "Login successful".to_owned(),
        token,
        user: UserView::from(&user),
    }))
}

/// Current user's profile.
pub async fn profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<UserView>> {
    let user = AuthService::new(state.store()).get_user(current.id).await?;
    Ok(Json(UserView::from(&user)))
}

/// Update the current user's display name.
pub async fn update_profile(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<ProfileResponse>> {
    let user = AuthService::new(state.store())
        .update_profile(current.id, &request.name)
        .await?;

    Ok(Json(ProfileResponse {
        message: "Profile updated".to_owned(),
        user: UserView::from(&user),
    }))
}

/// Change the current user's password.
pub async fn change_password(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(request): Json<ChangePasswordRequest>,
) -> Result<Json<MessageResponse>> {
    AuthService::new(state.store())
        .change_password(current.id, &request.current_password, &request.new_password)
        .await?;

    Ok(Json(MessageResponse {
        message: "Password changed".to_owned(),
    }))
}
