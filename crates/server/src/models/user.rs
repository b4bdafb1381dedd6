//! User domain types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use clothesline_core::{Email, UserId};

/// A registered user as held in the data file.
///
/// `password_hash` is an argon2id PHC string; the plaintext password is never
/// stored anywhere. This type is for persistence and services only - API
/// responses use [`UserView`], which carries no hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// Unique user id.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Normalized email address, unique across users.
    pub email: Email,
    /// Argon2id password hash in PHC string format.
    pub password_hash: String,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
    /// When the profile or password last changed.
    pub updated_at: DateTime<Utc>,
}

/// The caller-facing projection of a [`User`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub name: String,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            created_at: user.created_at,
        }
    }
}
