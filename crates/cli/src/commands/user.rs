//! User management commands.
//!
//! # Usage
//!
//! ```bash
//! clothesline user create -e amina@example.com -n "Amina Bello" -p secret1
//! ```

use thiserror::Error;

use clothesline_server::services::auth::{AuthError, AuthService};
use clothesline_server::store::{Store, StoreError};

use super::{SAVE_TIMEOUT, data_path};

/// Errors that can occur during user commands.
#[derive(Debug, Error)]
pub enum UserCommandError {
    /// The data file could not be opened.
    #[error("data file error: {0}")]
    Store(#[from] StoreError),

    /// Registration failed.
    #[error("registration failed: {0}")]
    Auth(#[from] AuthError),
}

/// Create a new user directly in the data file.
///
/// Runs the same registration path as the API: normalized email, uniqueness
/// check, argon2id hash.
///
/// # Errors
///
/// Returns `UserCommandError` when the data file cannot be opened or the
/// registration is rejected.
pub async fn create(email: &str, name: &str, password: &str) -> Result<(), UserCommandError> {
    let path = data_path();
    let store = Store::open(&path, SAVE_TIMEOUT)?;

    let user = AuthService::new(&store).register(name, email, password).await?;

    tracing::info!(
        user_id = %user.id,
        email = %user.email,
        path = %path.display(),
        "user created"
    );
    Ok(())
}
