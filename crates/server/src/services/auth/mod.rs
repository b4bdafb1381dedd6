//! Identity provider.
//!
//! Registration, password login, stateless session tokens, and profile
//! management. Passwords are stored only as argon2id hashes; sessions are
//! bearer JWTs issued by [`TokenService`].

mod error;
mod tokens;

pub use error::AuthError;
pub use tokens::{SessionClaims, TokenService};

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::Utc;

use clothesline_core::{Email, UserId};

use crate::models::User;
use crate::store::Store;

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 6;

/// Identity service.
///
/// Handles user registration, login, password changes, and profile updates.
pub struct AuthService<'a> {
    store: &'a Store,
}

impl<'a> AuthService<'a> {
    /// Create a new identity service over the store.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Register a new user with name, email, and password.
    ///
    /// The email is normalized (trimmed, lowercased) before the uniqueness
    /// check and storage.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if the name is blank.
    /// Returns `AuthError::InvalidEmail` if the email format is invalid.
    /// Returns `AuthError::WeakPassword` if the password is too short.
    /// Returns `AuthError::UserAlreadyExists` if the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }
        let email = Email::parse(email)?;
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        // The uniqueness check and the insert must not interleave with
        // another registration.
        let _users = self.store.lock_users().await;

        if self
            .store
            .read(|s| s.user_by_email(&email).is_some())
            .await
        {
            return Err(AuthError::UserAlreadyExists);
        }

        let name = name.to_owned();
        let user = self
            .store
            .commit(move |s| {
                let now = Utc::now();
                let user = User {
                    id: s.next_user_id(),
                    name,
                    email,
                    password_hash,
                    created_at: now,
                    updated_at: now,
                };
                s.users.push(user.clone());
                user
            })
            .await?;

        tracing::info!(user_id = %user.id, "user registered");
        Ok(user)
    }

    /// Login with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` whether the email is unknown
    /// or the password is wrong; the two are indistinguishable by design.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        // A malformed email matches no user; same generic failure.
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .store
            .read(|s| s.user_by_email(&email).cloned())
            .await
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        Ok(user)
    }

    /// Get a user by id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the id resolves to no user.
    pub async fn get_user(&self, user_id: UserId) -> Result<User, AuthError> {
        self.store
            .read(|s| s.user(user_id).cloned())
            .await
            .ok_or(AuthError::UserNotFound)
    }

    /// Change a user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the current password does
    /// not verify, `AuthError::WeakPassword` if the new one is too short.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        validate_password(new_password)?;

        let _users = self.store.lock_users().await;

        let user = self
            .store
            .read(|s| s.user(user_id).cloned())
            .await
            .ok_or(AuthError::UserNotFound)?;
        verify_password(current_password, &user.password_hash)?;

        let password_hash = hash_password(new_password)?;
        self.store
            .commit(move |s| {
                if let Some(user) = s.user_mut(user_id) {
                    user.password_hash = password_hash;
                    user.updated_at = Utc::now();
                }
            })
            .await?;

        tracing::info!(user_id = %user_id, "password changed");
        Ok(())
    }

    /// Update a user's display name.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` if the name is blank,
    /// `AuthError::UserNotFound` if the id resolves to no user.
    pub async fn update_profile(&self, user_id: UserId, name: &str) -> Result<User, AuthError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AuthError::MissingField("name"));
        }

        let _users = self.store.lock_users().await;

        if self.store.read(|s| s.user(user_id).is_none()).await {
            return Err(AuthError::UserNotFound);
        }

        let name = name.to_owned();
        let user = self
            .store
            .commit(move |s| {
                s.user_mut(user_id).map(|user| {
                    user.name = name;
                    user.updated_at = Utc::now();
                    user.clone()
                })
            })
            .await?
            .ok_or(AuthError::UserNotFound)?;

        Ok(user)
    }
}

/// Validate password meets requirements.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Hash a password using Argon2id.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    let argon2 = Argon2::default();

    argon2
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path().join("clothesline.json"), Duration::from_secs(5)).unwrap()
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let auth = AuthService::new(&store);

        let user = auth
            .register("Amina", " Amina@Example.com ", "secret1")
            .await
            .unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.email.as_str(), "amina@example.com");
        assert_ne!(user.password_hash, "secret1");

        let logged_in = auth.login("amina@example.com", "secret1").await.unwrap();
        assert_eq!(logged_in.id, user.id);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let auth = AuthService::new(&store);

        auth.register("A", "a@x.com", "secret1").await.unwrap();
        let err = auth.register("A2", "A@X.COM", "secret2").await.unwrap_err();
        assert!(matches!(err, AuthError::UserAlreadyExists));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let auth = AuthService::new(&store);

        auth.register("A", "a@x.com", "secret1").await.unwrap();

        let wrong_password = auth.login("a@x.com", "wrong1").await.unwrap_err();
        let unknown_email = auth.login("nobody@x.com", "secret1").await.unwrap_err();
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
        assert!(matches!(wrong_password, AuthError::InvalidCredentials));
    }

    #[tokio::test]
    async fn test_register_validation() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let auth = AuthService::new(&store);

        assert!(matches!(
            auth.register("", "a@x.com", "secret1").await.unwrap_err(),
            AuthError::MissingField("name")
        ));
        assert!(matches!(
            auth.register("A", "not-an-email", "secret1").await.unwrap_err(),
            AuthError::InvalidEmail(_)
        ));
        assert!(matches!(
            auth.register("A", "a@x.com", "short").await.unwrap_err(),
            AuthError::WeakPassword(_)
        ));
    }

    #[tokio::test]
    async fn test_change_password() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let auth = AuthService::new(&store);

        let user = auth.register("A", "a@x.com", "secret1").await.unwrap();

        assert!(matches!(
            auth.change_password(user.id, "wrong1", "secret2").await.unwrap_err(),
            AuthError::InvalidCredentials
        ));
        assert!(matches!(
            auth.change_password(user.id, "secret1", "tiny").await.unwrap_err(),
            AuthError::WeakPassword(_)
        ));

        auth.change_password(user.id, "secret1", "secret2").await.unwrap();
        assert!(auth.login("a@x.com", "secret1").await.is_err());
        assert!(auth.login("a@x.com", "secret2").await.is_ok());
    }

    #[tokio::test]
    async fn test_update_profile() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let auth = AuthService::new(&store);

        let user = auth.register("A", "a@x.com", "secret1").await.unwrap();
        let updated = auth.update_profile(user.id, "Amina Bello").await.unwrap();
        assert_eq!(updated.name, "Amina Bello");

        assert!(matches!(
            auth.update_profile(user.id, "  ").await.unwrap_err(),
            AuthError::MissingField("name")
        ));
        assert!(matches!(
            auth.update_profile(UserId::new(99), "X").await.unwrap_err(),
            AuthError::UserNotFound
        ));
    }
}
