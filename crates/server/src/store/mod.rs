//! Persistence gateway: a single JSON data file owned by this process.
//!
//! # Durability model
//!
//! The full [`StoreSnapshot`] lives in memory behind a read-write lock and is
//! the authoritative state between saves. Every mutation goes through
//! [`Store::commit`], which applies the change to a working copy, writes the
//! whole document to a sibling temp file, fsyncs, renames it over the data
//! file, and only then publishes the working copy to memory. A reader never
//! observes a half-written file, and a failed or timed-out save leaves both
//! the file and the in-memory state exactly as they were.
//!
//! # Locking
//!
//! - [`Store::lock_user`] hands out a per-user async mutex. Cart and order
//!   operations hold it across their read-modify-write so near-simultaneous
//!   calls for the same user serialize instead of losing updates. Operations
//!   for different users proceed concurrently.
//! - [`Store::lock_users`] serializes mutations of the global users table
//!   (registration's uniqueness check-and-insert, password changes).
//! - A single writer lock orders the temp-file/rename sequence itself.

mod snapshot;

pub use snapshot::StoreSnapshot;

use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::io::AsyncWriteExt;
use tokio::sync::{Mutex, MutexGuard, OwnedMutexGuard, RwLock};

use clothesline_core::UserId;

/// Errors surfaced by the persistence gateway.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The underlying medium is unreadable in an unrecoverable way.
    #[error("data file is unreadable: {0}")]
    Corrupt(String),

    /// A durable save failed or timed out; safe to retry.
    #[error("storage unavailable: {0}")]
    Unavailable(String),

    /// The snapshot could not be encoded.
    #[error("failed to encode data file: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Durable key-value store mapping users to their carts, orders, and saved
/// checkout preferences, plus the global users table.
pub struct Store {
    path: PathBuf,
    save_timeout: Duration,
    state: RwLock<StoreSnapshot>,
    user_locks: Mutex<HashMap<UserId, Arc<Mutex<()>>>>,
    users_lock: Mutex<()>,
    writer: Mutex<()>,
}

impl Store {
    /// Open the store at `path`, loading durable state.
    ///
    /// A missing file or a blank/malformed document degrades to empty
    /// defaults (with a warning for the malformed case); only an unreadable
    /// medium is an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Corrupt` if the file exists but cannot be read.
    pub fn open(path: impl Into<PathBuf>, save_timeout: Duration) -> Result<Self, StoreError> {
        let path = path.into();
        let snapshot = load_or_default(&path)?;

        Ok(Self {
            path,
            save_timeout,
            state: RwLock::new(snapshot),
            user_locks: Mutex::new(HashMap::new()),
            users_lock: Mutex::new(()),
            writer: Mutex::new(()),
        })
    }

    /// Run a closure against the current snapshot.
    pub async fn read<T>(&self, f: impl FnOnce(&StoreSnapshot) -> T) -> T {
        let state = self.state.read().await;
        f(&state)
    }

    /// Apply a mutation and record it durably, or not at all.
    ///
    /// The closure runs against a working copy; memory is only updated after
    /// the save lands, so callers observing a `StoreError` can rely on
    /// nothing having changed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Unavailable` when the save fails or exceeds the
    /// configured timeout, `StoreError::Encode` when serialization fails.
    pub async fn commit<T>(
        &self,
        mutate: impl FnOnce(&mut StoreSnapshot) -> T,
    ) -> Result<T, StoreError> {
        let _writer = self.writer.lock().await;

        let mut working = self.state.read().await.clone();
        let out = mutate(&mut working);
        let bytes = serde_json::to_vec_pretty(&working)?;

        match tokio::time::timeout(self.save_timeout, write_atomic(&self.path, &bytes)).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(StoreError::Unavailable(e.to_string())),
            Err(_) => {
                return Err(StoreError::Unavailable(format!(
                    "save did not complete within {}ms",
                    self.save_timeout.as_millis()
                )));
            }
        }

        // If the caller is cancelled between the rename and this publish,
        // the next commit re-serializes the unpublished in-memory state and
        // overwrites the file; state stays consistent either way.
        *self.state.write().await = working;
        Ok(out)
    }

    /// Acquire the mutation lock for one user.
    ///
    /// Hold the guard across the whole read-modify-write of that user's
    /// data. Locks for different users are independent.
    pub async fn lock_user(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.user_locks.lock().await;
            Arc::clone(locks.entry(user_id).or_default())
        };
        lock.lock_owned().await
    }

    /// Acquire the mutation lock for the global users table.
    pub async fn lock_users(&self) -> MutexGuard<'_, ()> {
        self.users_lock.lock().await
    }

    /// Path of the data file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Read the data file, degrading defensively.
fn load_or_default(path: &Path) -> Result<StoreSnapshot, StoreError> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(StoreSnapshot::default()),
        Err(e) => return Err(StoreError::Corrupt(e.to_string())),
    };

    if raw.trim().is_empty() {
        return Ok(StoreSnapshot::default());
    }

    match serde_json::from_str(&raw) {
        Ok(snapshot) => Ok(snapshot),
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "data file is malformed, starting from empty state"
            );
            Ok(StoreSnapshot::default())
        }
    }
}

/// Write bytes to a sibling temp file, fsync, and rename over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = tokio::fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    tokio::fs::rename(&tmp, path).await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use clothesline_core::{CartLineItem, Email, LineItemId};
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::User;

    const SAVE_TIMEOUT: Duration = Duration::from_secs(5);

    fn data_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("clothesline.json")
    }

    fn line_item(quantity: u32) -> CartLineItem {
        CartLineItem {
            id: LineItemId::generate(),
            product_id: "P1".to_owned(),
            product_name: "Denim Jacket".to_owned(),
            product_price: Decimal::new(8999, 2),
            product_image: "products/denim-jacket.png".to_owned(),
            quantity,
            size: "L".to_owned(),
        }
    }

    #[tokio::test]
    async fn test_open_missing_file_yields_empty_state() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open(data_path(&dir), SAVE_TIMEOUT).unwrap();
        assert!(store.read(|s| s.users.is_empty()).await);
    }

    #[tokio::test]
    async fn test_commit_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = data_path(&dir);

        let store = Store::open(&path, SAVE_TIMEOUT).unwrap();
        store
            .commit(|s| s.cart_mut(UserId::new(1)).push(line_item(2)))
            .await
            .unwrap();
        drop(store);

        let reopened = Store::open(&path, SAVE_TIMEOUT).unwrap();
        let cart = reopened.read(|s| s.cart(UserId::new(1)).to_vec()).await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_blank_and_malformed_files_degrade_to_defaults() {
        let dir = tempfile::tempdir().unwrap();

        let blank = data_path(&dir);
        std::fs::write(&blank, "  \n").unwrap();
        let store = Store::open(&blank, SAVE_TIMEOUT).unwrap();
        assert!(store.read(|s| s.users.is_empty()).await);

        let malformed = dir.path().join("broken.json");
        std::fs::write(&malformed, "{\"users\": [tru").unwrap();
        let store = Store::open(&malformed, SAVE_TIMEOUT).unwrap();
        assert!(store.read(|s| s.users.is_empty()).await);
    }

    #[tokio::test]
    async fn test_failed_save_leaves_state_untouched() {
        let dir = tempfile::tempdir().unwrap();
        // Parent directory does not exist, so the temp-file create fails.
        let path = dir.path().join("missing").join("clothesline.json");

        let store = Store::open(&path, SAVE_TIMEOUT).unwrap();
        let err = store
            .commit(|s| s.cart_mut(UserId::new(1)).push(line_item(1)))
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Unavailable(_)));
        assert!(store.read(|s| s.cart(UserId::new(1)).is_empty()).await);
    }

    #[tokio::test]
    async fn test_unreadable_file_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        // A directory at the data path cannot be read as a file.
        let path = dir.path().join("clothesline.json");
        std::fs::create_dir(&path).unwrap();

        assert!(matches!(
            Store::open(&path, SAVE_TIMEOUT),
            Err(StoreError::Corrupt(_))
        ));
    }

    #[tokio::test]
    async fn test_per_user_lock_serializes_read_modify_write() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(Store::open(data_path(&dir), SAVE_TIMEOUT).unwrap());
        let user_id = UserId::new(1);

        store
            .commit(|s| s.cart_mut(user_id).push(line_item(0)))
            .await
            .unwrap();

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                let _guard = store.lock_user(user_id).await;
                // Read outside commit, then write: the lock is what protects
                // this two-step sequence from lost updates.
                let current = store
                    .read(|s| s.cart(user_id).first().map_or(0, |i| i.quantity))
                    .await;
                store
                    .commit(|s| {
                        if let Some(item) = s.cart_mut(user_id).first_mut() {
                            item.quantity = current + 1;
                        }
                    })
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let quantity = store
            .read(|s| s.cart(user_id).first().map_or(0, |i| i.quantity))
            .await;
        assert_eq!(quantity, 8);
    }

    #[tokio::test]
    async fn test_users_roundtrip_with_hash() {
        let dir = tempfile::tempdir().unwrap();
        let path = data_path(&dir);

        let store = Store::open(&path, SAVE_TIMEOUT).unwrap();
        store
            .commit(|s| {
                let id = s.next_user_id();
                s.users.push(User {
                    id,
                    name: "Amina".to_owned(),
                    email: Email::parse("amina@example.com").unwrap(),
                    password_hash: "$argon2id$stub".to_owned(),
                    created_at: Utc::now(),
                    updated_at: Utc::now(),
                });
            })
            .await
            .unwrap();

        let reopened = Store::open(&path, SAVE_TIMEOUT).unwrap();
        let user = reopened
            .read(|s| s.user_by_email(&Email::parse("amina@example.com").unwrap()).cloned())
            .await
            .unwrap();
        assert_eq!(user.id, UserId::new(1));
        assert_eq!(user.password_hash, "$argon2id$stub");
    }
}
