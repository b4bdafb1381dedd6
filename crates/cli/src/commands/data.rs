//! Data-file inspection commands.

use thiserror::Error;

use clothesline_server::store::{Store, StoreError};

use super::{SAVE_TIMEOUT, data_path};

/// Errors that can occur during data commands.
#[derive(Debug, Error)]
pub enum DataCommandError {
    /// The data file could not be opened.
    #[error("data file error: {0}")]
    Store(#[from] StoreError),
}

/// Print a summary of the data file: users, carts, orders.
///
/// # Errors
///
/// Returns `DataCommandError` when the data file cannot be opened.
pub async fn show() -> Result<(), DataCommandError> {
    let path = data_path();
    let store = Store::open(&path, SAVE_TIMEOUT)?;

    let (users, carts, orders) = store
        .read(|s| {
            let carts: usize = s.carts_by_user.values().map(Vec::len).sum();
            let orders: usize = s.orders_by_user.values().map(Vec::len).sum();
            (s.users.len(), carts, orders)
        })
        .await;

    tracing::info!(path = %path.display(), "data file summary");
    tracing::info!(users, cart_line_items = carts, orders, "totals");
    Ok(())
}
