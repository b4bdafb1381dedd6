//! Cart store.
//!
//! A cart is a per-user ordered sequence of line items. The central
//! invariant: one line item per `(product_id, size)` pair - adding the same
//! product in the same size again increments the existing quantity instead
//! of creating a duplicate row.

use rust_decimal::Decimal;
use thiserror::Error;

use clothesline_core::{CartLineItem, LineItemId, UserId};

use crate::store::{Store, StoreError};

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Quantity below one.
    #[error("quantity must be at least 1")]
    InvalidQuantity,

    /// Negative unit price.
    #[error("price must not be negative")]
    InvalidPrice,

    /// A required field is blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// No line item with the given id in this user's cart.
    #[error("cart item not found")]
    ItemNotFound,

    /// Persistence error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for [`CartService::add`].
#[derive(Debug, Clone)]
pub struct AddItem {
    pub product_id: String,
    pub product_name: String,
    pub product_price: Decimal,
    pub product_image: String,
    pub quantity: u32,
    pub size: String,
}

impl AddItem {
    fn validate(&self) -> Result<(), CartError> {
        if self.product_id.trim().is_empty() {
            return Err(CartError::MissingField("product id"));
        }
        if self.product_name.trim().is_empty() {
            return Err(CartError::MissingField("product name"));
        }
        if self.size.trim().is_empty() {
            return Err(CartError::MissingField("size"));
        }
        if self.quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }
        if self.product_price < Decimal::ZERO {
            return Err(CartError::InvalidPrice);
        }
        Ok(())
    }
}

/// Cart service.
///
/// Every mutation holds the owner's per-user lock across its
/// read-modify-write and goes through one durable commit, so concurrent
/// calls for the same user serialize and either fully apply or not at all.
pub struct CartService<'a> {
    store: &'a Store,
}

impl<'a> CartService<'a> {
    /// Create a new cart service over the store.
    #[must_use]
    pub const fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Get a user's cart; empty if they have none yet. Never fails.
    pub async fn get(&self, user_id: UserId) -> Vec<CartLineItem> {
        self.store.read(|s| s.cart(user_id).to_vec()).await
    }

    /// Add an item to the cart, merging by `(product_id, size)`.
    ///
    /// Returns the updated cart.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity`, `CartError::InvalidPrice`, or
    /// `CartError::MissingField` on bad input; `CartError::Store` when the
    /// mutation cannot be recorded durably.
    pub async fn add(&self, user_id: UserId, item: AddItem) -> Result<Vec<CartLineItem>, CartError> {
        item.validate()?;

        let _user = self.store.lock_user(user_id).await;

        let cart = self
            .store
            .commit(move |s| {
                let cart = s.cart_mut(user_id);
                if let Some(existing) = cart
                    .iter_mut()
                    .find(|line| line.matches(&item.product_id, &item.size))
                {
                    existing.quantity += item.quantity;
                } else {
                    cart.push(CartLineItem {
                        id: LineItemId::generate(),
                        product_id: item.product_id,
                        product_name: item.product_name,
                        product_price: item.product_price,
                        product_image: item.product_image,
                        quantity: item.quantity,
                        size: item.size,
                    });
                }
                cart.clone()
            })
            .await?;

        Ok(cart)
    }

    /// Remove the line item with the given id.
    ///
    /// A no-op when the id is unknown: deletion is at-most-once, and a
    /// repeat of an already-applied removal is not an error.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` when the mutation cannot be recorded.
    pub async fn remove(
        &self,
        user_id: UserId,
        item_id: &LineItemId,
    ) -> Result<Vec<CartLineItem>, CartError> {
        let _user = self.store.lock_user(user_id).await;

        let item_id = item_id.clone();
        let cart = self
            .store
            .commit(move |s| {
                let cart = s.cart_mut(user_id);
                cart.retain(|line| line.id != item_id);
                cart.clone()
            })
            .await?;

        Ok(cart)
    }

    /// Set the quantity of an existing line item.
    ///
    /// # Errors
    ///
    /// Returns `CartError::InvalidQuantity` when `quantity` < 1,
    /// `CartError::ItemNotFound` when the id is not in this user's cart.
    pub async fn set_quantity(
        &self,
        user_id: UserId,
        item_id: &LineItemId,
        quantity: u32,
    ) -> Result<Vec<CartLineItem>, CartError> {
        if quantity < 1 {
            return Err(CartError::InvalidQuantity);
        }

        let _user = self.store.lock_user(user_id).await;

        // The existence check is safe outside the commit because the user
        // lock is held across both steps.
        let exists = self
            .store
            .read(|s| s.cart(user_id).iter().any(|line| &line.id == item_id))
            .await;
        if !exists {
            return Err(CartError::ItemNotFound);
        }

        let item_id = item_id.clone();
        let cart = self
            .store
            .commit(move |s| {
                let cart = s.cart_mut(user_id);
                if let Some(line) = cart.iter_mut().find(|line| line.id == item_id) {
                    line.quantity = quantity;
                }
                cart.clone()
            })
            .await?;

        Ok(cart)
    }

    /// Reset the cart to empty.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Store` when the mutation cannot be recorded.
    pub async fn clear(&self, user_id: UserId) -> Result<Vec<CartLineItem>, CartError> {
        let _user = self.store.lock_user(user_id).await;

        self.store
            .commit(move |s| {
                s.carts_by_user.insert(user_id, Vec::new());
            })
            .await?;

        Ok(Vec::new())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn open_store(dir: &tempfile::TempDir) -> Store {
        Store::open(dir.path().join("clothesline.json"), Duration::from_secs(5)).unwrap()
    }

    fn add_item(product_id: &str, size: &str, quantity: u32) -> AddItem {
        AddItem {
            product_id: product_id.to_owned(),
            product_name: "Linen Shirt".to_owned(),
            product_price: Decimal::new(2450, 2),
            product_image: "products/linen-shirt.png".to_owned(),
            quantity,
            size: size.to_owned(),
        }
    }

    #[tokio::test]
    async fn test_add_merges_on_product_and_size() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        carts.add(user, add_item("P1", "M", 2)).await.unwrap();
        let cart = carts.add(user, add_item("P1", "M", 3)).await.unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().unwrap().quantity, 5);
    }

    #[tokio::test]
    async fn test_add_keeps_sizes_separate() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        carts.add(user, add_item("P1", "M", 1)).await.unwrap();
        let cart = carts.add(user, add_item("P1", "L", 1)).await.unwrap();

        assert_eq!(cart.len(), 2);
        // Merge never reuses ids across rows.
        assert_ne!(cart.first().unwrap().id, cart.get(1).unwrap().id);
    }

    #[tokio::test]
    async fn test_merge_preserves_original_id_and_order() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        let first = carts.add(user, add_item("P1", "M", 1)).await.unwrap();
        carts.add(user, add_item("P2", "S", 1)).await.unwrap();
        let merged = carts.add(user, add_item("P1", "M", 4)).await.unwrap();

        let original_id = first.first().unwrap().id.clone();
        assert_eq!(merged.first().unwrap().id, original_id);
        assert_eq!(merged.first().unwrap().product_id, "P1");
        assert_eq!(merged.get(1).unwrap().product_id, "P2");
    }

    #[tokio::test]
    async fn test_add_validation() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        assert!(matches!(
            carts.add(user, add_item("P1", "M", 0)).await.unwrap_err(),
            CartError::InvalidQuantity
        ));
        assert!(matches!(
            carts.add(user, add_item("P1", " ", 1)).await.unwrap_err(),
            CartError::MissingField("size")
        ));

        let mut negative = add_item("P1", "M", 1);
        negative.product_price = Decimal::new(-1, 2);
        assert!(matches!(
            carts.add(user, negative).await.unwrap_err(),
            CartError::InvalidPrice
        ));

        assert!(carts.get(user).await.is_empty());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        carts.add(user, add_item("P1", "M", 2)).await.unwrap();
        let cart = carts
            .remove(user, &LineItemId::from("no-such-item"))
            .await
            .unwrap();

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().unwrap().quantity, 2);
    }

    #[tokio::test]
    async fn test_remove_by_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        let cart = carts.add(user, add_item("P1", "M", 2)).await.unwrap();
        let id = cart.first().unwrap().id.clone();

        let cart = carts.remove(user, &id).await.unwrap();
        assert!(cart.is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        let cart = carts.add(user, add_item("P1", "M", 2)).await.unwrap();
        let id = cart.first().unwrap().id.clone();

        let cart = carts.set_quantity(user, &id, 7).await.unwrap();
        assert_eq!(cart.first().unwrap().quantity, 7);

        assert!(matches!(
            carts.set_quantity(user, &id, 0).await.unwrap_err(),
            CartError::InvalidQuantity
        ));
        assert_eq!(carts.get(user).await.first().unwrap().quantity, 7);

        assert!(matches!(
            carts
                .set_quantity(user, &LineItemId::from("missing"), 3)
                .await
                .unwrap_err(),
            CartError::ItemNotFound
        ));
    }

    #[tokio::test]
    async fn test_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);
        let user = UserId::new(1);

        carts.add(user, add_item("P1", "M", 2)).await.unwrap();
        carts.add(user, add_item("P2", "S", 1)).await.unwrap();

        let cart = carts.clear(user).await.unwrap();
        assert!(cart.is_empty());
        assert!(carts.get(user).await.is_empty());
    }

    #[tokio::test]
    async fn test_carts_are_partitioned_per_user() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir);
        let carts = CartService::new(&store);

        carts.add(UserId::new(1), add_item("P1", "M", 1)).await.unwrap();
        carts.add(UserId::new(2), add_item("P9", "S", 4)).await.unwrap();

        assert_eq!(carts.get(UserId::new(1)).await.first().unwrap().product_id, "P1");
        assert_eq!(carts.get(UserId::new(2)).await.first().unwrap().product_id, "P9");
    }

    #[tokio::test]
    async fn test_concurrent_adds_for_one_user_lose_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(open_store(&dir));
        let user = UserId::new(1);

        let mut tasks = Vec::new();
        for _ in 0..8 {
            let store = std::sync::Arc::clone(&store);
            tasks.push(tokio::spawn(async move {
                CartService::new(&store)
                    .add(user, add_item("P1", "M", 1))
                    .await
                    .unwrap();
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let cart = CartService::new(&store).get(user).await;
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.first().unwrap().quantity, 8);
    }
}
