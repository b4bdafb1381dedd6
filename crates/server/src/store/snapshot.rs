//! The durable snapshot: everything Clothesline persists, in one document.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use clothesline_core::{CartLineItem, Email, Order, SavedCheckout, UserId};

use crate::models::User;

/// Full persisted state of the service.
///
/// One JSON document: a global users table plus per-user partitions for
/// carts, order history, and saved checkout preferences. Unknown or missing
/// sections deserialize to their defaults so partially written or older
/// files degrade instead of failing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StoreSnapshot {
    /// Global users table; emails are unique on their normalized form.
    pub users: Vec<User>,
    /// Per-user ordered cart line items.
    pub carts_by_user: HashMap<UserId, Vec<CartLineItem>>,
    /// Per-user order history, newest first.
    pub orders_by_user: HashMap<UserId, Vec<Order>>,
    /// Per-user last-used checkout preferences.
    pub saved_checkout_by_user: HashMap<UserId, SavedCheckout>,
}

impl StoreSnapshot {
    /// Look up a user by id.
    #[must_use]
    pub fn user(&self, id: UserId) -> Option<&User> {
        self.users.iter().find(|u| u.id == id)
    }

    /// Look up a user by id, mutably.
    pub fn user_mut(&mut self, id: UserId) -> Option<&mut User> {
        self.users.iter_mut().find(|u| u.id == id)
    }

    /// Look up a user by normalized email.
    #[must_use]
    pub fn user_by_email(&self, email: &Email) -> Option<&User> {
        self.users.iter().find(|u| &u.email == email)
    }

    /// The id the next registered user receives.
    #[must_use]
    pub fn next_user_id(&self) -> UserId {
        let max = self.users.iter().map(|u| u.id.as_i64()).max().unwrap_or(0);
        UserId::new(max + 1)
    }

    /// A user's cart; empty slice when they have none yet.
    #[must_use]
    pub fn cart(&self, user_id: UserId) -> &[CartLineItem] {
        self.carts_by_user.get(&user_id).map_or(&[], Vec::as_slice)
    }

    /// A user's cart for mutation, created empty on first touch.
    pub fn cart_mut(&mut self, user_id: UserId) -> &mut Vec<CartLineItem> {
        self.carts_by_user.entry(user_id).or_default()
    }

    /// A user's order history, newest first; empty slice when none.
    #[must_use]
    pub fn orders(&self, user_id: UserId) -> &[Order] {
        self.orders_by_user.get(&user_id).map_or(&[], Vec::as_slice)
    }

    /// A user's order history for mutation.
    pub fn orders_mut(&mut self, user_id: UserId) -> &mut Vec<Order> {
        self.orders_by_user.entry(user_id).or_default()
    }
}
