//! Order ledger.
//!
//! Converts a priced cart into an immutable order record, appends it to the
//! owner's history, and clears the cart - all in one durable commit. Orders
//! snapshot the user, the items, and the computed totals at placement time;
//! later changes to the cart or catalog never reach back into them.

use chrono::Utc;
use thiserror::Error;

use clothesline_core::{
    BillingAddress, CardDetails, Order, OrderId, OrderStatus, PaymentMethod, PricingPolicy,
    SavedCheckout, ShippingAddress, UserId,
};

use crate::store::{Store, StoreError};

/// Errors that can occur during order operations.
#[derive(Debug, Error)]
pub enum OrderError {
    /// Shipping address is missing a required field.
    #[error("shipping address {0} is required")]
    MissingAddressField(&'static str),

    /// Payment method is card but card details are incomplete.
    #[error("card number, expiry, and cvv are required")]
    IncompleteCard,

    /// Cannot order an empty cart.
    #[error("cannot place an order with an empty cart")]
    EmptyCart,

    /// The user id does not resolve to a known user.
    #[error("unknown user")]
    UnknownUser,

    /// No matching order in this user's history.
    #[error("order not found")]
    NotFound,

    /// Persistence error.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Input for [`OrderService::place`].
#[derive(Debug, Clone)]
pub struct PlaceOrder {
    pub shipping_address: ShippingAddress,
    /// Billing address; derived from the shipping address when absent.
    pub billing_address: Option<BillingAddress>,
    pub payment_method: PaymentMethod,
    /// Required when `payment_method` is card.
    pub card_details: Option<CardDetails>,
    /// Remember the addresses for future checkouts.
    pub remember_address: bool,
    /// Remember the card details for future checkouts.
    pub remember_card: bool,
}

/// Order ledger service.
pub struct OrderService<'a> {
    store: &'a Store,
    pricing: PricingPolicy,
}

impl<'a> OrderService<'a> {
    /// Create a new order service over the store.
    #[must_use]
    pub const fn new(store: &'a Store, pricing: PricingPolicy) -> Self {
        Self { store, pricing }
    }

    /// Place an order from the user's current cart.
    ///
    /// Appending the order, clearing the cart, and updating the saved
    /// checkout preferences happen in one durable commit: if the save fails,
    /// the cart is untouched and no order exists.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::MissingAddressField`, `OrderError::IncompleteCard`,
    /// or `OrderError::EmptyCart` on invalid input; `OrderError::UnknownUser`
    /// when the user id resolves to nobody.
    pub async fn place(&self, user_id: UserId, request: PlaceOrder) -> Result<Order, OrderError> {
        if let Some(field) = request.shipping_address.missing_field() {
            return Err(OrderError::MissingAddressField(field));
        }
        if request.payment_method.requires_card()
            && !request.card_details.as_ref().is_some_and(CardDetails::is_complete)
        {
            return Err(OrderError::IncompleteCard);
        }

        // Serialize against other mutations of this user's cart so the
        // snapshot we price is the snapshot we persist.
        let _user = self.store.lock_user(user_id).await;

        let user = self
            .store
            .read(|s| s.user(user_id).cloned())
            .await
            .ok_or(OrderError::UnknownUser)?;

        let items = self.store.read(|s| s.cart(user_id).to_vec()).await;
        if items.is_empty() {
            return Err(OrderError::EmptyCart);
        }

        let breakdown = self.pricing.compute(&items);
        let order = Order {
            id: OrderId::generate(),
            user_id,
            user_email: user.email.as_str().to_owned(),
            user_name: user.name.clone(),
            shipping_address: request.shipping_address.clone(),
            billing_address: request
                .billing_address
                .clone()
                .unwrap_or_else(|| BillingAddress::from(&request.shipping_address)),
            payment_method: request.payment_method,
            items,
            subtotal: breakdown.subtotal,
            shipping: breakdown.shipping,
            tax: breakdown.tax,
            total: breakdown.total,
            status: OrderStatus::Pending,
            created_at: Utc::now(),
        };

        let placed = order.clone();
        self.store
            .commit(move |s| {
                s.orders_mut(user_id).insert(0, order);
                s.carts_by_user.insert(user_id, Vec::new());

                let saved = s.saved_checkout_by_user.entry(user_id).or_default();
                saved.payment_method = request.payment_method;
                if request.remember_address {
                    saved.shipping_address = request.shipping_address.clone();
                    saved.billing_address = request
                        .billing_address
                        .unwrap_or_else(|| BillingAddress::from(&request.shipping_address));
                }
                if request.remember_card
                    && request.payment_method.requires_card()
                    && let Some(card) = request.card_details
                {
                    saved.card_details = card;
                }
            })
            .await?;

        tracing::info!(user_id = %user_id, order_id = %placed.id, total = %placed.total, "order placed");
        Ok(placed)
    }

    /// List a user's orders, newest first.
    pub async fn list(&self, user_id: UserId) -> Vec<Order> {
        self.store.read(|s| s.orders(user_id).to_vec()).await
    }

    /// Get one of the user's orders by id.
    ///
    /// Orders are only addressable within their owner's scope; another
    /// user's order id is simply not found.
    ///
    /// # Errors
    ///
    /// Returns `OrderError::NotFound` when no matching order exists.
    pub async fn get(&self, user_id: UserId, order_id: &OrderId) -> Result<Order, OrderError> {
        self.store
            .read(|s| {
                s.orders(user_id)
                    .iter()
                    .find(|order| &order.id == order_id)
                    .cloned()
            })
            .await
            .ok_or(OrderError::NotFound)
    }

    /// The user's saved checkout preferences, if any.
    pub async fn saved_checkout(&self, user_id: UserId) -> Option<SavedCheckout> {
        self.store
            .read(|s| s.saved_checkout_by_user.get(&user_id).cloned())
            .await
    }
}
