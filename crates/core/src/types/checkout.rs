//! Saved checkout preferences.

use serde::{Deserialize, Serialize};

use super::order::{BillingAddress, CardDetails, ShippingAddress};
use super::status::PaymentMethod;

/// Per-user last-used checkout values, kept only to pre-fill future
/// checkouts. Never consulted for pricing or order validity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct SavedCheckout {
    pub shipping_address: ShippingAddress,
    pub billing_address: BillingAddress,
    pub payment_method: PaymentMethod,
    pub card_details: CardDetails,
}
