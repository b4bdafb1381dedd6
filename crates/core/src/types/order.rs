//! Orders and checkout addresses.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::cart::CartLineItem;
use super::id::{OrderId, UserId};
use super::status::{OrderStatus, PaymentMethod};

/// Shipping address collected at checkout.
///
/// First name, last name, street, state and zip are required; the apartment
/// number is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ShippingAddress {
    pub first_name: String,
    pub last_name: String,
    pub street_address: String,
    #[serde(default)]
    pub apt_number: Option<String>,
    pub state: String,
    pub zip: String,
}

impl ShippingAddress {
    /// Name of the first required field that is blank, if any.
    #[must_use]
    pub fn missing_field(&self) -> Option<&'static str> {
        if self.first_name.trim().is_empty() {
            Some("first name")
        } else if self.last_name.trim().is_empty() {
            Some("last name")
        } else if self.street_address.trim().is_empty() {
            Some("street address")
        } else if self.state.trim().is_empty() {
            Some("state")
        } else if self.zip.trim().is_empty() {
            Some("zip")
        } else {
            None
        }
    }
}

/// Billing address collected at checkout.
///
/// Callers that bill to the shipping address copy it over before placing the
/// order; the ledger does not treat the two specially.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BillingAddress {
    pub street_address: String,
    #[serde(default)]
    pub apt_number: Option<String>,
    pub state: String,
    pub zip: String,
}

impl From<&ShippingAddress> for BillingAddress {
    fn from(shipping: &ShippingAddress) -> Self {
        Self {
            street_address: shipping.street_address.clone(),
            apt_number: shipping.apt_number.clone(),
            state: shipping.state.clone(),
            zip: shipping.zip.clone(),
        }
    }
}

/// Card details, held only as a saved-checkout convenience.
///
/// Never validated against a payment processor and never attached to a
/// persisted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CardDetails {
    pub number: String,
    pub expiry: String,
    pub cvv: String,
}

impl CardDetails {
    /// Whether all card fields are filled in.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        !self.number.trim().is_empty()
            && !self.expiry.trim().is_empty()
            && !self.cvv.trim().is_empty()
    }
}

/// An immutable order record.
///
/// Everything here is a snapshot taken at placement time: the user's name and
/// email, the cart line items, and the computed pricing. Later changes to the
/// user, cart, or catalog never alter an existing order. Only `status` moves
/// after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub user_id: UserId,
    pub user_email: String,
    pub user_name: String,
    pub shipping_address: ShippingAddress,
    pub billing_address: BillingAddress,
    pub payment_method: PaymentMethod,
    pub items: Vec<CartLineItem>,
    pub subtotal: Decimal,
    pub shipping: Decimal,
    pub tax: Decimal,
    pub total: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
