//! Cart line items.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::id::LineItemId;

/// One product+size combination and its quantity within a cart.
///
/// The merge identity of a line item is `(product_id, size)`: adding the same
/// product in the same size to a cart increments the existing quantity rather
/// than creating a second row. `id` exists only so callers can address the
/// row for removal and quantity updates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    /// Opaque stable id, generated once at creation.
    pub id: LineItemId,
    /// Catalog product id (owned by the catalog, opaque here).
    pub product_id: String,
    /// Product name at the time the item was added.
    pub product_name: String,
    /// Unit price at the time the item was added.
    pub product_price: Decimal,
    /// Image reference for display.
    pub product_image: String,
    /// Quantity, always >= 1.
    pub quantity: u32,
    /// Selected size, never blank.
    pub size: String,
}

impl CartLineItem {
    /// Whether this line item merges with an incoming `(product_id, size)`.
    #[must_use]
    pub fn matches(&self, product_id: &str, size: &str) -> bool {
        self.product_id == product_id && self.size == size
    }

    /// Price of the whole line: unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}
