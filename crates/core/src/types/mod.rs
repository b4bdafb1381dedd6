//! Core types for Clothesline.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod cart;
pub mod checkout;
pub mod email;
pub mod id;
pub mod order;
pub mod pricing;
pub mod status;

pub use cart::CartLineItem;
pub use checkout::SavedCheckout;
pub use email::{Email, EmailError};
pub use id::{LineItemId, OrderId, UserId};
pub use order::{BillingAddress, CardDetails, Order, ShippingAddress};
pub use pricing::{PricingBreakdown, PricingPolicy};
pub use status::{OrderStatus, PaymentMethod};
