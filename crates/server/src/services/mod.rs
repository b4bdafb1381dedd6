//! Business services: identity, cart store, order ledger.

pub mod auth;
pub mod cart;
pub mod orders;
