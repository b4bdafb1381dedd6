//! Clothesline Core - Shared domain types library.
//!
//! This crate provides the domain model shared by all Clothesline components:
//! - `server` - The storefront API service
//! - `cli` - Command-line tools for user and data-file management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no
//! persistence, no HTTP. The pricing calculator lives here because it is a
//! pure derivation over a cart snapshot; everything stateful (the cart store,
//! the order ledger, the persistence gateway) lives in the server crate.
//!
//! # Modules
//!
//! - [`types`] - Ids, emails, statuses, cart line items, orders, and pricing

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
