//! Integration tests for Clothesline.
//!
//! # Running Tests
//!
//! ```bash
//! # Start the server with a throwaway data file
//! CLOTHESLINE_DATA_PATH=/tmp/clothesline-it.json \
//! CLOTHESLINE_TOKEN_SECRET=kX9mP2vQ7rT4wY6zB1nC8dF3gH5jL0sA \
//! cargo run -p clothesline-server
//!
//! # Run integration tests against it
//! cargo test -p clothesline-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Signup, login, profile, password change
//! - `cart_orders` - Cart mutations, checkout, order history
//!
//! Tests register throwaway users with random emails, so they can run
//! repeatedly against the same server instance.
