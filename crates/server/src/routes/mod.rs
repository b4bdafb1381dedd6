//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health                 - Health check
//!
//! # Auth
//! POST /api/signup                 - Register, returns a bearer token
//! POST /api/login                  - Login, returns a bearer token
//! GET  /api/profile                - Current user (bearer)
//! PUT  /api/profile                - Update display name (bearer)
//! POST /api/password               - Change password (bearer)
//!
//! # Cart (bearer)
//! GET  /api/cart                   - Get cart
//! POST /api/cart/add               - Add item (merges by product + size)
//! POST /api/cart/remove            - Remove item by id
//! POST /api/cart/update-quantity   - Set quantity of an item
//! POST /api/cart/clear             - Reset cart
//!
//! # Orders (bearer)
//! POST /api/orders                 - Place an order from the current cart
//! GET  /api/orders                 - Order history, newest first
//! GET  /api/orders/{id}            - One order, owner-scoped
//! GET  /api/checkout/saved         - Saved checkout preferences
//! ```
//!
//! Handlers validate payload shape at the boundary and delegate to the
//! services; no business logic lives here.

pub mod auth;
pub mod cart;
pub mod orders;

use axum::{
    Json, Router,
    routing::{get, post},
};
use serde_json::json;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(health))
        .route("/api/signup", post(auth::signup))
        .route("/api/login", post(auth::login))
        .route("/api/profile", get(auth::profile).put(auth::update_profile))
        .route("/api/password", post(auth::change_password))
        .route("/api/cart", get(cart::get_cart))
        .route("/api/cart/add", post(cart::add))
        .route("/api/cart/remove", post(cart::remove))
        .route("/api/cart/update-quantity", post(cart::update_quantity))
        .route("/api/cart/clear", post(cart::clear))
        .route("/api/orders", get(orders::list).post(orders::place))
        .route("/api/orders/{id}", get(orders::get_order))
        .route("/api/checkout/saved", get(orders::saved_checkout))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> Json<serde_json::Value> {
    Json(json!({ "message": "Server is running" }))
}
