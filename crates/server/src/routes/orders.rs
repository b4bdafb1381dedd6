//! Order route handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use clothesline_core::{
    BillingAddress, CardDetails, Order, OrderId, PaymentMethod, SavedCheckout, ShippingAddress,
};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::services::orders::{OrderService, PlaceOrder};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Order placement request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceOrderRequest {
    pub shipping_address: ShippingAddress,
    /// Defaults to the shipping address when absent.
    #[serde(default)]
    pub billing_address: Option<BillingAddress>,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub card_details: Option<CardDetails>,
    #[serde(default)]
    pub remember_address: bool,
    #[serde(default)]
    pub remember_card: bool,
}

/// Response carrying a placed order.
#[derive(Debug, Serialize)]
pub struct OrderResponse {
    pub message: String,
    pub order: Order,
}

/// Response carrying the order history.
#[derive(Debug, Serialize)]
pub struct OrdersResponse {
    pub orders: Vec<Order>,
}

/// Response carrying saved checkout preferences, if any.
#[derive(Debug, Serialize)]
pub struct SavedCheckoutResponse {
    pub saved: Option<SavedCheckout>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Place an order from the current cart.
pub async fn place(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(request): Json<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<OrderResponse>)> {
    let order = OrderService::new(state.store(), state.pricing())
        .place(
            current.id,
            PlaceOrder {
                shipping_address: request.shipping_address,
                billing_address: request.billing_address,
                payment_method: request.payment_method,
                card_details: request.card_details,
                remember_address: request.remember_address,
                remember_card: request.remember_card,
            },
        )
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(OrderResponse {
            message: "Order placed successfully".to_owned(),
            order,
        }),
    ))
}

/// The current user's order history, newest first.
pub async fn list(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Json<OrdersResponse> {
    let orders = OrderService::new(state.store(), state.pricing())
        .list(current.id)
        .await;
    Json(OrdersResponse { orders })
}

/// One order by id, scoped to the current user.
pub async fn get_order(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Path(id): Path<String>,
) -> Result<Json<Order>> {
    let order = OrderService::new(state.store(), state.pricing())
        .get(current.id, &OrderId::from(id))
        .await?;
    Ok(Json(order))
}

/// Saved checkout preferences for pre-filling the next checkout.
pub async fn saved_checkout(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Json<SavedCheckoutResponse> {
    let saved = OrderService::new(state.store(), state.pricing())
        .saved_checkout(current.id)
        .await;
    Json(SavedCheckoutResponse { saved })
}
