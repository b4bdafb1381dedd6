//! Cart route handlers.
//!
//! Every route is keyed by the authenticated user; the handlers pass the
//! resolved user id straight into the cart service.

use axum::{Json, extract::State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use clothesline_core::{CartLineItem, LineItemId};

use crate::error::Result;
use crate::middleware::RequireUser;
use crate::services::cart::{AddItem, CartService};
use crate::state::AppState;

// =============================================================================
// Request / Response Types
// =============================================================================

/// Add-to-cart request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: String,
    pub product_name: String,
    pub product_price: Decimal,
    #[serde(default)]
    pub product_image: String,
    pub quantity: u32,
    pub size: String,
}

/// Remove-from-cart request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoveFromCartRequest {
    pub item_id: LineItemId,
}

/// Quantity update request payload.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateQuantityRequest {
    pub item_id: LineItemId,
    pub quantity: u32,
}

/// Response carrying the cart after an operation.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub message: String,
    pub cart: Vec<CartLineItem>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Get the current user's cart.
pub async fn get_cart(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Json<serde_json::Value> {
    let cart = CartService::new(state.store()).get(current.id).await;
    Json(serde_json::json!({ "cart": cart }))
}

/// Add an item to the cart, merging by `(productId, size)`.
pub async fn add(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(request): Json<AddToCartRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store())
        .add(
            current.id,
            AddItem {
                product_id: request.product_id,
                product_name: request.product_name,
                product_price: request.product_price,
                product_image: request.product_image,
                quantity: request.quantity,
                size: request.size,
            },
        )
        .await?;

    Ok(Json(CartResponse {
        message: "Item added to cart".to_owned(),
        cart,
    }))
}

/// Remove an item by id; unknown ids are a no-op.
pub async fn remove(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(request): Json<RemoveFromCartRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store())
        .remove(current.id, &request.item_id)
        .await?;

    Ok(Json(CartResponse {
        message: "Item removed".to_owned(),
        cart,
    }))
}

/// Set the quantity of an existing item.
pub async fn update_quantity(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
    Json(request): Json<UpdateQuantityRequest>,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store())
        .set_quantity(current.id, &request.item_id, request.quantity)
        .await?;

    Ok(Json(CartResponse {
        message: "Quantity updated".to_owned(),
        cart,
    }))
}

/// Reset the cart to empty.
pub async fn clear(
    State(state): State<AppState>,
    RequireUser(current): RequireUser,
) -> Result<Json<CartResponse>> {
    let cart = CartService::new(state.store()).clear(current.id).await?;

    Ok(Json(CartResponse {
        message: "Cart cleared".to_owned(),
        cart,
    }))
}
