//! REST API handlers for shopping cart operations
//!
//! This module implements HTTP endpoints for the cart of the requesting
//! session. Stock is checked here, before the store is touched.

use super::{helpers::format_item_summary, models::*, store::CartStore};
use crate::{error::ApiError, session::Session, state::SharedState};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{delete, get, patch},
    Json, Router,
};
use tracing::info;

/// Creates routes for cart-related operations
pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/cart", get(get_cart).delete(clear_cart))
        .route("/cart/items", delete(remove_item).post(add_item))
        .route("/cart/items/quantity", patch(update_quantity))
        .route("/cart/items/duration", patch(update_duration))
}

fn cart_view(session_id: &str, store: &CartStore) -> CartView {
    let items = store.items().to_vec();
    CartView {
        session_id: session_id.to_string(),
        item_count: items.iter().map(|i| u64::from(i.quantity)).sum(),
        total: store.cart_total(),
        items,
    }
}

fn ensure_available(tool_id: &str, stock: u32, requested: u64) -> Result<(), ApiError> {
    if stock == 0 {
        return Err(ApiError::OutOfStock {
            tool_id: tool_id.to_string(),
        });
    }
    if requested > u64::from(stock) {
        return Err(ApiError::InsufficientStock {
            tool_id: tool_id.to_string(),
            requested,
            available: stock,
        });
    }
    Ok(())
}

/// Endpoint: GET /cart
/// Returns the line items and total of the session's cart.
async fn get_cart(State(state): State<SharedState>, session: Session) -> impl IntoResponse {
    let view = state.read_store(session.id(), |store| cart_view(session.id(), store));
    (session, Json(view))
}

/// Endpoint: POST /cart/items
/// Adds units of a catalog tool, merging with an identical line.
async fn add_item(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<AddToCartInput>,
) -> Result<impl IntoResponse, ApiError> {
    if payload.quantity == 0 {
        return Err(ApiError::InvalidQuantity);
    }
    let tool = state
        .catalog
        .lookup(&payload.tool_id)
        .ok_or_else(|| ApiError::ToolNotFound(payload.tool_id.clone()))?;

    let view = {
        let mut store = state.store(session.id());
        let requested = store
            .quantity_of(&tool.id)
            .saturating_add(u64::from(payload.quantity));
        ensure_available(&tool.id, tool.stock, requested)?;

        store.add_to_cart(
            tool,
            payload.purchase_type,
            payload.quantity,
            payload.rental_duration,
        );
        info!(
            session_id = session.id(),
            cart = %format_item_summary(store.items()),
            "added to cart"
        );
        cart_view(session.id(), &store)
    };

    Ok((session, Json(view)))
}

/// Endpoint: DELETE /cart/items
async fn remove_item(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<RemoveItemInput>,
) -> impl IntoResponse {
    let view = {
        let mut store = state.store(session.id());
        store.remove_from_cart(
            &payload.tool_id,
            payload.purchase_type,
            payload.rental_duration,
        );
        cart_view(session.id(), &store)
    };
    (session, Json(view))
}

/// Endpoint: PATCH /cart/items/quantity
/// Sets the quantity of a line; quantities below 1 remove it.
async fn update_quantity(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<UpdateQuantityInput>,
) -> Result<impl IntoResponse, ApiError> {
    let view = {
        let mut store = state.store(session.id());

        if payload.quantity >= 1 {
            if let Some(tool) = state.catalog.lookup(&payload.tool_id) {
                let key = LineKey::new(
                    &payload.tool_id,
                    payload.purchase_type,
                    payload.rental_duration.clone(),
                );
                let in_other_lines: u64 = store
                    .items()
                    .iter()
                    .filter(|i| i.tool.id == tool.id && !i.matches(&key))
                    .map(|i| u64::from(i.quantity))
                    .sum();
                let requested = in_other_lines.saturating_add(payload.quantity.unsigned_abs());
                ensure_available(&tool.id, tool.stock, requested)?;
            }
        }

        store.update_item_quantity(
            &payload.tool_id,
            payload.purchase_type,
            payload.rental_duration,
            payload.quantity,
        );
        cart_view(session.id(), &store)
    };

    Ok((session, Json(view)))
}

/// Endpoint: PATCH /cart/items/duration
/// Changes the rental duration of every rent line of a tool.
async fn update_duration(
    State(state): State<SharedState>,
    session: Session,
    Json(payload): Json<UpdateDurationInput>,
) -> impl IntoResponse {
    let view = {
        let mut store = state.store(session.id());
        store.update_item_duration(&payload.tool_id, payload.rental_duration);
        cart_view(session.id(), &store)
    };
    (session, Json(view))
}

/// Endpoint: DELETE /cart
async fn clear_cart(State(state): State<SharedState>, session: Session) -> impl IntoResponse {
    let view = {
        let mut store = state.store(session.id());
        if !store.is_empty() {
            info!(
                session_id = session.id(),
                cart = %format_item_summary(store.items()),
                "clearing cart"
            );
        }
        store.clear_cart();
        cart_view(session.id(), &store)
    };
    (session, Json(view))
}
