//! # Order Endpoints
//!
//! `POST /orders` runs the order workflow; the other endpoints work on stored
//! orders directly. PUT replaces an order as sent, without touching stock.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use tracing::info;

use bookstore_core::validation::validate_order;
use bookstore_core::{EntityId, NewOrder, Order};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Order>>> {
    let ctx = state.request_context();
    Ok(Json(state.stores.orders().list(&ctx).await?))
}

/// Creates an order.
///
/// ## Request
/// ```json
/// {"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 3}]}
/// ```
pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewOrder>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Order>)> {
    let Json(candidate) = body?;
    info!(
        customer_id = candidate.customer.id,
        lines = candidate.items.len(),
        "Order requested"
    );

    let ctx = state.request_context();
    let order = state.orders.create_order(&ctx, candidate).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<Json<Order>> {
    let Path(id) = id?;
    let ctx = state.request_context();
    Ok(Json(state.stores.orders().get(&ctx, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
    body: Result<Json<Order>, JsonRejection>,
) -> ApiResult<Json<Order>> {
    let Path(id) = id?;
    let Json(order) = body?;
    validate_order(&order)?;
    let ctx = state.request_context();
    Ok(Json(state.stores.orders().update(&ctx, id, order).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let ctx = state.request_context();
    state.stores.orders().delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
