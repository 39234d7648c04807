//! Customer endpoints. `created_at` is set by the store and survives PUT.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bookstore_core::{Customer, EntityId, NewCustomer};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Customer>>> {
    let ctx = state.request_context();
    Ok(Json(state.stores.customers().list(&ctx).await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Customer>)> {
    let Json(new) = body?;
    let ctx = state.request_context();
    let customer = state.stores.customers().create(&ctx, new).await?;
    Ok((StatusCode::CREATED, Json(customer)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<Json<Customer>> {
    let Path(id) = id?;
    let ctx = state.request_context();
    Ok(Json(state.stores.customers().get(&ctx, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
    body: Result<Json<NewCustomer>, JsonRejection>,
) -> ApiResult<Json<Customer>> {
    let Path(id) = id?;
    let Json(new) = body?;
    let ctx = state.request_context();
    Ok(Json(state.stores.customers().update(&ctx, id, new).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let ctx = state.request_context();
    state.stores.customers().delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
