//! Author endpoints.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use bookstore_core::{Author, EntityId, NewAuthor};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(State(state): State<AppState>) -> ApiResult<Json<Vec<Author>>> {
    let ctx = state.request_context();
    Ok(Json(state.stores.authors().list(&ctx).await?))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewAuthor>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Author>)> {
    let Json(new) = body?;
    let ctx = state.request_context();
    let author = state.stores.authors().create(&ctx, new).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<Json<Author>> {
    let Path(id) = id?;
    let ctx = state.request_context();
    Ok(Json(state.stores.authors().get(&ctx, id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
    body: Result<Json<NewAuthor>, JsonRejection>,
) -> ApiResult<Json<Author>> {
    let Path(id) = id?;
    let Json(new) = body?;
    let ctx = state.request_context();
    Ok(Json(state.stores.authors().update(&ctx, id, new).await?))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let ctx = state.request_context();
    state.stores.authors().delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
