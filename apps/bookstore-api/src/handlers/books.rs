//! # Book Endpoints
//!
//! `GET /books` doubles as the search endpoint:
//!
//! ```text
//! GET /books                              all books
//! GET /books?genre=Fantasy&max_price=20   books matching every given filter
//!       title      exact title
//!       author_id  id of the embedded author
//!       genre      exact genre
//!       min_price  inclusive lower bound
//!       max_price  inclusive upper bound
//! ```
//!
//! `POST /books/{id}/stock` with `{"quantity": n}` puts copies back on the
//! shelf and returns the updated book.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use tracing::{debug, info};

use bookstore_core::{Book, BookQuery, EntityId, NewBook};

use crate::error::ApiResult;
use crate::state::AppState;

pub async fn list(
    State(state): State<AppState>,
    query: Result<Query<BookQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Book>>> {
    let Query(query) = query?;
    let ctx = state.request_context();

    let books = if query.is_empty() {
        state.stores.books().list(&ctx).await?
    } else {
        debug!(?query, "Searching books");
        state.stores.books().search(&ctx, &query).await?
    };
    Ok(Json(books))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Book>)> {
    let Json(new) = body?;
    let ctx = state.request_context();
    let book = state.stores.books().create(&ctx, new).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

pub async fn get(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<Json<Book>> {
    let Path(id) = id?;
    let ctx = state.request_context();
    Ok(Json(state.stores.books().get(&ctx, id).await?))
}

/// Full replace, stock included.
pub async fn update(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
    body: Result<Json<NewBook>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Path(id) = id?;
    let Json(new) = body?;
    let ctx = state.request_context();
    Ok(Json(state.stores.books().update(&ctx, id, new).await?))
}

/// Body of `POST /books/{id}/stock`.
#[derive(Debug, Deserialize)]
pub struct Restock {
    pub quantity: u32,
}

pub async fn restock(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
    body: Result<Json<Restock>, JsonRejection>,
) -> ApiResult<Json<Book>> {
    let Path(id) = id?;
    let Json(restock) = body?;
    let ctx = state.request_context();
    let book = state.stores.books().add_stock(&ctx, id, restock.quantity).await?;
    info!(id, added = restock.quantity, stock = book.stock, "Book restocked");
    Ok(Json(book))
}

pub async fn delete(
    State(state): State<AppState>,
    id: Result<Path<EntityId>, PathRejection>,
) -> ApiResult<StatusCode> {
    let Path(id) = id?;
    let ctx = state.request_context();
    state.stores.books().delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
