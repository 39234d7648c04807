//! # HTTP Handlers
//!
//! axum handlers grouped by resource, plus the router that wires them.
//!
//! ## Route Table
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  /authors          GET list   POST create                              │
//! │  /authors/{id}     GET        PUT replace   DELETE                     │
//! │  /books            GET list / search (query params)   POST create      │
//! │  /books/{id}       GET        PUT replace   DELETE                     │
//! │  /books/{id}/stock POST restock {"quantity": n}                        │
//! │  /customers        GET list   POST create                              │
//! │  /customers/{id}   GET        PUT replace   DELETE                     │
//! │  /orders           GET list   POST ──► OrderService::create_order      │
//! │  /orders/{id}      GET        PUT replace   DELETE                     │
//! │  /sales/report     GET ?start=&end=                                    │
//! │  /sales/report/latest  GET report kept by the scheduler                │
//! │  /health           GET "OK"                                             │
//! │                                                                         │
//! │  Any other method on a known path  ──► 405 {"error": ...}              │
//! │  Unknown path                      ──► 404 {"error": ...}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Handlers extract with `Result<Extractor, Rejection>` so malformed JSON,
//! ids and query strings come back as JSON `400`s instead of axum's plain
//! text rejections.

pub mod authors;
pub mod books;
pub mod customers;
pub mod orders;
pub mod sales;

use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;

use crate::error::ApiError;
use crate::state::AppState;

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler).fallback(method_not_allowed))
        .route(
            "/authors",
            get(authors::list)
                .post(authors::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/authors/{id}",
            get(authors::get)
                .put(authors::update)
                .delete(authors::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/books",
            get(books::list).post(books::create).fallback(method_not_allowed),
        )
        .route(
            "/books/{id}",
            get(books::get)
                .put(books::update)
                .delete(books::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/books/{id}/stock",
            post(books::restock).fallback(method_not_allowed),
        )
        .route(
            "/customers",
            get(customers::list)
                .post(customers::create)
                .fallback(method_not_allowed),
        )
        .route(
            "/customers/{id}",
            get(customers::get)
                .put(customers::update)
                .delete(customers::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/orders",
            get(orders::list).post(orders::create).fallback(method_not_allowed),
        )
        .route(
            "/orders/{id}",
            get(orders::get)
                .put(orders::update)
                .delete(orders::delete)
                .fallback(method_not_allowed),
        )
        .route(
            "/sales/report",
            get(sales::report).fallback(method_not_allowed),
        )
        .route(
            "/sales/report/latest",
            get(sales::latest).fallback(method_not_allowed),
        )
        .fallback(route_not_found)
        .with_state(state)
}

/// Health check endpoint.
async fn health_handler() -> impl IntoResponse {
    "OK"
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed()
}

async fn route_not_found() -> ApiError {
    ApiError::not_found("route not found")
}
