//! End-to-end tests driving the router in-process.

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use std::time::Duration;

use bookstore_api::services::ReportScheduler;
use bookstore_api::{router, ApiConfig, AppState};

// =============================================================================
// Helpers
// =============================================================================

fn app() -> Router {
    router(AppState::new(ApiConfig::default()))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, json)
}

async fn send_raw(app: &Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn seed_book(app: &Router, title: &str, price: f64, stock: u32) -> Value {
    let (status, book) = send(
        app,
        Method::POST,
        "/books",
        Some(json!({
            "title": title,
            "author": {"first_name": "Frank", "last_name": "Herbert"},
            "genre": "Science Fiction",
            "published_at": "1965-08-01T00:00:00Z",
            "price": price,
            "stock": stock
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    book
}

async fn seed_customer(app: &Router, name: &str) -> Value {
    let (status, customer) = send(
        app,
        Method::POST,
        "/customers",
        Some(json!({
            "name": name,
            "email": "ada@example.com",
            "address": {"street": "1 Main St", "city": "London", "state": "", "postal_code": "N1", "country": "UK"}
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    customer
}

// =============================================================================
// CRUD
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("OK".to_string()));
}

#[tokio::test]
async fn test_author_crud_cycle() {
    let app = app();
    let author = json!({"first_name": "Mary", "last_name": "Shelley", "bio": "Novelist"});

    let (status, created) = send(&app, Method::POST, "/authors", Some(author.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);

    let (status, fetched) = send(&app, Method::GET, "/authors/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, body) = send(&app, Method::POST, "/authors", Some(author)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].is_string());

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/authors/1",
        Some(json!({"first_name": "Mary", "last_name": "Shelley", "bio": "Wrote Frankenstein"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["bio"], "Wrote Frankenstein");

    let (status, body) = send(&app, Method::DELETE, "/authors/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, Method::GET, "/authors/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_empty_collection_is_not_found() {
    let app = app();
    for path in ["/authors", "/books", "/customers", "/orders"] {
        let (status, body) = send(&app, Method::GET, path, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", path);
        assert!(body["error"].as_str().unwrap().starts_with("no "));
    }
}

#[tokio::test]
async fn test_get_is_idempotent() {
    let app = app();
    let created = seed_book(&app, "Dune", 10.0, 5).await;

    let (_, first) = send(&app, Method::GET, "/books/1", None).await;
    let (_, second) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(first, created);
    assert_eq!(first, second);
    assert_eq!(first["price"], 10.0);
}

#[tokio::test]
async fn test_book_search() {
    let app = app();
    seed_book(&app, "Dune", 10.0, 5).await;
    seed_book(&app, "Dune Messiah", 25.5, 5).await;

    let (status, found) = send(&app, Method::GET, "/books?max_price=20", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["title"], "Dune");

    let (status, _) = send(&app, Method::GET, "/books?genre=Romance", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/books?min_price=cheap", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_customer_update_keeps_created_at() {
    let app = app();
    let created = seed_customer(&app, "Ada").await;

    let (status, updated) = send(
        &app,
        Method::PUT,
        "/customers/1",
        Some(json!({"name": "Ada", "email": "lovelace@example.com"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["email"], "lovelace@example.com");
    assert_eq!(updated["created_at"], created["created_at"]);
}

// =============================================================================
// Request Errors
// =============================================================================

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/books/abc", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let app = app();
    let (status, body) = send_raw(&app, Method::POST, "/books", "{\"title\": ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Dune", "price": 10.0, "stock": -1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_method_is_json_405() {
    let app = app();
    let (status, body) = send(&app, Method::PATCH, "/books/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(body["error"], "method not allowed");

    let (status, _) = send(&app, Method::DELETE, "/books", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/publishers", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].is_string());
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn test_order_happy_path() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;

    let (status, order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 3}]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(order["id"], 1);
    assert_eq!(order["total_price"], 30.0);
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["customer"]["name"], "Ada");
    assert_eq!(order["items"][0]["book"]["stock"], 2);

    let (_, book) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["stock"], 2);

    let (status, fetched) = send(&app, Method::GET, "/orders/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, order);
}

#[tokio::test]
async fn test_order_insufficient_stock() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 2).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 5}]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("insufficient stock for book with ID 1"));

    let (_, book) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["stock"], 2);
}

#[tokio::test]
async fn test_order_unknown_customer() {
    let app = app();
    seed_book(&app, "Dune", 10.0, 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 99}, "items": [{"book": {"id": 1}, "quantity": 1}]})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("99"));

    let (_, book) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["stock"], 5);
}

#[tokio::test]
async fn test_order_partial_failure_keeps_earlier_decrement() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({
            "customer": {"id": 1},
            "items": [{"book": {"id": 1}, "quantity": 2}, {"book": {"id": 7}, "quantity": 1}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, book) = send(&app, Method::GET, "/books/1", None).await;
    assert_eq!(book["stock"], 3);
    let (status, _) = send(&app, Method::GET, "/orders", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_without_items_is_bad_request() {
    let app = app();
    seed_customer(&app, "Ada").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": []})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_order_update_and_delete() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;
    let (_, mut order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 1}]})),
    )
    .await;

    order["status"] = json!("Shipped");
    let (status, updated) = send(&app, Method::PUT, "/orders/1", Some(order)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Shipped");
    assert_eq!(updated["id"], 1);

    let (status, _) = send(&app, Method::DELETE, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::DELETE, "/orders/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_update_rejects_negative_total() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;
    let (_, mut order) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 1}]})),
    )
    .await;

    order["total_price"] = json!(-1.0);
    let (status, body) = send(&app, Method::PUT, "/orders/1", Some(order)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "total_price must not be negative");
}

#[tokio::test]
async fn test_huge_price_is_rejected() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/books",
        Some(json!({"title": "Big", "price": 5.0e16, "stock": 10})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "price must not exceed 10000000.00");

    let (status, _) = send(&app, Method::GET, "/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_order_total_overflow_is_unprocessable() {
    let app = app();
    seed_customer(&app, "Ada").await;
    for title in ["Big", "Bigger", "Biggest"] {
        seed_book(&app, title, 10_000_000.0, u32::MAX).await;
    }

    let line = |id: u64| json!({"book": {"id": id}, "quantity": u32::MAX});
    let (status, body) = send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [line(1), line(2), line(3)]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"],
        "order total exceeds the largest representable amount"
    );

    // reserved lines stay reserved, nothing is stored
    let (_, book) = send(&app, Method::GET, "/books/3", None).await;
    assert_eq!(book["stock"], 0);
    let (status, _) = send(&app, Method::GET, "/orders", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Restock
// =============================================================================

#[tokio::test]
async fn test_restock() {
    let app = app();
    seed_book(&app, "Dune", 10.0, 5).await;

    let (status, book) = send(
        &app,
        Method::POST,
        "/books/1/stock",
        Some(json!({"quantity": 4})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(book["stock"], 9);

    let (status, _) = send(
        &app,
        Method::POST,
        "/books/1/stock",
        Some(json!({"quantity": 0})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::POST,
        "/books/8/stock",
        Some(json!({"quantity": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/books/1/stock", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

// =============================================================================
// Sales Report
// =============================================================================

#[tokio::test]
async fn test_sales_report() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;
    send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 3}]})),
    )
    .await;

    let (status, report) = send(
        &app,
        Method::GET,
        "/sales/report?start=2000-01-01T00:00:00Z&end=2100-01-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_orders"], 1);
    assert_eq!(report["total_revenue"], 30.0);
    assert_eq!(report["top_selling_books"][0]["quantity_sold"], 3);
    assert_eq!(report["top_selling_books"][0]["book"]["title"], "Dune");

    let (status, report) = send(
        &app,
        Method::GET,
        "/sales/report?start=2000-01-01T00:00:00Z&end=2000-01-02T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_orders"], 0);
    assert_eq!(report["total_revenue"], 0.0);
}

#[tokio::test]
async fn test_sales_report_bad_bounds() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/sales/report?start=yesterday&end=today", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("start"));

    let (status, _) = send(
        &app,
        Method::GET,
        "/sales/report?start=2024-01-02T00:00:00Z&end=2024-01-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, report) = send(&app, Method::GET, "/sales/report", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["total_orders"], 0);
}

#[tokio::test]
async fn test_sales_report_blank_bounds_use_trailing_window() {
    let app = app();
    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;
    send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 2}]})),
    )
    .await;

    for uri in ["/sales/report?start=&end=", "/sales/report?start=%20&end="] {
        let (status, report) = send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert_eq!(report["total_orders"], 1);
        assert_eq!(report["total_revenue"], 20.0);
    }
}

#[tokio::test]
async fn test_latest_scheduled_report() {
    let state = AppState::new(ApiConfig::default());
    let app = router(state.clone());

    let (status, body) = send(&app, Method::GET, "/sales/report/latest", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "no scheduled sales report yet");

    seed_customer(&app, "Ada").await;
    seed_book(&app, "Dune", 10.0, 5).await;
    send(
        &app,
        Method::POST,
        "/orders",
        Some(json!({"customer": {"id": 1}, "items": [{"book": {"id": 1}, "quantity": 3}]})),
    )
    .await;

    let scheduler = ReportScheduler::new(
        state.sales.clone(),
        Duration::from_secs(3600),
        Duration::from_secs(5),
    )
    .start();

    let mut latest = None;
    for _ in 0..100 {
        let (status, report) = send(&app, Method::GET, "/sales/report/latest", None).await;
        if status == StatusCode::OK {
            latest = Some(report);
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    let report = latest.expect("scheduler never published a report");
    assert_eq!(report["total_orders"], 1);
    assert_eq!(report["total_revenue"], 30.0);

    scheduler.shutdown().await;
}
