//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in the Bookstore API                      │
//! │                                                                         │
//! │  Client                      Rust Backend                               │
//! │  ──────                      ────────────                               │
//! │                                                                         │
//! │  POST /orders                                                           │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Handler                                                         │  │
//! │  │  Result<T, ApiError>                                             │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Bad JSON / id? ─── JsonRejection / PathRejection ──┐           │  │
//! │  │         │                                           │           │  │
//! │  │         ▼                                           ▼           │  │
//! │  │  Workflow error? ─── OrderError / StoreError ───── ApiError ───►│  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  ◄──── 4xx/5xx  {"error": "customer with ID 99 not found"}              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{error, warn};

use bookstore_core::ValidationError;
use bookstore_store::StoreError;

use crate::services::order_service::OrderError;
use crate::services::sales_service::SalesError;

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// Error returned from HTTP handlers.
///
/// ## Serialization
/// This is what the client receives when a request fails:
/// ```json
/// { "error": "book with ID 3 not found" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Error class, decides the status code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error classes of the HTTP API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Malformed body, id or timestamp, or failed validation (400)
    BadRequest,

    /// Missing entity or empty collection (404)
    NotFound,

    /// Route exists but not for this method (405)
    MethodNotAllowed,

    /// Unique field already taken (409)
    Conflict,

    /// Well-formed but not doable: not enough copies for an order line, or
    /// an amount that no longer fits in cents (422)
    Unprocessable,

    /// Request deadline passed or request cancelled (504)
    Cancelled,

    /// Anything else (500)
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            ErrorCode::BadRequest => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::Unprocessable => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::Cancelled => StatusCode::GATEWAY_TIMEOUT,
            ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Class of a store error.
    pub fn of_store_error(err: &StoreError) -> Self {
        match err {
            StoreError::NotFound { .. } | StoreError::Empty { .. } => ErrorCode::NotFound,
            StoreError::Duplicate { .. } => ErrorCode::Conflict,
            StoreError::InsufficientStock { .. } | StoreError::AmountOverflow { .. } => {
                ErrorCode::Unprocessable
            }
            StoreError::StockOverflow { .. } | StoreError::Validation(_) => ErrorCode::BadRequest,
            StoreError::Cancelled => ErrorCode::Cancelled,
        }
    }
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::BadRequest, message)
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::NotFound, message)
    }

    pub fn method_not_allowed() -> Self {
        ApiError::new(ErrorCode::MethodNotAllowed, "method not allowed")
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(status = status.as_u16(), error = %self.message, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.message, "Request rejected");
        }
        (
            status,
            Json(ErrorBody {
                error: &self.message,
            }),
        )
            .into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

// =============================================================================
// Conversions
// =============================================================================

/// Converts store errors to API errors.
impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        ApiError::new(ErrorCode::of_store_error(&err), err.to_string())
    }
}

/// Converts order workflow errors to API errors.
impl From<OrderError> for ApiError {
    fn from(err: OrderError) -> Self {
        let code = match &err {
            OrderError::Validation(_) => ErrorCode::BadRequest,
            OrderError::Customer { source, .. }
            | OrderError::Book { source, .. }
            | OrderError::Persist(source) => ErrorCode::of_store_error(source),
            OrderError::InsufficientStock { .. } | OrderError::TotalOverflow => {
                ErrorCode::Unprocessable
            }
            OrderError::Cancelled => ErrorCode::Cancelled,
            OrderError::TaskFailed(_) => ErrorCode::Internal,
        };
        ApiError::new(code, err.to_string())
    }
}

/// Converts sales reporting errors to API errors.
impl From<SalesError> for ApiError {
    fn from(err: SalesError) -> Self {
        match err {
            SalesError::Store(store) => ApiError::from(store),
            invalid @ SalesError::InvalidRange { .. } => ApiError::bad_request(invalid.to_string()),
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
