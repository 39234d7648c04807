//! # Bookstore API
//!
//! REST server for the bookstore backend: CRUD over authors, books,
//! customers and orders, the order workflow, and sales reporting.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstore API Server                             │
//! │                                                                         │
//! │  Client ───► HTTP (8085) ───► handlers ───► services ───► stores       │
//! │                                   │             │                       │
//! │                                   │             ▼                       │
//! │                                   │      ReportScheduler                │
//! │                                   ▼        (background)                 │
//! │                          ApiError {"error": ...}                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-driven configuration
//! - [`error`] - HTTP error type and status mapping
//! - [`handlers`] - axum handlers and the router
//! - [`services`] - Order workflow and sales reporting
//! - [`state`] - Shared application state

pub mod config;
pub mod error;
pub mod handlers;
pub mod services;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use handlers::router;
pub use state::AppState;
