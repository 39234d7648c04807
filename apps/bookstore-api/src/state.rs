//! # Application State
//!
//! Everything a handler may need, built once at startup and cloned into
//! each request by axum.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AppState (Clone)                                                       │
//! │                                                                         │
//! │   stores ────────► Stores { authors, books, customers, orders }        │
//! │   orders ────────► OrderService  (shares the same Stores)              │
//! │   sales  ────────► SalesService  (shares the same Stores)              │
//! │   config ────────► Arc<ApiConfig> (read-only after startup)            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use bookstore_store::{RequestContext, Stores};

use crate::config::ApiConfig;
use crate::services::{OrderService, SalesService};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub stores: Stores,
    pub orders: OrderService,
    pub sales: SalesService,
    pub config: Arc<ApiConfig>,
}

impl AppState {
    /// Creates empty stores and the services on top of them.
    pub fn new(config: ApiConfig) -> Self {
        let stores = Stores::new();
        AppState {
            orders: OrderService::new(stores.clone()),
            sales: SalesService::new(stores.clone(), config.report_window()),
            stores,
            config: Arc::new(config),
        }
    }

    /// A fresh context carrying the per-request timeout.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::with_timeout(self.config.request_timeout())
    }
}
