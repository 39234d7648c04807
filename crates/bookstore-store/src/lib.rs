//! # bookstore-store: In-Memory Stores for the Bookstore
//!
//! This crate keeps every entity of the bookstore in process memory and
//! exposes async repository handles that are safe to share between requests.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstore Data Flow                              │
//! │                                                                         │
//! │  axum handler (POST /orders)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderService (bookstore-api)                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                bookstore-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Stores     │    │  Repositories │    │RequestContext│  │   │
//! │  │   │  (stores.rs)  │    │               │    │ (context.rs) │  │   │
//! │  │   │               │    │ AuthorRepo    │    │              │  │   │
//! │  │   │ one handle    │◄───│ BookRepo      │    │ cancel token │  │   │
//! │  │   │ per entity    │    │ CustomerRepo  │    │ + deadline   │  │   │
//! │  │   │               │    │ OrderRepo     │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Arc<tokio::sync::RwLock<BTreeMap<id, entity>>>  (lost on restart)     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`stores`] - The bundle of all repositories
//! - [`context`] - Per-request cancellation and deadline
//! - [`error`] - Store error types
//! - [`repository`] - One repository per entity
//!
//! ## Usage
//!
//! ```rust
//! use bookstore_store::{RequestContext, Stores};
//!
//! let stores = Stores::new();
//! let ctx = RequestContext::new();
//! let _books = stores.books();
//! assert!(!ctx.is_cancelled());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod context;
pub mod error;
pub mod repository;
pub mod stores;

// =============================================================================
// Re-exports
// =============================================================================

pub use context::RequestContext;
pub use error::{StoreError, StoreResult};
pub use stores::Stores;

// Repository re-exports for convenience
pub use repository::author::AuthorRepository;
pub use repository::book::BookRepository;
pub use repository::customer::CustomerRepository;
pub use repository::order::OrderRepository;
