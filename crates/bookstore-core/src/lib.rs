//! # bookstore-core: Pure Domain Logic for the Bookstore
//!
//! This crate holds the entity definitions and business rules of the
//! bookstore backend as plain data and pure functions.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookstore Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 bookstore-api (axum handlers)                   │   │
//! │  │    /authors  /books  /customers  /orders  /sales/report         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │              bookstore-store (in-memory stores)                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookstore-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   error   │  │ validation│  │   │
//! │  │   │  Book     │  │   Money   │  │ CoreError │  │   rules   │  │   │
//! │  │   │  Order    │  │  (cents)  │  │           │  │           │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO LOCKS • NO NETWORK • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Entities (Author, Book, Customer, Order, ...)
//! - [`money`] - Money type with integer arithmetic
//! - [`error`] - Domain error types
//! - [`validation`] - Field and order validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bookstore_core::money::Money;
//!
//! let price = Money::from_cents(1000); // 10.00
//! let line_total = price.checked_mul_quantity(3);
//! assert_eq!(line_total, Some(Money::from_cents(3000)));
//! ```

pub mod error;
pub mod money;
pub mod types;
pub mod validation;

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

/// Status assigned to every order produced by the creation workflow.
pub const INITIAL_ORDER_STATUS: OrderStatus = OrderStatus::Pending;
