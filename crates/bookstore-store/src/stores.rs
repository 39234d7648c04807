//! # Store Bundle
//!
//! [`Stores`] owns one repository per entity and hands out references to
//! them. It is what the API layer keeps in its shared state.
//!
//! ## Why a Bundle?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Stores (Clone = Arc clones, same tables)                              │
//! │                                                                         │
//! │    .authors()    ──► AuthorRepository                                  │
//! │    .books()      ──► BookRepository                                    │
//! │    .customers()  ──► CustomerRepository                                │
//! │    .orders()     ──► OrderRepository                                   │
//! │                                                                         │
//! │  Handlers take only the store they need; the order workflow takes      │
//! │  three of them.                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::info;

use crate::repository::author::AuthorRepository;
use crate::repository::book::BookRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::order::OrderRepository;

/// All in-memory stores of one process.
#[derive(Debug, Clone, Default)]
pub struct Stores {
    authors: AuthorRepository,
    books: BookRepository,
    customers: CustomerRepository,
    orders: OrderRepository,
}

impl Stores {
    /// Creates empty stores.
    pub fn new() -> Self {
        info!("Initializing in-memory stores");
        Stores::default()
    }

    pub fn authors(&self) -> &AuthorRepository {
        &self.authors
    }

    pub fn books(&self) -> &BookRepository {
        &self.books
    }

    pub fn customers(&self) -> &CustomerRepository {
        &self.customers
    }

    pub fn orders(&self) -> &OrderRepository {
        &self.orders
    }
}
