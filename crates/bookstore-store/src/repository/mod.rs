//! # Repository Module
//!
//! In-memory store implementations, one per entity.
//!
//! ## Locking Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Lock Per Store                                   │
//! │                                                                         │
//! │   AuthorRepository    BookRepository    CustomerRepository   Order...   │
//! │   Arc<RwLock<Table>>  Arc<RwLock<..>>   Arc<RwLock<..>>      Arc<..>    │
//! │                                                                         │
//! │  • Every operation takes its lock once and holds it across the whole   │
//! │    read-check-write sequence (uniqueness check + insert, stock check + │
//! │    decrement). No intermediate release.                                │
//! │  • Stores never lock each other. Cross-store consistency belongs to    │
//! │    the order workflow in bookstore-api.                                │
//! │  • Handles are cheap clones sharing the same table.                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`AuthorRepository`](author::AuthorRepository)
//! - [`BookRepository`](book::BookRepository) - plus atomic stock changes and search
//! - [`CustomerRepository`](customer::CustomerRepository)
//! - [`OrderRepository`](order::OrderRepository) - plus time-range queries

pub mod author;
pub mod book;
pub mod customer;
pub mod order;

mod table;
