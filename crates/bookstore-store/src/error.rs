//! # Store Error Types
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  CoreError (domain rule, e.g. InsufficientStock)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← Adds entity/id context                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  OrderError / ApiError (bookstore-api) ← Mapped to HTTP status         │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use bookstore_core::{CoreError, EntityId, ValidationError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No record with this id.
    #[error("{entity} with ID {id} not found")]
    NotFound { entity: &'static str, id: EntityId },

    /// Listing or search produced no records.
    ///
    /// Callers treat this as "no content", not as a failure of the store.
    #[error("no {collection} found")]
    Empty { collection: &'static str },

    /// Unique field collision on create.
    #[error("{entity} with {field} {value} already exists")]
    Duplicate {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Stock check failed inside the atomic decrement.
    #[error("insufficient stock for book with ID {book_id} (available={available}, requested={requested})")]
    InsufficientStock {
        book_id: EntityId,
        available: u32,
        requested: u32,
    },

    /// Restock would overflow the counter.
    #[error("stock overflow for book with ID {book_id}")]
    StockOverflow { book_id: EntityId },

    /// A monetary sum over stored records left the representable range.
    #[error("{what} exceeds the largest representable amount")]
    AmountOverflow { what: &'static str },

    /// The request context fired (deadline exceeded or caller went away).
    #[error("operation cancelled")]
    Cancelled,

    /// Input rejected by a domain validator.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: &'static str, id: EntityId) -> Self {
        StoreError::NotFound { entity, id }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(entity: &'static str, field: &'static str, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            entity,
            field,
            value: value.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. } | StoreError::Empty { .. })
    }
}

impl From<CoreError> for StoreError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock {
                book_id,
                available,
                requested,
            } => StoreError::InsufficientStock {
                book_id,
                available,
                requested,
            },
            CoreError::StockOverflow { book_id } => StoreError::StockOverflow { book_id },
            CoreError::AmountOverflow { what } => StoreError::AmountOverflow { what },
            CoreError::Validation(e) => StoreError::Validation(e),
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
