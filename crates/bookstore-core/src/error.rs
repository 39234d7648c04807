//! # Error Types
//!
//! Domain-specific error types for bookstore-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookstore-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bookstore-store errors                                                │
//! │  └── StoreError       - NotFound / Duplicate / Cancelled ...           │
//! │                                                                         │
//! │  bookstore-api errors                                                  │
//! │  ├── OrderError       - Workflow failures with context                 │
//! │  └── ApiError         - What HTTP clients see                          │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → ApiError → Client    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Requested quantity exceeds the stock on hand.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /orders { book: 1, quantity: 5 }
    ///      │
    ///      ▼
    /// Check stock: available=2
    ///      │
    ///      ▼
    /// InsufficientStock { book_id: 1, available: 2, requested: 5 }
    /// ```
    #[error("insufficient stock for book with ID {book_id} (available={available}, requested={requested})")]
    InsufficientStock {
        book_id: u64,
        available: u32,
        requested: u32,
    },

    /// Restocking would overflow the stock counter.
    #[error("stock overflow for book with ID {book_id}")]
    StockOverflow { book_id: u64 },

    /// A monetary sum left the representable range.
    #[error("{what} exceeds the largest representable amount")]
    AmountOverflow { what: &'static str },

    /// Validation error (wraps ValidationError).
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Collection must contain at least one element.
    #[error("{field} must not be empty")]
    Empty { field: String },

    /// Value above the accepted maximum.
    #[error("{field} must not exceed {max}")]
    TooLarge { field: String, max: String },
}

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
