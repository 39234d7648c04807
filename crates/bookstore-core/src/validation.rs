//! # Validation Module
//!
//! Input validation for request bodies, run before anything touches a store.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Deserialization (serde)                                       │
//! │  ├── Malformed JSON, wrong types                                       │
//! │  └── Negative stock / quantity (unsigned fields)                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Required names and titles                                        │
//! │  ├── Prices between 0 and MAX_PRICE                                    │
//! │  └── Non-empty orders with positive quantities                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Stores                                                       │
//! │  └── Uniqueness, existence, stock availability                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{NewAuthor, NewBook, NewCustomer, NewOrder, Order};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest accepted book price (10,000,000.00).
///
/// Keeps `price × quantity` of a single line inside the i64 cent range for
/// any `u32` quantity.
pub const MAX_PRICE: Money = Money::from_cents(1_000_000_000);

// =============================================================================
// Field Validators
// =============================================================================

/// Rejects empty or whitespace-only text.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price.
///
/// ## Example
/// ```rust
/// use bookstore_core::money::Money;
/// use bookstore_core::validation::validate_price;
///
/// assert!(validate_price(Money::from_cents(1099)).is_ok());
/// assert!(validate_price(Money::zero()).is_ok());
/// assert!(validate_price(Money::from_cents(-1)).is_err());
/// assert!(validate_price(Money::from_decimal(5.0e16).unwrap()).is_err());
/// ```
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "price".to_string(),
        });
    }
    if price > MAX_PRICE {
        return Err(ValidationError::TooLarge {
            field: "price".to_string(),
            max: MAX_PRICE.to_string(),
        });
    }
    Ok(())
}

/// Validates an order line quantity (must be > 0).
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Entity Validators
// =============================================================================

/// Validates an order replaced through `PUT /orders/{id}`.
///
/// Stock is not looked at; only the total has to be a valid amount.
pub fn validate_order(order: &Order) -> ValidationResult<()> {
    if order.total_price.is_negative() {
        return Err(ValidationError::MustNotBeNegative {
            field: "total_price".to_string(),
        });
    }
    Ok(())
}

pub fn validate_new_author(author: &NewAuthor) -> ValidationResult<()> {
    validate_required("first_name", &author.first_name)?;
    validate_required("last_name", &author.last_name)
}

pub fn validate_new_book(book: &NewBook) -> ValidationResult<()> {
    validate_required("title", &book.title)?;
    validate_price(book.price)
}

pub fn validate_new_customer(customer: &NewCustomer) -> ValidationResult<()> {
    validate_required("name", &customer.name)
}

/// Validates the shape of an order request.
///
/// ## Rules
/// - At least one item
/// - Every quantity positive
pub fn validate_new_order(order: &NewOrder) -> ValidationResult<()> {
    if order.items.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }
    order
        .items
        .iter()
        .try_for_each(|item| validate_quantity(item.quantity))
}

// =============================================================================
// Unit Tests
// =============================================================================
