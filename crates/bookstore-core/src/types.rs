//! # Domain Types
//!
//! Entities used throughout the bookstore backend.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │     Author      │◄──│      Book       │   │    Customer     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  first/last     │   │  title (unique) │   │  name (unique)  │       │
//! │  │  bio            │   │  price, stock   │   │  email, address │       │
//! │  └─────────────────┘   └────────▲────────┘   └────────▲────────┘       │
//! │                                 │ snapshot            │ snapshot        │
//! │                        ┌────────┴─────────────────────┴────────┐       │
//! │                        │               Order                   │       │
//! │                        │  items: [OrderItem { book, quantity }]│       │
//! │                        │  total_price, created_at, status      │       │
//! │                        └───────────────────────────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! An `Order` embeds copies of the customer and of every book as they were
//! when the order was created. Later edits to the originals never reach it.
//!
//! ## New* Types
//! `NewAuthor`, `NewBook`, `NewCustomer` are the request bodies of POST and
//! PUT. Identifiers (and the customer's `created_at`) are always assigned by
//! the store, never by the client.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// Identifier assigned by a store (starts at 1).
pub type EntityId = u64;

// =============================================================================
// Author
// =============================================================================

/// A book author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Author {
    pub id: EntityId,
    pub first_name: String,
    pub last_name: String,
    pub bio: String,
}

impl Author {
    /// Returns "first last".
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// Two authors collide when both name parts are equal.
    pub fn same_name(&self, other: &NewAuthor) -> bool {
        self.first_name == other.first_name && self.last_name == other.last_name
    }
}

/// Request body for creating or replacing an author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAuthor {
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
}

impl NewAuthor {
    pub fn into_author(self, id: EntityId) -> Author {
        Author {
            id,
            first_name: self.first_name,
            last_name: self.last_name,
            bio: self.bio,
        }
    }
}

// =============================================================================
// Book
// =============================================================================

/// A book for sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default, alias = "genres")]
    pub genre: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_at: Option<DateTime<Utc>>,
    pub price: Money,
    /// Copies on hand. Unsigned: stock can never be negative.
    pub stock: u32,
}

impl Book {
    /// Checks whether `quantity` copies can be taken from stock.
    pub fn can_fulfil(&self, quantity: u32) -> bool {
        self.stock >= quantity
    }

    /// Removes `quantity` copies from stock.
    ///
    /// ## Errors
    /// `CoreError::InsufficientStock` when fewer than `quantity` copies are
    /// on hand; the book is left unchanged.
    pub fn decrement_stock(&mut self, quantity: u32) -> CoreResult<()> {
        if !self.can_fulfil(quantity) {
            return Err(CoreError::InsufficientStock {
                book_id: self.id,
                available: self.stock,
                requested: quantity,
            });
        }
        self.stock -= quantity;
        Ok(())
    }

    /// Adds `quantity` copies to stock.
    pub fn add_stock(&mut self, quantity: u32) -> CoreResult<()> {
        self.stock = self
            .stock
            .checked_add(quantity)
            .ok_or(CoreError::StockOverflow { book_id: self.id })?;
        Ok(())
    }

    /// Unit price × quantity, `None` on overflow.
    #[inline]
    pub fn line_total(&self, quantity: u32) -> Option<Money> {
        self.price.checked_mul_quantity(quantity)
    }
}

/// Request body for creating or replacing a book.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub author: Author,
    #[serde(default, alias = "genres")]
    pub genre: String,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    pub price: Money,
    #[serde(default)]
    pub stock: u32,
}

impl NewBook {
    pub fn into_book(self, id: EntityId) -> Book {
        Book {
            id,
            title: self.title,
            author: self.author,
            genre: self.genre,
            published_at: self.published_at,
            price: self.price,
            stock: self.stock,
        }
    }
}

/// Filter for book searches. Every present field must match.
///
/// Deserializes from the query string of `GET /books`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BookQuery {
    pub title: Option<String>,
    pub author_id: Option<EntityId>,
    pub genre: Option<String>,
    pub min_price: Option<Money>,
    pub max_price: Option<Money>,
}

impl BookQuery {
    /// True when no criterion is set (a plain listing).
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author_id.is_none()
            && self.genre.is_none()
            && self.min_price.is_none()
            && self.max_price.is_none()
    }

    pub fn matches(&self, book: &Book) -> bool {
        self.title.as_ref().map_or(true, |t| &book.title == t)
            && self.author_id.map_or(true, |id| book.author.id == id)
            && self.genre.as_ref().map_or(true, |g| &book.genre == g)
            && self.min_price.map_or(true, |min| book.price >= min)
            && self.max_price.map_or(true, |max| book.price <= max)
    }
}

// =============================================================================
// Customer
// =============================================================================

/// Postal address of a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    pub street: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub id: EntityId,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
    pub created_at: DateTime<Utc>,
}

/// Request body for creating or replacing a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub address: Address,
}

impl NewCustomer {
    pub fn into_customer(self, id: EntityId, created_at: DateTime<Utc>) -> Customer {
        Customer {
            id,
            name: self.name,
            email: self.email,
            address: self.address,
            created_at,
        }
    }
}

// =============================================================================
// Order Status
// =============================================================================

/// Lifecycle state of an order. Serialized as the variant name ("Pending").
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Just created by the order workflow.
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

// =============================================================================
// Order
// =============================================================================

/// A line in an order. `book` is a snapshot taken after the stock decrement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItem {
    pub book: Book,
    pub quantity: u32,
}

impl OrderItem {
    #[inline]
    pub fn line_total(&self) -> Option<Money> {
        self.book.line_total(self.quantity)
    }
}

/// A persisted order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Assigned by the order store; ignored on input.
    #[serde(default)]
    pub id: EntityId,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub total_price: Money,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub status: OrderStatus,
}

impl Order {
    /// Sum of the item line totals (what `total_price` is derived from).
    pub fn items_total(&self) -> Option<Money> {
        self.items.iter().try_fold(Money::zero(), |acc, item| {
            item.line_total().and_then(|line| acc.checked_add(line))
        })
    }
}

/// Reference to an existing entity by id: `{"id": 3}`.
///
/// Extra fields are ignored, so a full entity body is accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: EntityId,
}

/// Candidate line item of an order request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrderItem {
    pub book: EntityRef,
    pub quantity: u32,
}

/// Candidate order submitted to `POST /orders`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub customer: EntityRef,
    #[serde(default)]
    pub items: Vec<NewOrderItem>,
}

// =============================================================================
// Sales Report
// =============================================================================

/// Quantity sold of one book within a report window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSales {
    pub book: Book,
    #[serde(rename = "quantity_sold")]
    pub quantity: u64,
}

/// Revenue and volume over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SalesReport {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub generated_at: DateTime<Utc>,
    pub total_revenue: Money,
    pub total_orders: usize,
    pub top_selling_books: Vec<BookSales>,
}

impl SalesReport {
    /// Aggregates a set of orders into a report.
    ///
    /// Quantities are summed per book id. The book snapshot shown is the one
    /// from the most recent order in the set. Books are ranked by quantity
    /// sold, descending, ties broken by book id.
    ///
    /// ## Errors
    /// `CoreError::AmountOverflow` when the revenue does not fit in cents.
    pub fn from_orders(
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        generated_at: DateTime<Utc>,
        orders: &[Order],
    ) -> CoreResult<Self> {
        let total_revenue = Money::checked_sum(orders.iter().map(|o| o.total_price))
            .ok_or(CoreError::AmountOverflow {
                what: "total revenue",
            })?;

        let mut per_book: BTreeMap<EntityId, (DateTime<Utc>, BookSales)> = BTreeMap::new();
        for order in orders {
            for item in &order.items {
                let entry = per_book.entry(item.book.id).or_insert_with(|| {
                    (
                        order.created_at,
                        BookSales {
                            book: item.book.clone(),
                            quantity: 0,
                        },
                    )
                });
                entry.1.quantity += u64::from(item.quantity);
                if order.created_at > entry.0 {
                    entry.0 = order.created_at;
                    entry.1.book = item.book.clone();
                }
            }
        }

        let mut top_selling_books: Vec<BookSales> =
            per_book.into_values().map(|(_, sales)| sales).collect();
        top_selling_books.sort_by(|a, b| {
            b.quantity
                .cmp(&a.quantity)
                .then_with(|| a.book.id.cmp(&b.book.id))
        });

        Ok(SalesReport {
            start,
            end,
            generated_at,
            total_revenue,
            total_orders: orders.len(),
            top_selling_books,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn book(id: EntityId, price_cents: i64, stock: u32) -> Book {
        Book {
            id,
            title: format!("Book {}", id),
            author: Author::default(),
            genre: "Fiction".to_string(),
            published_at: None,
            price: Money::from_cents(price_cents),
            stock,
        }
    }

    fn customer() -> Customer {
        NewCustomer {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            address: Address::default(),
        }
        .into_customer(1, Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap())
    }

    #[test]
    fn test_decrement_stock() {
        let mut b = book(1, 1000, 5);
        b.decrement_stock(3).unwrap();
        assert_eq!(b.stock, 2);
    }

    #[test]
    fn test_decrement_stock_insufficient_leaves_book_unchanged() {
        let mut b = book(1, 1000, 2);
        let err = b.decrement_stock(5).unwrap_err();
        assert_eq!(
            err,
            CoreError::InsufficientStock {
                book_id: 1,
                available: 2,
                requested: 5
            }
        );
        assert_eq!(b.stock, 2);
    }

    #[test]
    fn test_add_stock_overflow() {
        let mut b = book(7, 1000, u32::MAX);
        assert_eq!(
            b.add_stock(1).unwrap_err(),
            CoreError::StockOverflow { book_id: 7 }
        );
    }

    #[test]
    fn test_book_accepts_genres_alias() {
        let json = r#"{"title":"Dune","genres":"Sci-Fi","price":9.5,"stock":4}"#;
        let new_book: NewBook = serde_json::from_str(json).unwrap();
        assert_eq!(new_book.genre, "Sci-Fi");
        assert_eq!(new_book.price, Money::from_cents(950));
    }

    #[test]
    fn test_negative_stock_is_rejected_on_input() {
        let json = r#"{"title":"Dune","price":9.5,"stock":-1}"#;
        assert!(serde_json::from_str::<NewBook>(json).is_err());
    }

    #[test]
    fn test_book_query_matches() {
        let b = book(1, 1500, 1);
        assert!(BookQuery::default().matches(&b));
        assert!(BookQuery::default().is_empty());

        let q = BookQuery {
            genre: Some("Fiction".to_string()),
            min_price: Some(Money::from_cents(1000)),
            max_price: Some(Money::from_cents(1500)),
            ..Default::default()
        };
        assert!(q.matches(&b));

        let q = BookQuery {
            max_price: Some(Money::from_cents(1499)),
            ..Default::default()
        };
        assert!(!q.matches(&b));
    }

    #[test]
    fn test_order_status_wire_format() {
        assert_eq!(
            serde_json::to_string(&OrderStatus::Pending).unwrap(),
            "\"Pending\""
        );
        assert_eq!(OrderStatus::default(), OrderStatus::Pending);
    }

    #[test]
    fn test_new_order_ignores_extra_fields() {
        let json = r#"{
            "customer": {"id": 1, "name": "ignored"},
            "items": [{"book": {"id": 2, "title": "ignored"}, "quantity": 3}]
        }"#;
        let order: NewOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.customer.id, 1);
        assert_eq!(order.items[0].book.id, 2);
        assert_eq!(order.items[0].quantity, 3);
    }

    #[test]
    fn test_sales_report_aggregates_per_book() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let t1 = Utc.with_ymd_and_hms(2024, 1, 1, 11, 0, 0).unwrap();

        let first = Order {
            id: 1,
            customer: customer(),
            items: vec![
                OrderItem { book: book(1, 1000, 4), quantity: 1 },
                OrderItem { book: book(2, 500, 9), quantity: 1 },
            ],
            total_price: Money::from_cents(1500),
            created_at: t0,
            status: OrderStatus::Pending,
        };
        let second = Order {
            id: 2,
            customer: customer(),
            items: vec![OrderItem { book: book(2, 500, 6), quantity: 3 }],
            total_price: Money::from_cents(1500),
            created_at: t1,
            status: OrderStatus::Pending,
        };

        let report = SalesReport::from_orders(t0, t1, t1, &[first, second]).unwrap();
        assert_eq!(report.total_orders, 2);
        assert_eq!(report.total_revenue, Money::from_cents(3000));
        assert_eq!(report.top_selling_books.len(), 2);
        assert_eq!(report.top_selling_books[0].book.id, 2);
        assert_eq!(report.top_selling_books[0].quantity, 4);
        // snapshot from the latest order
        assert_eq!(report.top_selling_books[0].book.stock, 6);
        assert_eq!(report.top_selling_books[1].book.id, 1);
    }

    #[test]
    fn test_sales_report_revenue_overflow() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let order = |id| Order {
            id,
            customer: customer(),
            items: vec![OrderItem { book: book(1, 1000, 0), quantity: 1 }],
            total_price: Money::from_cents(i64::MAX / 2 + 1),
            created_at: t,
            status: OrderStatus::Pending,
        };

        assert_eq!(
            SalesReport::from_orders(t, t, t, &[order(1), order(2)]),
            Err(CoreError::AmountOverflow {
                what: "total revenue"
            })
        );
    }

    #[test]
    fn test_items_total_overflow() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let line = OrderItem {
            book: book(1, 1_000_000_000, 0),
            quantity: u32::MAX,
        };
        let mut order = Order {
            id: 1,
            customer: customer(),
            items: vec![line.clone(), line.clone()],
            total_price: Money::zero(),
            created_at: t,
            status: OrderStatus::Pending,
        };
        assert!(order.items_total().is_some());

        order.items.push(line);
        assert_eq!(order.items_total(), None);
    }

    #[test]
    fn test_sales_report_empty_window() {
        let t = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let report = SalesReport::from_orders(t, t, t, &[]).unwrap();
        assert_eq!(report.total_orders, 0);
        assert!(report.total_revenue.is_zero());
        assert!(report.top_selling_books.is_empty());
    }
}
