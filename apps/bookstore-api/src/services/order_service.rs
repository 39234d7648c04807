//! # Order Service
//!
//! The order creation workflow: resolves the customer, reserves stock for
//! every line, prices the order in parallel and persists it.
//!
//! ## Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_order(ctx, NewOrder)                                            │
//! │                                                                         │
//! │  0. shape check ─────────── items non-empty, quantities > 0            │
//! │  1. customers.get ───────── snapshot of the customer                   │
//! │  2. for each line, in order:                                           │
//! │       books.decrement_stock ── atomic check + decrement               │
//! │                                post-decrement snapshot kept            │
//! │  3. price fan-out (JoinSet)                                            │
//! │       task 1 ─┐                                                        │
//! │       task 2 ─┼──► Mutex<Money> += price × qty                        │
//! │       task n ─┘    every task joined before moving on                  │
//! │                    checked arithmetic, overflow is an error            │
//! │  4. orders.create ───────── id assigned, status Pending                │
//! │                                                                         │
//! │  A failure at any step aborts. Nothing is persisted for the order,     │
//! │  and copies already taken in step 2 stay taken.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

use bookstore_core::validation::validate_new_order;
use bookstore_core::{
    EntityId, Money, NewOrder, Order, OrderItem, ValidationError, INITIAL_ORDER_STATUS,
};
use bookstore_store::{RequestContext, StoreError, Stores};

// =============================================================================
// Errors
// =============================================================================

/// Order workflow errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderError {
    /// Request shape rejected before anything was touched.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Customer lookup failed.
    #[error("failed to resolve customer with ID {id}: {source}")]
    Customer {
        id: EntityId,
        #[source]
        source: StoreError,
    },

    /// Book lookup or stock reservation failed for a reason other than stock.
    #[error("failed to reserve book with ID {id}: {source}")]
    Book {
        id: EntityId,
        #[source]
        source: StoreError,
    },

    /// A line asked for more copies than remain.
    ///
    /// ## When This Occurs
    /// Lines before this one have already been decremented.
    #[error("insufficient stock for book with ID {book_id} (available={available}, requested={requested})")]
    InsufficientStock {
        book_id: EntityId,
        available: u32,
        requested: u32,
    },

    /// The request context fired mid-workflow.
    #[error("order creation cancelled")]
    Cancelled,

    /// `price × quantity` or the running total left the cent range.
    #[error("order total exceeds the largest representable amount")]
    TotalOverflow,

    /// A pricing task panicked or was aborted.
    #[error("price aggregation task failed: {0}")]
    TaskFailed(String),

    /// The finished order could not be stored.
    #[error("failed to create order: {0}")]
    Persist(StoreError),
}

impl OrderError {
    fn customer(id: EntityId, source: StoreError) -> Self {
        match source {
            StoreError::Cancelled => OrderError::Cancelled,
            source => OrderError::Customer { id, source },
        }
    }

    fn book(id: EntityId, source: StoreError) -> Self {
        match source {
            StoreError::InsufficientStock {
                book_id,
                available,
                requested,
            } => OrderError::InsufficientStock {
                book_id,
                available,
                requested,
            },
            StoreError::Cancelled => OrderError::Cancelled,
            source => OrderError::Book { id, source },
        }
    }

    fn persist(source: StoreError) -> Self {
        match source {
            StoreError::Cancelled => OrderError::Cancelled,
            source => OrderError::Persist(source),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;

// =============================================================================
// Service
// =============================================================================

/// Runs the order workflow against the shared stores.
#[derive(Debug, Clone)]
pub struct OrderService {
    stores: Stores,
}

impl OrderService {
    pub fn new(stores: Stores) -> Self {
        OrderService { stores }
    }

    /// Creates an order from a candidate.
    ///
    /// ## Returns
    /// The persisted order with its id, customer and book snapshots,
    /// `total_price` and status `Pending`.
    ///
    /// ## Errors
    /// - `Validation` - empty item list or zero quantity (nothing mutated)
    /// - `Customer` - unknown customer (nothing mutated)
    /// - `Book` / `InsufficientStock` - earlier lines keep their decrement
    /// - `TotalOverflow` - the total does not fit in cents (lines keep their decrement)
    /// - `Cancelled` - deadline hit or caller went away
    pub async fn create_order(&self, ctx: &RequestContext, candidate: NewOrder) -> OrderResult<Order> {
        validate_new_order(&candidate)?;
        ctx.check().map_err(|_| OrderError::Cancelled)?;

        let customer_id = candidate.customer.id;
        let customer = self
            .stores
            .customers()
            .get(ctx, customer_id)
            .await
            .map_err(|source| OrderError::customer(customer_id, source))?;

        let mut items = Vec::with_capacity(candidate.items.len());
        for line in &candidate.items {
            let book = self
                .stores
                .books()
                .decrement_stock(ctx, line.book.id, line.quantity)
                .await
                .map_err(|source| OrderError::book(line.book.id, source))
                .inspect_err(|err| {
                    warn!(
                        customer_id,
                        book_id = line.book.id,
                        reserved_lines = items.len(),
                        error = %err,
                        "Order aborted during stock reservation"
                    )
                })?;
            items.push(OrderItem {
                book,
                quantity: line.quantity,
            });
        }

        let total_price = aggregate_total(ctx, &items).await?;

        let order = Order {
            id: 0,
            customer,
            items,
            total_price,
            created_at: Utc::now(),
            status: INITIAL_ORDER_STATUS,
        };
        let order = self
            .stores
            .orders()
            .create(ctx, order)
            .await
            .map_err(OrderError::persist)?;

        info!(
            order_id = order.id,
            customer_id,
            lines = order.items.len(),
            total = %order.total_price,
            "Order created"
        );
        Ok(order)
    }
}

/// Sums `price × quantity` over `items` with one task per line.
///
/// Every task checks the context before contributing. All tasks are joined
/// before returning; the first failure wins.
pub async fn aggregate_total(ctx: &RequestContext, items: &[OrderItem]) -> OrderResult<Money> {
    let total = Arc::new(Mutex::new(Money::zero()));
    let mut tasks = JoinSet::new();

    for item in items {
        let ctx = ctx.child();
        let total = Arc::clone(&total);
        let (price, quantity) = (item.book.price, item.quantity);

        tasks.spawn(async move {
            ctx.check().map_err(|_| OrderError::Cancelled)?;
            let line = price
                .checked_mul_quantity(quantity)
                .ok_or(OrderError::TotalOverflow)?;
            let mut total = total.lock().await;
            *total = total.checked_add(line).ok_or(OrderError::TotalOverflow)?;
            Ok::<_, OrderError>(())
        });
    }

    let mut first_error = None;
    while let Some(joined) = tasks.join_next().await {
        let outcome = joined
            .map_err(|e| OrderError::TaskFailed(e.to_string()))
            .and_then(|result| result);
        if let Err(err) = outcome {
            first_error.get_or_insert(err);
        }
    }
    if let Some(err) = first_error {
        debug!(error = %err, "Price aggregation failed");
        return Err(err);
    }

    let sum = *total.lock().await;
    Ok(sum)
}

// =============================================================================
// Unit Tests
// =============================================================================
