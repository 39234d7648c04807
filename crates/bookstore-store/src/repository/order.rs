//! # Order Repository
//!
//! Plain keyed storage for orders. It never looks at stock: orders are
//! validated by the workflow before they get here, and PUT replaces a record
//! as-is.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use bookstore_core::{EntityId, Order};

use super::table::Table;
use crate::context::RequestContext;
use crate::error::{StoreError, StoreResult};

const ENTITY: &str = "order";

#[derive(Debug, Clone, Default)]
pub struct OrderRepository {
    table: Arc<RwLock<Table<Order>>>,
}

impl OrderRepository {
    pub fn new() -> Self {
        OrderRepository::default()
    }

    /// Stores an order under a fresh id and returns it with that id.
    pub async fn create(&self, ctx: &RequestContext, mut order: Order) -> StoreResult<Order> {
        let mut table = ctx.interruptible(self.table.write()).await?;

        order.id = table.allocate_id();
        table.insert(order.id, order.clone());

        debug!(id = order.id, items = order.items.len(), total = %order.total_price, "Order created");
        Ok(order)
    }

    pub async fn get(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<Order> {
        let table = ctx.interruptible(self.table.read()).await?;
        table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Replaces an existing order. The path id wins over any id in the body.
    pub async fn update(&self, ctx: &RequestContext, id: EntityId, mut order: Order) -> StoreResult<Order> {
        let mut table = ctx.interruptible(self.table.write()).await?;

        if !table.contains(id) {
            return Err(StoreError::not_found(ENTITY, id));
        }
        order.id = id;
        table.insert(id, order.clone());

        debug!(id, status = ?order.status, "Order updated");
        Ok(order)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<()> {
        let mut table = ctx.interruptible(self.table.write()).await?;
        if table.remove(id).is_none() {
            return Err(StoreError::not_found(ENTITY, id));
        }
        debug!(id, "Order deleted");
        Ok(())
    }

    /// All orders in id order; `Empty` when there are none.
    pub async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<Order>> {
        let table = ctx.interruptible(self.table.read()).await?;
        let all = table.collect_where(|_| true);
        if all.is_empty() {
            return Err(StoreError::Empty { collection: "orders" });
        }
        Ok(all)
    }

    /// Orders created strictly between `start` and `end`, in id order.
    ///
    /// An empty window is not an error: reports over quiet periods are valid.
    pub async fn in_time_range(
        &self,
        ctx: &RequestContext,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StoreResult<Vec<Order>> {
        let table = ctx.interruptible(self.table.read()).await?;
        Ok(table.collect_where(|o| o.created_at > start && o.created_at < end))
    }
}
