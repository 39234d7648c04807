//! # Customer Repository

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::RwLock;
use tracing::debug;

use bookstore_core::validation::validate_new_customer;
use bookstore_core::{Customer, EntityId, NewCustomer};

use super::table::Table;
use crate::context::RequestContext;
use crate::error::{StoreError, StoreResult};

const ENTITY: &str = "customer";

/// Store of customers. Name is unique; `created_at` is stamped on create.
#[derive(Debug, Clone, Default)]
pub struct CustomerRepository {
    table: Arc<RwLock<Table<Customer>>>,
}

impl CustomerRepository {
    pub fn new() -> Self {
        CustomerRepository::default()
    }

    /// Creates a customer, rejecting a duplicate name.
    pub async fn create(&self, ctx: &RequestContext, new: NewCustomer) -> StoreResult<Customer> {
        validate_new_customer(&new)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        if table.values().any(|c| c.name == new.name) {
            debug!(name = %new.name, "Duplicate customer name");
            return Err(StoreError::duplicate(ENTITY, "name", new.name));
        }

        let id = table.allocate_id();
        let customer = new.into_customer(id, Utc::now());
        table.insert(id, customer.clone());

        debug!(id, name = %customer.name, "Customer created");
        Ok(customer)
    }

    pub async fn get(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<Customer> {
        let table = ctx.interruptible(self.table.read()).await?;
        table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Replaces name, email and address. `created_at` is kept.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: EntityId,
        new: NewCustomer,
    ) -> StoreResult<Customer> {
        validate_new_customer(&new)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        let slot = table
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
        *slot = new.into_customer(id, slot.created_at);

        debug!(id, "Customer updated");
        Ok(slot.clone())
    }

    pub async fn delete(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<()> {
        let mut table = ctx.interruptible(self.table.write()).await?;
        if table.remove(id).is_none() {
            return Err(StoreError::not_found(ENTITY, id));
        }
        debug!(id, "Customer deleted");
        Ok(())
    }

    /// All customers in id order; `Empty` when there are none.
    pub async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<Customer>> {
        let table = ctx.interruptible(self.table.read()).await?;
        let all = table.collect_where(|_| true);
        if all.is_empty() {
            return Err(StoreError::Empty {
                collection: "customers",
            });
        }
        Ok(all)
    }
}
