//! # Author Repository

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use bookstore_core::validation::validate_new_author;
use bookstore_core::{Author, EntityId, NewAuthor};

use super::table::Table;
use crate::context::RequestContext;
use crate::error::{StoreError, StoreResult};

const ENTITY: &str = "author";

/// Store of authors. Full name (first + last) is unique.
#[derive(Debug, Clone, Default)]
pub struct AuthorRepository {
    table: Arc<RwLock<Table<Author>>>,
}

impl AuthorRepository {
    pub fn new() -> Self {
        AuthorRepository::default()
    }

    /// Creates an author, rejecting a duplicate full name.
    pub async fn create(&self, ctx: &RequestContext, new: NewAuthor) -> StoreResult<Author> {
        validate_new_author(&new)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        if table.values().any(|a| a.same_name(&new)) {
            debug!(first_name = %new.first_name, last_name = %new.last_name, "Duplicate author");
            return Err(StoreError::duplicate(
                ENTITY,
                "name",
                format!("{} {}", new.first_name, new.last_name),
            ));
        }

        let id = table.allocate_id();
        let author = new.into_author(id);
        table.insert(id, author.clone());

        debug!(id, name = %author.full_name(), "Author created");
        Ok(author)
    }

    pub async fn get(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<Author> {
        let table = ctx.interruptible(self.table.read()).await?;
        table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Replaces every field of an existing author.
    pub async fn update(
        &self,
        ctx: &RequestContext,
        id: EntityId,
        new: NewAuthor,
    ) -> StoreResult<Author> {
        validate_new_author(&new)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        let slot = table
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
        *slot = new.into_author(id);

        debug!(id, "Author updated");
        Ok(slot.clone())
    }

    pub async fn delete(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<()> {
        let mut table = ctx.interruptible(self.table.write()).await?;
        if table.remove(id).is_none() {
            return Err(StoreError::not_found(ENTITY, id));
        }
        debug!(id, "Author deleted");
        Ok(())
    }

    /// All authors in id order; `Empty` when there are none.
    pub async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<Author>> {
        let table = ctx.interruptible(self.table.read()).await?;
        let all = table.collect_where(|_| true);
        if all.is_empty() {
            return Err(StoreError::Empty {
                collection: "authors",
            });
        }
        Ok(all)
    }
}
