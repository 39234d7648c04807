//! # Book Repository
//!
//! Book CRUD plus the two stock mutations used by the order workflow.
//!
//! ## Atomic Stock Decrement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  decrement_stock(ctx, id, qty)                                          │
//! │                                                                         │
//! │   write lock ──┬── fetch book ─────────── NotFound?                    │
//! │                ├── stock >= qty? ──────── InsufficientStock?           │
//! │                ├── stock -= qty                                        │
//! │                └── return post-decrement snapshot                      │
//! │   unlock                                                                │
//! │                                                                         │
//! │  The whole read-check-write runs under one write guard, so two         │
//! │  concurrent orders can never both pass the check on the same copies.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use bookstore_core::validation::{validate_new_book, validate_quantity};
use bookstore_core::{Book, BookQuery, EntityId, NewBook};

use super::table::Table;
use crate::context::RequestContext;
use crate::error::{StoreError, StoreResult};

const ENTITY: &str = "book";

/// Store of books. Title is unique.
#[derive(Debug, Clone, Default)]
pub struct BookRepository {
    table: Arc<RwLock<Table<Book>>>,
}

impl BookRepository {
    pub fn new() -> Self {
        BookRepository::default()
    }

    /// Creates a book, rejecting a duplicate title.
    pub async fn create(&self, ctx: &RequestContext, new: NewBook) -> StoreResult<Book> {
        validate_new_book(&new)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        if table.values().any(|b| b.title == new.title) {
            debug!(title = %new.title, "Duplicate book title");
            return Err(StoreError::duplicate(ENTITY, "title", new.title));
        }

        let id = table.allocate_id();
        let book = new.into_book(id);
        table.insert(id, book.clone());

        debug!(id, title = %book.title, stock = book.stock, "Book created");
        Ok(book)
    }

    pub async fn get(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<Book> {
        let table = ctx.interruptible(self.table.read()).await?;
        table
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found(ENTITY, id))
    }

    /// Replaces every field of an existing book (stock included).
    pub async fn update(&self, ctx: &RequestContext, id: EntityId, new: NewBook) -> StoreResult<Book> {
        validate_new_book(&new)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        let slot = table
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
        *slot = new.into_book(id);

        debug!(id, stock = slot.stock, "Book updated");
        Ok(slot.clone())
    }

    /// Removes a book. Orders holding a snapshot of it are unaffected.
    pub async fn delete(&self, ctx: &RequestContext, id: EntityId) -> StoreResult<()> {
        let mut table = ctx.interruptible(self.table.write()).await?;
        if table.remove(id).is_none() {
            return Err(StoreError::not_found(ENTITY, id));
        }
        debug!(id, "Book deleted");
        Ok(())
    }

    /// All books in id order; `Empty` when there are none.
    pub async fn list(&self, ctx: &RequestContext) -> StoreResult<Vec<Book>> {
        self.search(ctx, &BookQuery::default()).await
    }

    /// Books matching every criterion in `query`; `Empty` when none match.
    pub async fn search(&self, ctx: &RequestContext, query: &BookQuery) -> StoreResult<Vec<Book>> {
        let table = ctx.interruptible(self.table.read()).await?;
        let found = table.collect_where(|b| query.matches(b));
        if found.is_empty() {
            return Err(StoreError::Empty { collection: "books" });
        }
        Ok(found)
    }

    /// Takes `qty` copies out of stock in one critical section.
    ///
    /// ## Returns
    /// The book as it is after the decrement.
    ///
    /// ## Errors
    /// - `NotFound` if the book does not exist
    /// - `InsufficientStock` if fewer than `qty` copies remain (stock untouched)
    /// - `Cancelled` if the context fired before the lock was obtained
    pub async fn decrement_stock(
        &self,
        ctx: &RequestContext,
        id: EntityId,
        qty: u32,
    ) -> StoreResult<Book> {
        validate_quantity(qty)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        let book = table
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
        book.decrement_stock(qty)?;

        debug!(id, qty, remaining = book.stock, "Stock decremented");
        Ok(book.clone())
    }

    /// Puts `qty` copies back into stock.
    pub async fn add_stock(&self, ctx: &RequestContext, id: EntityId, qty: u32) -> StoreResult<Book> {
        validate_quantity(qty)?;
        let mut table = ctx.interruptible(self.table.write()).await?;

        let book = table
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(ENTITY, id))?;
        book.add_stock(qty)?;

        debug!(id, qty, stock = book.stock, "Stock added");
        Ok(book.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bookstore_core::{Author, Money};
    use std::time::Duration;
    use tokio::time::Instant;

    fn new_book(title: &str, price_cents: i64, stock: u32) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: Author::default(),
            genre: "Fantasy".to_string(),
            published_at: None,
            price: Money::from_cents(price_cents),
            stock,
        }
    }

    #[tokio::test]
    async fn test_duplicate_title_rejected() {
        let repo = BookRepository::new();
        let ctx = RequestContext::new();
        repo.create(&ctx, new_book("Dune", 1000, 1)).await.unwrap();

        let err = repo.create(&ctx, new_book("Dune", 900, 2)).await.unwrap_err();
        assert_eq!(err, StoreError::duplicate("book", "title", "Dune"));
    }

    #[tokio::test]
    async fn test_update_replaces_all_fields() {
        let repo = BookRepository::new();
        let ctx = RequestContext::new();
        repo.create(&ctx, new_book("Dune", 1000, 1)).await.unwrap();

        let updated = repo
            .update(&ctx, 1, new_book("Dune Messiah", 1200, 7))
            .await
            .unwrap();
        assert_eq!(updated.id, 1);
        assert_eq!(updated.title, "Dune Messiah");
        assert_eq!(repo.get(&ctx, 1).await.unwrap().stock, 7);
        assert!(repo.update(&ctx, 2, new_book("x", 1, 1)).await.is_err());
    }

    #[tokio::test]
    async fn test_decrement_stock() {
        let repo = BookRepository::new();
        let ctx = RequestContext::new();
        repo.create(&ctx, new_book("Dune", 1000, 5)).await.unwrap();

        let after = repo.decrement_stock(&ctx, 1, 3).await.unwrap();
        assert_eq!(after.stock, 2);

        let err = repo.decrement_stock(&ctx, 1, 5).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::InsufficientStock {
                book_id: 1,
                available: 2,
                requested: 5
            }
        );
        assert_eq!(repo.get(&ctx, 1).await.unwrap().stock, 2);

        assert_eq!(
            repo.decrement_stock(&ctx, 9, 1).await,
            Err(StoreError::not_found("book", 9))
        );
    }

    #[tokio::test]
    async fn test_add_stock() {
        let repo = BookRepository::new();
        let ctx = RequestContext::new();
        repo.create(&ctx, new_book("Dune", 1000, 0)).await.unwrap();

        assert_eq!(repo.add_stock(&ctx, 1, 4).await.unwrap().stock, 4);
        assert!(matches!(
            repo.add_stock(&ctx, 1, 0).await,
            Err(StoreError::Validation(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_decrement_behind_busy_store_gives_up_at_deadline() {
        let repo = BookRepository::new();
        repo.create(&RequestContext::new(), new_book("Dune", 1000, 5))
            .await
            .unwrap();

        let held = repo.table.write().await;
        let ctx = RequestContext::with_timeout(Duration::from_secs(5));
        let started = Instant::now();
        assert_eq!(
            repo.decrement_stock(&ctx, 1, 1).await,
            Err(StoreError::Cancelled)
        );
        assert_eq!(started.elapsed(), Duration::from_secs(5));
        drop(held);

        assert_eq!(repo.get(&RequestContext::new(), 1).await.unwrap().stock, 5);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_decrements_never_oversell() {
        let repo = BookRepository::new();
        let ctx = RequestContext::new();
        repo.create(&ctx, new_book("Dune", 1000, 5)).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..20 {
            let repo = repo.clone();
            let ctx = ctx.clone();
            handles.push(tokio::spawn(async move {
                repo.decrement_stock(&ctx, 1, 1).await
            }));
        }

        let mut sold = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                sold += 1;
            }
        }

        assert_eq!(sold, 5);
        assert_eq!(repo.get(&ctx, 1).await.unwrap().stock, 0);
    }

    #[tokio::test]
    async fn test_search() {
        let repo = BookRepository::new();
        let ctx = RequestContext::new();
        repo.create(&ctx, new_book("Cheap", 500, 1)).await.unwrap();
        repo.create(&ctx, new_book("Pricey", 5000, 1)).await.unwrap();

        let query = BookQuery {
            max_price: Some(Money::from_cents(1000)),
            ..Default::default()
        };
        let found = repo.search(&ctx, &query).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title, "Cheap");

        let query = BookQuery {
            genre: Some("Horror".to_string()),
            ..Default::default()
        };
        assert_eq!(
            repo.search(&ctx, &query).await,
            Err(StoreError::Empty { collection: "books" })
        );
        assert_eq!(repo.list(&ctx).await.unwrap().len(), 2);
    }
}
