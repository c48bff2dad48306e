use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::record::{Book, BookFields, BookId};
use crate::{BookStore, StoreError, StoreResult};

#[derive(Debug)]
struct Table {
    rows: BTreeMap<BookId, Book>,
    /// Last id handed out; ids are never reused, even after delete.
    last_id: BookId,
}

/// In-process [`BookStore`] backed by an ordered map.
#[derive(Debug)]
pub struct MemoryStore {
    table: RwLock<Table>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            table: RwLock::new(Table {
                rows: BTreeMap::new(),
                last_id: 0,
            }),
        }
    }

    /// Build a store pre-populated with `books`, assigning ids in order.
    pub fn with_books(books: impl IntoIterator<Item = BookFields>) -> Self {
        let mut table = Table {
            rows: BTreeMap::new(),
            last_id: 0,
        };
        for fields in books {
            table.last_id += 1;
            table.rows.insert(table.last_id, fields.into_book(table.last_id));
        }
        Self {
            table: RwLock::new(table),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookStore for MemoryStore {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        let table = self.table.read().await;
        Ok(table.rows.values().cloned().collect())
    }

    async fn get(&self, id: BookId) -> StoreResult<Book> {
        let table = self.table.read().await;
        table.rows.get(&id).cloned().ok_or(StoreError::NotFound(id))
    }

    async fn latest(&self) -> StoreResult<Book> {
        let table = self.table.read().await;
        table
            .rows
            .last_key_value()
            .map(|(_, book)| book.clone())
            .ok_or(StoreError::Empty)
    }

    async fn create(&self, fields: BookFields) -> StoreResult<Book> {
        let mut table = self.table.write().await;
        table.last_id += 1;
        let id = table.last_id;
        let book = fields.into_book(id);
        table.rows.insert(id, book.clone());
        tracing::debug!(book_id = id, title = %book.title, "book created");
        Ok(book)
    }

    async fn update(&self, id: BookId, fields: BookFields) -> StoreResult<Book> {
        let mut table = self.table.write().await;
        let book = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        fields.apply_to(book);
        tracing::debug!(book_id = id, "book updated");
        Ok(book.clone())
    }

    async fn set_read_count(&self, id: BookId, read_count: u64) -> StoreResult<Book> {
        let mut table = self.table.write().await;
        let book = table.rows.get_mut(&id).ok_or(StoreError::NotFound(id))?;
        book.read_count = read_count;
        tracing::debug!(book_id = id, read_count, "book read count set");
        Ok(book.clone())
    }

    async fn delete(&self, id: BookId) -> StoreResult<()> {
        let mut table = self.table.write().await;
        table.rows.remove(&id).ok_or(StoreError::NotFound(id))?;
        tracing::debug!(book_id = id, "book deleted");
        Ok(())
    }
}
