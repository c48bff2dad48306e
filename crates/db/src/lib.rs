//! Record storage for books.
//!
//! Handlers only see the [`BookStore`] trait; [`MemoryStore`] is the backend
//! the application ships with.

mod memory;
mod record;

pub use memory::MemoryStore;
pub use record::{Book, BookFields, BookId};

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("book {0} does not exist")]
    NotFound(BookId),

    #[error("no books stored")]
    Empty,
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence interface for [`Book`] records.
///
/// Every call is atomic: a mutation either fully applies and is visible to the
/// next call, or fails without side effects.
#[async_trait]
pub trait BookStore: Send + Sync {
    /// All live books in ascending id order
    async fn list_all(&self) -> StoreResult<Vec<Book>>;

    async fn get(&self, id: BookId) -> StoreResult<Book>;

    /// The book with the highest id
    async fn latest(&self) -> StoreResult<Book>;

    /// Insert a new record under a freshly assigned id
    async fn create(&self, fields: BookFields) -> StoreResult<Book>;

    /// Replace `title` and `publish_date`, and every optional field that is set
    async fn update(&self, id: BookId, fields: BookFields) -> StoreResult<Book>;

    /// Set `read_count` on the stored record, leaving every other field as is
    async fn set_read_count(&self, id: BookId, read_count: u64) -> StoreResult<Book>;

    /// Physically remove the record
    async fn delete(&self, id: BookId) -> StoreResult<()>;
}
