use serde::{Deserialize, Serialize};

/// Wire representation of a book.
///
/// Field order here is the key order on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookRepr {
    /// Identifier assigned by the store
    pub id: i64,
    /// Title, at most 20 characters
    pub title: String,
    /// Publication date as `YYYY-MM-DD`
    pub publish_date: String,
    pub read_count: u64,
    pub comment_count: u64,
    /// Soft-delete marker; informational only
    pub is_deleted: bool,
}
