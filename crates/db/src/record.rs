use time::Date;

pub type BookId = i64;

/// A stored book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub publish_date: Date,
    pub read_count: u64,
    pub comment_count: u64,
    /// Soft-delete marker. Stored and returned, never consulted.
    pub is_deleted: bool,
}

/// Validated input for create and update.
///
/// `None` means "not supplied": create falls back to the column default,
/// update keeps the stored value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookFields {
    pub title: String,
    pub publish_date: Date,
    pub read_count: Option<u64>,
    pub comment_count: Option<u64>,
    pub is_deleted: Option<bool>,
}

impl BookFields {
    pub fn new(title: impl Into<String>, publish_date: Date) -> Self {
        Self {
            title: title.into(),
            publish_date,
            read_count: None,
            comment_count: None,
            is_deleted: None,
        }
    }

    pub(crate) fn into_book(self, id: BookId) -> Book {
        Book {
            id,
            title: self.title,
            publish_date: self.publish_date,
            read_count: self.read_count.unwrap_or(0),
            comment_count: self.comment_count.unwrap_or(0),
            is_deleted: self.is_deleted.unwrap_or(false),
        }
    }

    pub(crate) fn apply_to(self, book: &mut Book) {
        book.title = self.title;
        book.publish_date = self.publish_date;
        if let Some(read_count) = self.read_count {
            book.read_count = read_count;
        }
        if let Some(comment_count) = self.comment_count {
            book.comment_count = comment_count;
        }
        if let Some(is_deleted) = self.is_deleted {
            book.is_deleted = is_deleted;
        }
    }
}
