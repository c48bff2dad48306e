//! Mapping between stored [`Book`] records and their JSON representation.
//!
//! Inbound payloads are checked field by field and every problem is reported
//! at once, keyed by field name.

use serde_json::{Map, Value};
use shelf_db::{Book, BookFields};
use shelf_http::error::{AppError, FieldErrors};
use thiserror::Error;
use time::{format_description::BorrowedFormatItem, macros::format_description, Date};

use super::models::BookRepr;

/// Wire fields in output order.
pub const BOOK_FIELDS: [&str; 6] = [
    "id",
    "title",
    "publish_date",
    "read_count",
    "comment_count",
    "is_deleted",
];

pub const TITLE_MAX_CHARS: usize = 20;

const DATE_FORMAT: &[BorrowedFormatItem<'static>] = format_description!("[year]-[month]-[day]");

const REQUIRED: &str = "This field is required.";
const NOT_NULL: &str = "This field may not be null.";
const NOT_BLANK: &str = "This field may not be blank.";
const NOT_STRING: &str = "Not a valid string.";
const BAD_DATE: &str = "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.";
const BAD_INTEGER: &str = "A valid integer is required.";
const NEGATIVE: &str = "Ensure this value is greater than or equal to 0.";
const BAD_BOOLEAN: &str = "Must be a valid boolean.";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid book payload: {fields:?}")]
pub struct ValidationError {
    pub fields: FieldErrors,
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::validation(err.fields)
    }
}

/// Collects per-field failures while the rest of the payload is checked.
#[derive(Default)]
struct Collector {
    fields: FieldErrors,
}

impl Collector {
    fn take<T>(&mut self, name: &str, result: Result<T, String>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(message) => {
                self.fields
                    .entry(name.to_string())
                    .or_default()
                    .push(message);
                None
            }
        }
    }

    fn into_error(self) -> ValidationError {
        ValidationError {
            fields: self.fields,
        }
    }
}

pub fn represent(book: &Book) -> BookRepr {
    BookRepr {
        id: book.id,
        title: book.title.clone(),
        publish_date: format_date(book.publish_date),
        read_count: book.read_count,
        comment_count: book.comment_count,
        is_deleted: book.is_deleted,
    }
}

pub fn represent_all(books: &[Book]) -> Vec<BookRepr> {
    books.iter().map(represent).collect()
}

/// Validate a full create/update payload.
///
/// `id` is read-only and unknown keys are ignored.
pub fn validate(data: &Value) -> Result<BookFields, ValidationError> {
    let object = as_object(data)?;
    let mut errors = Collector::default();

    let title = errors.take("title", require(object, "title").and_then(parse_title));
    let publish_date = errors.take(
        "publish_date",
        require(object, "publish_date").and_then(parse_date),
    );
    let read_count = errors.take(
        "read_count",
        optional(object, "read_count").and_then(|v| v.map(parse_count).transpose()),
    );
    let comment_count = errors.take(
        "comment_count",
        optional(object, "comment_count").and_then(|v| v.map(parse_count).transpose()),
    );
    let is_deleted = errors.take(
        "is_deleted",
        optional(object, "is_deleted").and_then(|v| v.map(parse_bool).transpose()),
    );

    match (title, publish_date, read_count, comment_count, is_deleted) {
        (
            Some(title),
            Some(publish_date),
            Some(read_count),
            Some(comment_count),
            Some(is_deleted),
        ) => Ok(BookFields {
            title,
            publish_date,
            read_count,
            comment_count,
            is_deleted,
        }),
        _ => Err(errors.into_error()),
    }
}

/// Validate the body of the `read` action: `read_count` only.
pub fn validate_read_count(data: &Value) -> Result<u64, ValidationError> {
    let object = as_object(data)?;
    let mut errors = Collector::default();
    errors
        .take(
            "read_count",
            require(object, "read_count").and_then(parse_count),
        )
        .ok_or_else(|| errors.into_error())
}

fn as_object(data: &Value) -> Result<&Map<String, Value>, ValidationError> {
    data.as_object().ok_or_else(|| {
        let mut errors = Collector::default();
        errors.take::<()>(
            "non_field_errors",
            Err(format!(
                "Invalid data. Expected a dictionary, but got {}.",
                kind(data)
            )),
        );
        errors.into_error()
    })
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn require<'a>(object: &'a Map<String, Value>, name: &str) -> Result<&'a Value, String> {
    match object.get(name) {
        None => Err(REQUIRED.to_string()),
        Some(Value::Null) => Err(NOT_NULL.to_string()),
        Some(value) => Ok(value),
    }
}

fn optional<'a>(object: &'a Map<String, Value>, name: &str) -> Result<Option<&'a Value>, String> {
    match object.get(name) {
        None => Ok(None),
        Some(Value::Null) => Err(NOT_NULL.to_string()),
        Some(value) => Ok(Some(value)),
    }
}

fn parse_title(value: &Value) -> Result<String, String> {
    let title = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return Err(NOT_STRING.to_string()),
    };
    if title.is_empty() {
        return Err(NOT_BLANK.to_string());
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(format!(
            "Ensure this field has no more than {} characters.",
            TITLE_MAX_CHARS
        ));
    }
    Ok(title)
}

/// `[year]` also takes a leading `+` or `-`; only bare `YYYY` is accepted.
fn parse_date(value: &Value) -> Result<Date, String> {
    value
        .as_str()
        .map(str::trim)
        .filter(|s| s.starts_with(|c: char| c.is_ascii_digit()))
        .and_then(|s| Date::parse(s, DATE_FORMAT).ok())
        .ok_or_else(|| BAD_DATE.to_string())
}

fn parse_count(value: &Value) -> Result<u64, String> {
    let whole: i128 = match value {
        Value::Number(n) => {
            if let Some(unsigned) = n.as_u64() {
                return Ok(unsigned);
            }
            match (n.as_i64(), n.as_f64()) {
                (Some(signed), _) => i128::from(signed),
                // 5.0 counts as an integer, 5.5 does not
                (None, Some(float)) if float.fract() == 0.0 && float.abs() < 1e18 => {
                    float as i128
                }
                _ => return Err(BAD_INTEGER.to_string()),
            }
        }
        Value::String(s) => s
            .trim()
            .parse::<i128>()
            .map_err(|_| BAD_INTEGER.to_string())?,
        _ => return Err(BAD_INTEGER.to_string()),
    };
    u64::try_from(whole).map_err(|_| {
        if whole < 0 {
            NEGATIVE.to_string()
        } else {
            BAD_INTEGER.to_string()
        }
    })
}

fn parse_bool(value: &Value) -> Result<bool, String> {
    match value {
        Value::Bool(b) => Ok(*b),
        Value::Number(n) => match n.as_u64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(BAD_BOOLEAN.to_string()),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(BAD_BOOLEAN.to_string()),
        },
        _ => Err(BAD_BOOLEAN.to_string()),
    }
}

fn format_date(date: Date) -> String {
    // Writing into a String cannot fail; Display renders the same layout.
    date.format(DATE_FORMAT).unwrap_or_else(|_| date.to_string())
}
