use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use serde_json::Value;
use shelf_db::{BookId, BookStore, StoreError};
use shelf_http::error::AppError;

use super::models::BookRepr;
use super::serializer;

pub type SharedStore = Arc<dyn BookStore>;

type ItemId = Result<Path<BookId>, PathRejection>;
type Body = Result<Json<Value>, JsonRejection>;

/// An id segment that is not an integer matches no book.
fn book_id(path: ItemId) -> Result<BookId, AppError> {
    path.map(|Path(id)| id).map_err(|rejection| {
        tracing::debug!(reason = %rejection.body_text(), "unroutable book id");
        AppError::not_found("Not found.")
    })
}

fn json_body(body: Body) -> Result<Value, AppError> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::bad_request(rejection.body_text()))
}

fn store_error(err: StoreError) -> AppError {
    match err {
        StoreError::NotFound(_) | StoreError::Empty => AppError::not_found(err.to_string()),
    }
}

/// `GET /books`
pub async fn list(State(store): State<SharedStore>) -> Result<Json<Vec<BookRepr>>, AppError> {
    let books = store.list_all().await.map_err(store_error)?;
    Ok(Json(serializer::represent_all(&books)))
}

/// `POST /books`
pub async fn create(
    State(store): State<SharedStore>,
    body: Body,
) -> Result<(StatusCode, Json<BookRepr>), AppError> {
    let fields = serializer::validate(&json_body(body)?)?;
    let book = store.create(fields).await.map_err(store_error)?;
    tracing::info!(book_id = book.id, "book created");
    Ok((StatusCode::CREATED, Json(serializer::represent(&book))))
}

/// `GET /books/latest`
pub async fn latest(State(store): State<SharedStore>) -> Result<Json<BookRepr>, AppError> {
    let book = store.latest().await.map_err(store_error)?;
    Ok(Json(serializer::represent(&book)))
}

/// `GET /books/{id}`
pub async fn retrieve(
    State(store): State<SharedStore>,
    id: ItemId,
) -> Result<Json<BookRepr>, AppError> {
    let book = store.get(book_id(id)?).await.map_err(store_error)?;
    Ok(Json(serializer::represent(&book)))
}

/// `PUT /books/{id}`: existence is checked before the body is looked at.
pub async fn update(
    State(store): State<SharedStore>,
    id: ItemId,
    body: Body,
) -> Result<Json<BookRepr>, AppError> {
    let id = book_id(id)?;
    store.get(id).await.map_err(store_error)?;

    let fields = serializer::validate(&json_body(body)?)?;
    let book = store.update(id, fields).await.map_err(store_error)?;
    tracing::info!(book_id = id, "book updated");
    Ok(Json(serializer::represent(&book)))
}

/// `DELETE /books/{id}`
pub async fn destroy(State(store): State<SharedStore>, id: ItemId) -> Result<StatusCode, AppError> {
    let id = book_id(id)?;
    store.delete(id).await.map_err(store_error)?;
    tracing::info!(book_id = id, "book deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// `PUT /books/{id}/read`: rewrites `read_count` and nothing else.
pub async fn read(
    State(store): State<SharedStore>,
    id: ItemId,
    body: Body,
) -> Result<Json<BookRepr>, AppError> {
    let id = book_id(id)?;
    let read_count = serializer::validate_read_count(&json_body(body)?)?;
    let book = store
        .set_read_count(id, read_count)
        .await
        .map_err(store_error)?;
    tracing::info!(book_id = id, read_count, "book read count updated");
    Ok(Json(serializer::represent(&book)))
}
