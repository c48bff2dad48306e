use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use async_trait::async_trait;
use serde_json::{json, Value};
use shelf_db::{Book, BookFields, BookId, BookStore, MemoryStore, StoreResult};
use shelf_kernel::settings::Settings;
use tower::ServiceExt;

fn app() -> Router {
    let registry = shelf_app::build_registry_with_store(Arc::new(MemoryStore::new())).unwrap();
    shelf_http::build_router(&registry, &Settings::default())
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header("content-type", "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create(app: &Router, title: &str, date: &str) -> Value {
    let (status, body) = send(
        app,
        "POST",
        "/books",
        Some(json!({"title": title, "publish_date": date})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body
}

#[tokio::test]
async fn dune_lifecycle() {
    let app = app();

    let created = create(&app, "Dune", "1965-08-01").await;
    assert_eq!(
        created,
        json!({
            "id": 1,
            "title": "Dune",
            "publish_date": "1965-08-01",
            "read_count": 0,
            "comment_count": 0,
            "is_deleted": false
        })
    );

    let (status, fetched) = send(&app, "GET", "/books/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = send(
        &app,
        "PUT",
        "/books/1",
        Some(json!({"title": "Dune (rev)", "publish_date": "1965-08-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Dune (rev)");
    assert_eq!(updated["id"], 1);

    let (status, body) = send(&app, "DELETE", "/books/1", None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);

    let (status, _) = send(&app, "GET", "/books/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn created_ids_are_fresh_and_listed_in_order() {
    let app = app();
    let first = create(&app, "Emma", "1815-12-23").await;
    let second = create(&app, "Ulysses", "1922-02-02").await;
    assert_ne!(first["id"], second["id"]);

    let (status, list) = send(&app, "GET", "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([first, second]));
}

#[tokio::test]
async fn empty_collection_lists_as_empty_array() {
    let (status, list) = send(&app(), "GET", "/books", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn unknown_ids_are_not_found() {
    let app = app();
    create(&app, "Dune", "1965-08-01").await;

    for method in ["GET", "DELETE"] {
        let (status, body) = send(&app, method, "/books/42", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{method}");
        assert_eq!(body["error"]["code"], "not_found");
    }

    let (status, _) = send(
        &app,
        "PUT",
        "/books/42",
        Some(json!({"title": "x", "publish_date": "2000-01-01"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "PUT", "/books/42/read", Some(json!({"read_count": 1}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_not_found() {
    let (status, _) = send(&app(), "GET", "/books/abc", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn put_on_missing_book_is_404_even_with_invalid_body() {
    let (status, _) = send(&app(), "PUT", "/books/7", Some(json!({"title": ""}))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn create_rejects_long_title_and_missing_date() {
    let app = app();
    let (status, body) = send(
        &app,
        "POST",
        "/books",
        Some(json!({"title": "An Extremely Long Book Title"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({
            "publish_date": ["This field is required."],
            "title": ["Ensure this field has no more than 20 characters."]
        })
    );

    let (_, list) = send(&app, "GET", "/books", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/books")
                .header("content-type", "application/json")
                .body(Body::from("{\"title\": "))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_validates_body() {
    let app = app();
    create(&app, "Dune", "1965-08-01").await;

    let (status, body) = send(
        &app,
        "PUT",
        "/books/1",
        Some(json!({"title": "Dune", "publish_date": "August 1965"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["publish_date"].is_array());

    let (_, unchanged) = send(&app, "GET", "/books/1", None).await;
    assert_eq!(unchanged["publish_date"], "1965-08-01");
}

#[tokio::test]
async fn read_changes_only_read_count() {
    let app = app();
    let (_, created) = send(
        &app,
        "POST",
        "/books",
        Some(json!({
            "title": "Dune",
            "publish_date": "1965-08-01",
            "comment_count": 4
        })),
    )
    .await;

    let (status, body) = send(&app, "PUT", "/books/1/read", Some(json!({"read_count": 5}))).await;
    assert_eq!(status, StatusCode::OK);

    let mut expected = created.clone();
    expected["read_count"] = json!(5);
    assert_eq!(body, expected);

    let (_, fetched) = send(&app, "GET", "/books/1", None).await;
    assert_eq!(fetched, expected);
}

/// Applies a competing title change right before every write it forwards.
struct RenameBeforeWrite {
    inner: MemoryStore,
}

impl RenameBeforeWrite {
    async fn rename(&self, id: BookId) {
        if let Ok(book) = self.inner.get(id).await {
            self.inner
                .update(id, BookFields::new("Concurrent", book.publish_date))
                .await
                .unwrap();
        }
    }
}

#[async_trait]
impl BookStore for RenameBeforeWrite {
    async fn list_all(&self) -> StoreResult<Vec<Book>> {
        self.inner.list_all().await
    }

    async fn get(&self, id: BookId) -> StoreResult<Book> {
        self.inner.get(id).await
    }

    async fn latest(&self) -> StoreResult<Book> {
        self.inner.latest().await
    }

    async fn create(&self, fields: BookFields) -> StoreResult<Book> {
        self.inner.create(fields).await
    }

    async fn update(&self, id: BookId, fields: BookFields) -> StoreResult<Book> {
        self.rename(id).await;
        self.inner.update(id, fields).await
    }

    async fn set_read_count(&self, id: BookId, read_count: u64) -> StoreResult<Book> {
        self.rename(id).await;
        self.inner.set_read_count(id, read_count).await
    }

    async fn delete(&self, id: BookId) -> StoreResult<()> {
        self.inner.delete(id).await
    }
}

#[tokio::test]
async fn read_keeps_a_title_change_that_lands_first() {
    let store = RenameBeforeWrite {
        inner: MemoryStore::with_books([BookFields::new(
            "Dune",
            time::macros::date!(1965 - 08 - 01),
        )]),
    };
    let registry = shelf_app::build_registry_with_store(Arc::new(store)).unwrap();
    let app = shelf_http::build_router(&registry, &Settings::default());

    let (status, body) = send(&app, "PUT", "/books/1/read", Some(json!({"read_count": 5}))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Concurrent");
    assert_eq!(body["read_count"], 5);

    let (_, fetched) = send(&app, "GET", "/books/1", None).await;
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn signed_years_are_rejected() {
    let app = app();
    for date in ["-0001-01-01", "+1965-08-01"] {
        let (status, body) = send(
            &app,
            "POST",
            "/books",
            Some(json!({"title": "Dune", "publish_date": date})),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{date}");
        assert!(body["publish_date"].is_array(), "{date}");
    }
}

#[tokio::test]
async fn represented_dates_are_accepted_back() {
    let app = app();
    let first = create(&app, "Early", "0001-01-01").await;
    assert_eq!(first["publish_date"], "0001-01-01");

    let again = create(&app, "Again", first["publish_date"].as_str().unwrap()).await;
    assert_eq!(again["publish_date"], first["publish_date"]);
}

#[tokio::test]
async fn read_requires_read_count() {
    let app = app();
    create(&app, "Dune", "1965-08-01").await;

    let (status, body) = send(&app, "PUT", "/books/1/read", Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"read_count": ["This field is required."]}));
}

#[tokio::test]
async fn latest_returns_highest_live_id() {
    let app = app();

    let (status, _) = send(&app, "GET", "/books/latest", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    create(&app, "Emma", "1815-12-23").await;
    create(&app, "Dune", "1965-08-01").await;
    let third = create(&app, "Ulysses", "1922-02-02").await;

    let (status, latest) = send(&app, "GET", "/books/latest", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(latest, third);

    send(&app, "DELETE", "/books/3", None).await;
    let (_, latest) = send(&app, "GET", "/books/latest", None).await;
    assert_eq!(latest["title"], "Dune");
}

#[tokio::test]
async fn is_deleted_flag_does_not_hide_books() {
    let app = app();
    send(
        &app,
        "POST",
        "/books",
        Some(json!({"title": "Gone", "publish_date": "2001-01-01", "is_deleted": true})),
    )
    .await;

    let (_, list) = send(&app, "GET", "/books", None).await;
    assert_eq!(list[0]["is_deleted"], true);
}

#[tokio::test]
async fn unsupported_method_is_rejected() {
    let (status, _) = send(&app(), "PATCH", "/books/1", None).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn routes_mount_under_configured_prefix() {
    let registry = shelf_app::build_registry().unwrap();
    let mut settings = Settings::default();
    settings.server.api_prefix = "/api".to_string();
    let app = shelf_http::build_router(&registry, &settings);

    let (status, _) = send(&app, "GET", "/api/books", None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, "GET", "/books", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn openapi_document_lists_book_paths() {
    let (status, doc) = send(&app(), "GET", "/docs/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/books/{id}/read"]["put"].is_object());
    assert!(doc["components"]["schemas"]["Book"].is_object());
}
