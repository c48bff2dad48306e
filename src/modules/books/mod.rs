pub mod handlers;
pub mod models;
pub mod routes;
pub mod serializer;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use serde_json::json;
use shelf_kernel::{InitCtx, Module, RouteInfo};

use handlers::SharedStore;

/// Book catalogue: collection and item endpoints over a [`SharedStore`]
pub struct BooksModule {
    store: SharedStore,
}

impl BooksModule {
    pub fn new(store: SharedStore) -> Self {
        Self { store }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let existing = self.store.list_all().await?.len();
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            existing,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(Arc::clone(&self.store))
    }

    fn describe_routes(&self) -> Vec<RouteInfo> {
        routes::describe()
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(json!({
            "paths": routes::openapi_paths(),
            "components": {
                "schemas": {
                    "Book": {
                        "type": "object",
                        "properties": {
                            "id": { "type": "integer", "format": "int64" },
                            "title": { "type": "string", "maxLength": serializer::TITLE_MAX_CHARS },
                            "publish_date": { "type": "string", "format": "date" },
                            "read_count": { "type": "integer", "minimum": 0 },
                            "comment_count": { "type": "integer", "minimum": 0 },
                            "is_deleted": { "type": "boolean" }
                        },
                        "required": serializer::BOOK_FIELDS
                    },
                    "BookInput": {
                        "type": "object",
                        "properties": {
                            "title": { "type": "string", "maxLength": serializer::TITLE_MAX_CHARS },
                            "publish_date": { "type": "string", "format": "date" },
                            "read_count": { "type": "integer", "minimum": 0 },
                            "comment_count": { "type": "integer", "minimum": 0 },
                            "is_deleted": { "type": "boolean" }
                        },
                        "required": ["title", "publish_date"]
                    },
                    "ReadCountInput": {
                        "type": "object",
                        "properties": {
                            "read_count": { "type": "integer", "minimum": 0 }
                        },
                        "required": ["read_count"]
                    }
                }
            }
        }))
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}

/// Create a new instance of the books module
pub fn create_module(store: SharedStore) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
