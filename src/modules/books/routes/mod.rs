//! The books route table.
//!
//! [`ROUTES`] is the only place verbs and paths are declared; the axum router,
//! the CLI listing and the OpenAPI paths are all derived from it.

use axum::{
    routing::{on, MethodFilter, MethodRouter},
    Router,
};
use serde_json::{json, Map, Value};
use shelf_kernel::RouteInfo;

use super::handlers::{self, SharedStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

impl Verb {
    pub const fn as_str(self) -> &'static str {
        match self {
            Verb::Get => "GET",
            Verb::Post => "POST",
            Verb::Put => "PUT",
            Verb::Delete => "DELETE",
        }
    }

    fn filter(self) -> MethodFilter {
        match self {
            Verb::Get => MethodFilter::GET,
            Verb::Post => MethodFilter::POST,
            Verb::Put => MethodFilter::PUT,
            Verb::Delete => MethodFilter::DELETE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BookAction {
    List,
    Create,
    Latest,
    Retrieve,
    Update,
    Destroy,
    Read,
}

impl BookAction {
    pub const fn name(self) -> &'static str {
        match self {
            BookAction::List => "list",
            BookAction::Create => "create",
            BookAction::Latest => "latest",
            BookAction::Retrieve => "retrieve",
            BookAction::Update => "update",
            BookAction::Destroy => "destroy",
            BookAction::Read => "read",
        }
    }

    fn summary(self) -> &'static str {
        match self {
            BookAction::List => "List books",
            BookAction::Create => "Create a book",
            BookAction::Latest => "Most recently created book",
            BookAction::Retrieve => "Get a book",
            BookAction::Update => "Replace a book",
            BookAction::Destroy => "Delete a book",
            BookAction::Read => "Set a book's read count",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub verb: Verb,
    pub path: &'static str,
    pub action: BookAction,
}

const fn route(verb: Verb, path: &'static str, action: BookAction) -> Route {
    Route { verb, path, action }
}

pub const ROUTES: &[Route] = &[
    route(Verb::Get, "/books", BookAction::List),
    route(Verb::Post, "/books", BookAction::Create),
    route(Verb::Get, "/books/latest", BookAction::Latest),
    route(Verb::Get, "/books/{id}", BookAction::Retrieve),
    route(Verb::Put, "/books/{id}", BookAction::Update),
    route(Verb::Delete, "/books/{id}", BookAction::Destroy),
    route(Verb::Put, "/books/{id}/read", BookAction::Read),
];

impl Route {
    fn method_router(&self) -> MethodRouter<SharedStore> {
        let filter = self.verb.filter();
        match self.action {
            BookAction::List => on(filter, handlers::list),
            BookAction::Create => on(filter, handlers::create),
            BookAction::Latest => on(filter, handlers::latest),
            BookAction::Retrieve => on(filter, handlers::retrieve),
            BookAction::Update => on(filter, handlers::update),
            BookAction::Destroy => on(filter, handlers::destroy),
            BookAction::Read => on(filter, handlers::read),
        }
    }

    pub fn info(&self) -> RouteInfo {
        RouteInfo {
            method: self.verb.as_str(),
            path: self.path,
            action: self.action.name(),
        }
    }
}

/// Build the books router from [`ROUTES`]. Routes sharing a path merge into
/// one method router.
pub fn router(store: SharedStore) -> Router {
    ROUTES
        .iter()
        .fold(Router::<SharedStore>::new(), |router, route| {
            router.route(route.path, route.method_router())
        })
        .with_state(store)
}

pub fn describe() -> Vec<RouteInfo> {
    ROUTES.iter().map(Route::info).collect()
}

/// OpenAPI `paths` object for [`ROUTES`].
pub fn openapi_paths() -> Value {
    let mut paths = Map::new();
    for route in ROUTES {
        let item = paths
            .entry(route.path)
            .or_insert_with(|| Value::Object(Map::new()));
        item[route.verb.as_str().to_ascii_lowercase()] = operation(route.action, route.path);
    }
    Value::Object(paths)
}

fn operation(action: BookAction, path: &str) -> Value {
    let book = json!({
        "description": "Book",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Book" } } }
    });
    let field_errors = json!({
        "description": "Validation failed",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/FieldErrors" } } }
    });
    let not_found = json!({
        "description": "Not found",
        "content": { "application/json": { "schema": { "$ref": "#/components/schemas/ErrorResponse" } } }
    });

    let mut responses = Map::new();
    match action {
        BookAction::List => {
            responses.insert(
                "200".into(),
                json!({
                    "description": "List of books",
                    "content": { "application/json": { "schema": {
                        "type": "array",
                        "items": { "$ref": "#/components/schemas/Book" }
                    } } }
                }),
            );
        }
        BookAction::Create => {
            responses.insert("201".into(), book);
            responses.insert("400".into(), field_errors);
        }
        BookAction::Latest | BookAction::Retrieve => {
            responses.insert("200".into(), book);
            responses.insert("404".into(), not_found);
        }
        BookAction::Update | BookAction::Read => {
            responses.insert("200".into(), book);
            responses.insert("400".into(), field_errors);
            responses.insert("404".into(), not_found);
        }
        BookAction::Destroy => {
            responses.insert("204".into(), json!({ "description": "Deleted" }));
            responses.insert("404".into(), not_found);
        }
    }

    let mut op = json!({
        "summary": action.summary(),
        "operationId": format!("books_{}", action.name()),
        "tags": ["Books"],
        "responses": responses,
    });

    if path.contains("{id}") {
        op["parameters"] = json!([{
            "name": "id",
            "in": "path",
            "required": true,
            "schema": { "type": "integer", "format": "int64" }
        }]);
    }

    let request_schema = match action {
        BookAction::Create | BookAction::Update => Some("BookInput"),
        BookAction::Read => Some("ReadCountInput"),
        _ => None,
    };
    if let Some(schema) = request_schema {
        op["requestBody"] = json!({
            "required": true,
            "content": { "application/json": { "schema": {
                "$ref": format!("#/components/schemas/{}", schema)
            } } }
        });
    }

    op
}
