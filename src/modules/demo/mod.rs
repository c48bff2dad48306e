//! Small request-handling demonstrations: plain text, typed path segments,
//! repeated query keys, form and JSON bodies, and request headers.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::{rejection::JsonRejection, Path, Query},
    http::{header, HeaderMap},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use shelf_http::error::AppError;
use shelf_kernel::{Module, RouteInfo};

const DEMO_ROUTES: &[RouteInfo] = &[
    RouteInfo {
        method: "GET",
        path: "/index",
        action: "index",
    },
    RouteInfo {
        method: "GET",
        path: "/weather/{city}/{year}",
        action: "weather",
    },
    RouteInfo {
        method: "GET",
        path: "/qs",
        action: "query_string",
    },
    RouteInfo {
        method: "POST",
        path: "/body",
        action: "form_body",
    },
    RouteInfo {
        method: "POST",
        path: "/body_json",
        action: "echo_json",
    },
    RouteInfo {
        method: "GET",
        path: "/get_user",
        action: "get_user",
    },
    RouteInfo {
        method: "GET",
        path: "/demo_view",
        action: "demo_view",
    },
];

pub struct DemoModule;

impl DemoModule {
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Module for DemoModule {
    fn name(&self) -> &'static str {
        "demo"
    }

    fn routes(&self) -> Router {
        Router::new()
            .route("/index", get(index))
            .route("/weather/{city}/{year}", get(weather))
            .route("/qs", get(query_string))
            .route("/body", post(form_body))
            .route("/body_json", post(echo_json))
            .route("/get_user", get(get_user))
            .route("/demo_view", get(demo_view))
    }

    fn describe_routes(&self) -> Vec<RouteInfo> {
        DEMO_ROUTES.to_vec()
    }

    fn openapi(&self) -> Option<Value> {
        let mut paths = serde_json::Map::new();
        for route in DEMO_ROUTES {
            let mut item = serde_json::Map::new();
            item.insert(
                route.method.to_ascii_lowercase(),
                json!({
                    "summary": route.action,
                    "tags": ["Demo"],
                    "responses": { "200": { "description": "OK" } }
                }),
            );
            paths.insert(route.path.to_string(), Value::Object(item));
        }
        Some(json!({ "paths": paths }))
    }
}

async fn index() -> &'static str {
    "hello the world!"
}

#[derive(Debug, Serialize)]
struct Weather {
    city: String,
    year: u16,
}

/// `city` must be lowercase ASCII letters and `year` exactly four digits;
/// anything else is treated as an unmatched route.
async fn weather(Path((city, year)): Path<(String, String)>) -> Result<Json<Weather>, AppError> {
    let city_ok = !city.is_empty() && city.bytes().all(|b| b.is_ascii_lowercase());
    let year_ok = year.len() == 4 && year.bytes().all(|b| b.is_ascii_digit());
    if !city_ok || !year_ok {
        return Err(AppError::not_found("Not found."));
    }

    let year: u16 = year
        .parse()
        .map_err(|_| AppError::not_found("Not found."))?;
    tracing::debug!(%city, year, "weather lookup");
    Ok(Json(Weather { city, year }))
}

#[derive(Debug, Serialize, PartialEq)]
struct QueryEcho {
    a: Option<String>,
    b: Option<String>,
    a_list: Vec<String>,
}

/// Repeated keys keep every value; the single-value view is the last one.
async fn query_string(Query(pairs): Query<Vec<(String, String)>>) -> Json<QueryEcho> {
    Json(collect_query(pairs))
}

fn collect_query(pairs: Vec<(String, String)>) -> QueryEcho {
    let values = |key: &str| -> Vec<String> {
        pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
            .collect()
    };
    let a_list = values("a");
    QueryEcho {
        a: a_list.last().cloned(),
        b: values("b").pop(),
        a_list,
    }
}

/// Same shape as `/qs`, read from an urlencoded form body.
async fn form_body(Form(pairs): Form<Vec<(String, String)>>) -> Json<QueryEcho> {
    Json(collect_query(pairs))
}

#[derive(Debug, Serialize)]
struct RequestInfo {
    content_type: Option<String>,
    user: &'static str,
}

/// There is no login, so every caller is anonymous.
async fn get_user(headers: HeaderMap) -> Json<RequestInfo> {
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    Json(RequestInfo {
        content_type,
        user: "anonymous",
    })
}

async fn echo_json(body: Result<Json<Value>, JsonRejection>) -> Result<Json<Value>, AppError> {
    let Json(value) = body.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    Ok(Json(value))
}

async fn demo_view() -> Json<Value> {
    Json(json!({"city": "beijing", "subject": "python"}))
}

pub fn create_module() -> Arc<dyn Module> {
    Arc::new(DemoModule::new())
}
