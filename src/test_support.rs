//! In-process stand-ins for the product API, bound to an ephemeral port.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{AppendHeaders, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use crate::config::Config;
use crate::models::{CreateItemRequest, Item, LoginRequest};

pub const MOCK_JWT_SECRET: &str = "mock-signing-key";
pub const MOCK_USER_ID: i64 = 1;
pub const MOCK_REFRESH_TOKEN: &str = "mock-refresh-token";
pub const MOCK_CREATED_ITEM_ID: i64 = 42;

/// Serve `router` on 127.0.0.1 and return its base URL
pub async fn spawn(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}", addr)
}

/// Default configuration pointed at a mock server
pub fn config(base_url: &str) -> Config {
    Config {
        base_url: base_url.to_string(),
        http_timeout_secs: 5,
        ..Config::default()
    }
}

/// Access token shaped like the ones the real login route issues
pub fn mint_access_token(user_id: i64) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = json!({
        "token_type": "access",
        "exp": now + 300,
        "iat": now,
        "jti": "3f0c5b1e6a2d4c8e9b7a1d2c3e4f5a6b",
        "user_id": user_id,
    });
    encode(&Header::default(), &claims, &EncodingKey::from_secret(MOCK_JWT_SECRET.as_bytes())).unwrap()
}

pub fn catalogue() -> Vec<Item> {
    vec![
        Item {
            id: 1,
            title: "Desk lamp".to_string(),
            category_id: 1,
            price: "10.00".to_string(),
            description: "warm light".to_string(),
            image_ids: vec![11],
        },
        Item {
            id: 2,
            title: "Road bike".to_string(),
            category_id: 2,
            price: "30.00".to_string(),
            description: "".to_string(),
            image_ids: vec![21, 22],
        },
        Item {
            id: 3,
            title: "Bookshelf".to_string(),
            category_id: 1,
            price: "20.00".to_string(),
            description: "oak".to_string(),
            image_ids: vec![],
        },
    ]
}

/// A well-behaved product API
pub fn product_api() -> Router {
    Router::new()
        .route("/usr/login", post(login))
        .route("/product/items", get(list_items))
        .route("/product/items/create", post(create_item))
        .route("/product/items/:item_id", get(get_item))
}

/// Login succeeds without cookies; everything else is a server error
pub fn failing_api() -> Router {
    let boom = || async { (StatusCode::INTERNAL_SERVER_ERROR, "boom") };
    Router::new()
        .route("/usr/login", post(|| async { Json(json!({"detail": "User logged in successfully."})) }))
        .route("/product/items", get(boom))
        .route("/product/items/create", post(boom))
        .route("/product/items/:item_id", get(boom))
}

/// Answers 200 with bodies that are not the expected JSON
pub fn garbled_api() -> Router {
    let garbage = || async { (StatusCode::OK, "<html>not json</html>") };
    Router::new()
        .route("/product/items", get(garbage))
        .route("/product/items/:item_id", get(garbage))
}

/// Host headers seen by the recording API, one entry per request
pub type SeenHosts = Arc<Mutex<Vec<Option<String>>>>;

/// Listing route that records the Host header of every request it serves
pub fn host_recording_api() -> (Router, SeenHosts) {
    let seen = SeenHosts::default();
    let recorder = seen.clone();
    let router = Router::new().route(
        "/product/items",
        get(move |headers: HeaderMap, query: Query<HashMap<String, String>>| {
            let host = headers
                .get(header::HOST)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string);
            recorder.lock().unwrap().push(host);
            list_items(query)
        }),
    );
    (router, seen)
}

async fn login(Json(request): Json<LoginRequest>) -> Response {
    let expected = Config::default();
    if request.email != expected.test_user_email || request.password != expected.test_user_password {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "No active account found with the given credentials"})),
        )
            .into_response();
    }

    let access = mint_access_token(MOCK_USER_ID);
    (
        StatusCode::OK,
        AppendHeaders([
            (header::SET_COOKIE, format!("access={}; HttpOnly; Path=/; SameSite=Strict; Secure", access)),
            (header::SET_COOKIE, format!("refresh={}; HttpOnly; Path=/; SameSite=Strict; Secure", MOCK_REFRESH_TOKEN)),
        ]),
        Json(json!({"detail": "User logged in successfully."})),
    )
        .into_response()
}

async fn list_items(Query(params): Query<HashMap<String, String>>) -> Json<serde_json::Value> {
    let items: Vec<Item> = catalogue()
        .into_iter()
        .filter(|item| match params.get("search") {
            Some(term) => item.title.to_lowercase().contains(&term.to_lowercase()),
            None => true,
        })
        .collect();

    Json(json!({
        "count": items.len(),
        "next": null,
        "previous": null,
        "results": { "items": items, "max_price": 30.0 },
    }))
}

async fn get_item(Path(item_id): Path<i64>) -> Response {
    match catalogue().into_iter().find(|item| item.id == item_id) {
        Some(item) => Json(item).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "item not found."}))).into_response(),
    }
}

async fn create_item(headers: HeaderMap, Json(_request): Json<CreateItemRequest>) -> Response {
    let has_access_cookie = headers
        .get(header::COOKIE)
        .and_then(|value| value.to_str().ok())
        .map(|raw| {
            cookie::Cookie::split_parse(raw)
                .filter_map(Result::ok)
                .any(|c| c.name() == "access" && !c.value().is_empty())
        })
        .unwrap_or(false);

    if !has_access_cookie {
        return (
            StatusCode::FORBIDDEN,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        )
            .into_response();
    }

    (StatusCode::CREATED, Json(json!({"item_id": MOCK_CREATED_ITEM_ID}))).into_response()
}
