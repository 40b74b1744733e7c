//! In-process stand-in for the blog mock and the Pokémon API, reproducing the
//! quirks the built-in suites pin.

use axum::extract::Path;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{any, get};
use axum::{Json, Router};
use crate::case::catalog::POST_ONE_BODY;
use serde_json::{json, Map, Value};
use std::time::Duration;

const POST_COUNT: u64 = 100;

pub async fn spawn_stub() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router()).await;
    });
    format!("http://{}", addr)
}

/// URL of a local port nothing listens on.
pub fn closed_port_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}", addr)
}

fn router() -> Router {
    Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/:id",
            get(get_post).put(put_post).patch(patch_post).delete(delete_post),
        )
        .route("/drifting/posts/:id", get(get_post).patch(drifting_patch_post))
        .route("/pokemon/:name", get(get_pokemon))
        .route("/slow", get(slow))
        .route("/text", get(text))
        .route("/echo-headers", any(echo_headers))
}

fn post(id: u64) -> Value {
    json!({
        "userId": (id - 1) / 10 + 1,
        "id": id,
        "title": format!("title {}", id),
        "body": if id == 1 { POST_ONE_BODY.to_string() } else { format!("body {}", id) },
    })
}

fn merge(mut target: Value, patch: Value) -> Value {
    if let (Value::Object(target_map), Value::Object(patch_map)) = (&mut target, patch) {
        for (key, value) in patch_map {
            target_map.insert(key, value);
        }
    }
    target
}

fn undefined_post() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "TypeError: Cannot read properties of undefined (reading 'id')",
    )
        .into_response()
}

async fn list_posts() -> Json<Value> {
    Json(Value::Array((1..=POST_COUNT).map(post).collect()))
}

async fn get_post(Path(id): Path<u64>) -> Response {
    if (1..=POST_COUNT).contains(&id) {
        Json(post(id)).into_response()
    } else {
        (StatusCode::NOT_FOUND, Json(json!({}))).into_response()
    }
}

async fn create_post(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    (StatusCode::CREATED, Json(merge(body, json!({"id": POST_COUNT + 1}))))
}

async fn put_post(Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    if (1..=POST_COUNT).contains(&id) {
        Json(merge(body, json!({"id": id}))).into_response()
    } else {
        undefined_post()
    }
}

async fn patch_post(Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    if (1..=POST_COUNT).contains(&id) {
        Json(merge(post(id), body)).into_response()
    } else {
        Json(body).into_response()
    }
}

/// A PATCH that clobbers fields it was not asked to change.
async fn drifting_patch_post(Path(id): Path<u64>, Json(body): Json<Value>) -> Response {
    let mut patched = merge(post(id), body);
    patched["body"] = json!("");
    Json(patched).into_response()
}

async fn delete_post(Path(_id): Path<u64>) -> Json<Value> {
    Json(json!({}))
}

async fn get_pokemon(Path(name): Path<String>) -> Response {
    match name.as_str() {
        "pikachu" | "25" => Json(json!({
            "id": 25,
            "name": "pikachu",
            "types": [{"slot": 1, "type": {"name": "electric"}}],
        }))
        .into_response(),
        _ => (StatusCode::NOT_FOUND, "Not Found").into_response(),
    }
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_secs(2)).await;
    "late"
}

async fn text() -> &'static str {
    "plain text body"
}

async fn echo_headers(headers: HeaderMap) -> Json<Value> {
    let echoed: Map<String, Value> = headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                Value::String(value.to_str().unwrap_or_default().to_string()),
            )
        })
        .collect();
    Json(Value::Object(echoed))
}
