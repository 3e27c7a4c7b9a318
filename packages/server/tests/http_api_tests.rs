//! Integration tests for the HTTP API, driven through the router without
//! binding a socket.

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::common::memory_deps;
use server_core::server::build_app;

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header(CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
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

async fn create_publisher(app: &Router, handle: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/publishers",
        Some(json!({ "account_handle": handle })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = build_app(memory_deps());
    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"]["status"], "ok");
}

#[tokio::test]
async fn publication_round_trip_over_http() {
    let app = build_app(memory_deps());
    let alice = create_publisher(&app, "alice").await;
    let bob = create_publisher(&app, "bob").await;

    let (status, created) = send(
        &app,
        Method::POST,
        "/api/publications",
        Some(json!({
            "publisher_id": alice,
            "body": "Check @bob re #launch",
            "created_at": "2024-03-02T00:00:00Z",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["publisher_id"], alice.as_str());
    assert_eq!(created["mentions"], json!([bob]));
    assert_eq!(created["tags"][0]["name"], "launch");

    let publication_id = created["id"].as_str().unwrap().to_string();
    let tag_id = created["tags"][0]["id"].as_str().unwrap().to_string();

    let uri = format!("/api/publications/tag/{}", tag_id);
    let (status, by_tag) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(by_tag.as_array().unwrap().len(), 1);
    assert_eq!(by_tag[0]["id"], publication_id.as_str());

    let (status, mentions) =
        send(&app, Method::GET, &format!("/api/publications/mentions/{}", bob), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mentions[0]["id"], publication_id.as_str());

    let (status, faved) = send(
        &app,
        Method::PUT,
        &format!("/api/publications/faved/{}/{}", publication_id, bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(faved["faved_by"], json!([bob]));

    let uri = format!("/api/publications/{}", publication_id);
    let (status, _) = send(&app, Method::DELETE, &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn follow_routes_take_followed_then_follower() {
    let app = build_app(memory_deps());
    let alice = create_publisher(&app, "alice").await;
    let bob = create_publisher(&app, "bob").await;

    // bob follows alice
    let (status, view) = send(
        &app,
        Method::PUT,
        &format!("/api/publishers/follow/{}/{}", alice, bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["id"], bob.as_str());
    assert_eq!(view["follows"], json!([alice]));

    let uri = format!("/api/publishers/{}/followers", alice);
    let (_, followers) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(followers[0]["id"], bob.as_str());
    let uri = format!("/api/publishers/{}/follows", bob);
    let (_, follows) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(follows[0]["id"], alice.as_str());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/publishers/follow/{}/{}", alice, bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_relation");

    let (status, view) = send(
        &app,
        Method::PUT,
        &format!("/api/publishers/unfollow/{}/{}", alice, bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(view["follows"], json!([]));
}

#[tokio::test]
async fn error_statuses() {
    let app = build_app(memory_deps());
    let alice = create_publisher(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/publishers/follow/{}/{}", alice, alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"], "self_reference");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/publishers",
        Some(json!({ "account_handle": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "duplicate_relation");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/publications",
        Some(json!({ "publisher_id": uuid::Uuid::now_v7(), "body": "hi" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation");

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/publishers/{}", uuid::Uuid::now_v7()),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn popular_tags_by_days() {
    let app = build_app(memory_deps());
    let alice = create_publisher(&app, "alice").await;

    // No created_at: stamped with the current time
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/publications",
        Some(json!({ "publisher_id": alice, "body": "#now" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    send(
        &app,
        Method::POST,
        "/api/publications",
        Some(json!({
            "publisher_id": alice,
            "body": "#ancient",
            "created_at": "2001-01-01T00:00:00Z",
        })),
    )
    .await;

    let (status, tags) = send(&app, Method::GET, "/api/tag_popular/7", None).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = tags
        .as_array()
        .unwrap()
        .iter()
        .map(|t| t["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["now"]);

    let (_, all) = send(&app, Method::GET, "/api/tags", None).await;
    assert_eq!(all.as_array().unwrap().len(), 2);
}
