//! Endpoint tests for the message API, driven through the router with
//! `tower::ServiceExt::oneshot` against an in-memory database.

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use serde_json::{Value, json};
use tower::util::ServiceExt;

use ode_api::{AppStateInner, build_router};
use ode_db::Database;

fn setup_app() -> Router {
    let db = Database::open_in_memory().expect("in-memory database");
    build_router(Arc::new(AppStateInner { db }))
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX).await.expect("read body");
    serde_json::from_slice(&bytes).expect("parse JSON")
}

#[tokio::test]
async fn health_reports_database_status() {
    let app = setup_app();

    let response = app.oneshot(get("/api/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["status"], "Database connection successful");
}

#[tokio::test]
async fn list_returns_seed_message_with_embedded_song() {
    let app = setup_app();

    let response = app.oneshot(get("/api/messages")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response.into_body()).await;
    let messages = body.as_array().expect("array body");
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["recipient"], "Ode Team");
    assert_eq!(messages[0]["song"]["id"], "1");
    assert_eq!(messages[0]["song"]["title"], "Always");
    assert_eq!(messages[0]["song"]["artist"], "Bon Jovi");
}

#[tokio::test]
async fn get_by_id_returns_404_when_absent() {
    let app = setup_app();

    let response = app.oneshot(get("/api/messages/no-such-id")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body = body_json(response.into_body()).await;
    assert_eq!(body["error"], "Message not found");
}

#[tokio::test]
async fn create_then_fetch_round_trip() {
    let app = setup_app();

    let response = app
        .clone()
        .oneshot(post_json(
            "/api/messages",
            json!({
                "recipient": "Ani",
                "message": "Always.",
                "song": {"id": "99", "title": "Song X", "artist": "Artist Y"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response.into_body()).await;
    let id = created["id"].as_str().expect("generated id").to_string();
    assert!(!id.is_empty());
    assert_eq!(created["song"]["id"], "99");
    assert!(created["date"].as_str().is_some());

    let response = app
        .clone()
        .oneshot(get(&format!("/api/messages/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = body_json(response.into_body()).await;
    assert_eq!(fetched, created);

    // Substring search by recipient includes it; a non-matching fragment does not.
    let response = app.clone().oneshot(get("/api/messages/search/An")).await.unwrap();
    let hits = body_json(response.into_body()).await;
    assert!(
        hits.as_array()
            .unwrap()
            .iter()
            .any(|m| m["id"].as_str() == Some(&id))
    );

    let response = app.oneshot(get("/api/messages/search/Zz")).await.unwrap();
    let hits = body_json(response.into_body()).await;
    assert!(
        hits.as_array()
            .unwrap()
            .iter()
            .all(|m| m["id"].as_str() != Some(&id))
    );
}

#[tokio::test]
async fn create_rejects_missing_fields() {
    let cases = [
        json!({"message": "m", "song": {"id": "1"}}),
        json!({"recipient": "r", "song": {"id": "1"}}),
        json!({"recipient": "r", "message": "m"}),
        json!({"recipient": "r", "message": "m", "song": {"title": "no id"}}),
        json!({"recipient": "", "message": "m", "song": {"id": "1"}}),
    ];

    for body in cases {
        let app = setup_app();
        let response = app
            .clone()
            .oneshot(post_json("/api/messages", body.clone()))
            .await
            .unwrap();
        assert_eq!(
            response.status(),
            StatusCode::BAD_REQUEST,
            "expected 400 for {}",
            body
        );

        let err = body_json(response.into_body()).await;
        assert_eq!(err["error"], "Missing required fields");

        // No partial writes: only the seed message exists.
        let response = app.oneshot(get("/api/messages")).await.unwrap();
        let messages = body_json(response.into_body()).await;
        assert_eq!(messages.as_array().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn create_reuses_stored_song_metadata() {
    let app = setup_app();

    // Song id "1" is seeded as "Always" / "Bon Jovi"; the caller's metadata
    // for the same id must be ignored in favor of the stored row.
    let response = app
        .clone()
        .oneshot(post_json(
            "/api/messages",
            json!({
                "recipient": "Someone",
                "message": "hello",
                "song": {"id": "1", "title": "Imposter", "artist": "Nobody"}
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let created = body_json(response.into_body()).await;
    assert_eq!(created["song"]["title"], "Always");
    assert_eq!(created["song"]["artist"], "Bon Jovi");
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = setup_app();

    for i in 0..3 {
        let response = app
            .clone()
            .oneshot(post_json(
                "/api/messages",
                json!({
                    "recipient": format!("r{}", i),
                    "message": "m",
                    "song": {"id": "42", "title": "T", "artist": "A"}
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app.oneshot(get("/api/messages")).await.unwrap();
    let body = body_json(response.into_body()).await;
    let dates: Vec<String> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|m| m["date"].as_str().unwrap().to_string())
        .collect();

    let mut sorted = dates.clone();
    sorted.sort_by(|a, b| b.cmp(a));
    assert_eq!(dates, sorted);
}
