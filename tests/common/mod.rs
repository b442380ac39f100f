#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use em_inventory::app::{AppState, build_router};
use em_inventory::config::{AppConfig, database};
use em_inventory::core::user::{self, NewUser};
use tower::ServiceExt;

pub const PASSWORD: &str = "password123";

/// Router over a fresh in-memory database holding one admin and one technician.
pub async fn test_app() -> Router {
    let db = sea_orm::Database::connect("sqlite::memory:")
        .await
        .expect("connect");
    database::create_tables(&db).await.expect("tables");
    for (email, role) in [
        ("admin@example.com", "admin"),
        ("tech@example.com", "technician"),
    ] {
        user::create_user(
            &db,
            NewUser {
                email: email.to_string(),
                display_name: format!("Test {role}"),
                role: role.to_string(),
                password: Some(PASSWORD.to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("user");
    }
    build_router(AppState::new(db, AppConfig::default()))
}

pub fn json_request(
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request")
}

pub async fn read_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    serde_json::from_slice(&bytes).expect("json")
}

/// Sends a request and returns the status with the parsed body (`Null` when empty).
pub async fn send(
    app: &Router,
    request: Request<Body>,
) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    let body = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).expect("json")
    };
    (status, body)
}

pub async fn login(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        json_request(
            "POST",
            "/v1/auth/login",
            None,
            Some(serde_json::json!({ "email": email, "password": PASSWORD })),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().expect("token").to_string()
}
