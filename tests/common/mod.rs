// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::Response,
};
use community_portal::config::Config;
use community_portal::db::PortalDb;
use community_portal::routes::create_router;
use community_portal::AppState;
use std::path::PathBuf;
use std::sync::Arc;
use tower::ServiceExt;

/// Admin password in the test configuration.
#[allow(dead_code)]
pub const ADMIN_PASSWORD: &str = "test_admin_password";

/// A marker path unique to one test, so tests never share maintenance state.
pub fn unique_maintenance_file() -> PathBuf {
    std::env::temp_dir().join(format!("portal-maintenance-{}.json", uuid::Uuid::new_v4()))
}

/// Test config: offline datastore, no API keys, isolated maintenance marker.
pub fn test_config() -> Config {
    Config {
        maintenance_file: unique_maintenance_file(),
        ..Config::default()
    }
}

/// Create a test app with offline dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (axum::Router, Arc<AppState>) {
    create_test_app_with(test_config())
}

/// Create a test app from a custom config.
pub fn create_test_app_with(config: Config) -> (axum::Router, Arc<AppState>) {
    let state = Arc::new(AppState::from_config(
        config,
        PortalDb::new_offline(),
        reqwest::Client::new(),
    ));
    (create_router(state.clone()), state)
}

#[allow(dead_code)]
pub fn set_cookie_headers(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|value| value.to_str().unwrap().to_string())
        .collect()
}

#[allow(dead_code)]
pub fn find_cookie(headers: &[String], name: &str) -> String {
    headers
        .iter()
        .find(|value| value.starts_with(&format!("{name}=")))
        .cloned()
        .unwrap_or_else(|| panic!("missing Set-Cookie header for {name}: {headers:?}"))
}

/// Log in as admin and return the `name=value` pair for a Cookie header.
#[allow(dead_code)]
pub async fn admin_cookie(app: &axum::Router) -> String {
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(format!(r#"{{"password":"{ADMIN_PASSWORD}"}}"#)))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = find_cookie(&set_cookie_headers(&response), "portal_admin");
    cookie.split(';').next().unwrap().to_string()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Build a JSON request.
#[allow(dead_code)]
pub fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Build a GET request.
#[allow(dead_code)]
pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}
