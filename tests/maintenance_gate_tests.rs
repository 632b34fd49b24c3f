// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maintenance gate behaviour through the full router.

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use community_portal::services::maintenance::EnableMaintenance;
use tower::ServiceExt;

mod common;

async fn enable(state: &community_portal::AppState, message: &str) {
    state
        .maintenance
        .enable(EnableMaintenance {
            message: message.to_string(),
            ..EnableMaintenance::default()
        })
        .await
        .unwrap();
}

fn location(response: &axum::response::Response) -> Option<String> {
    response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string())
}

#[tokio::test]
async fn test_exempt_paths_never_redirect() {
    let (app, state) = common::create_test_app();

    for enabled in [false, true] {
        if enabled {
            enable(&state, "Upgrade").await;
        }
        for path in [
            "/health",
            "/api/events",
            "/api/maintenance",
            "/api/admin/session",
            "/admin",
            "/de/admin",
            "/en/admin/settings",
            "/de/maintenance",
            "/en/maintenance",
        ] {
            let response = app.clone().oneshot(common::get(path)).await.unwrap();
            let redirected_to_maintenance = response.status() == StatusCode::TEMPORARY_REDIRECT
                && location(&response).is_some_and(|l| l.ends_with("/maintenance"));
            assert!(
                !redirected_to_maintenance,
                "{path} redirected to maintenance (enabled={enabled})"
            );
        }
    }
}

#[tokio::test]
async fn test_enabled_redirects_pages_to_localized_notice() {
    let (app, state) = common::create_test_app();
    enable(&state, "Upgrade").await;

    let cases = [
        ("/en/events", "/en/maintenance"),
        ("/de/forum/abc", "/de/maintenance"),
        ("/events", "/de/maintenance"),
        ("/", "/de/maintenance"),
    ];
    for (path, target) in cases {
        let response = app.clone().oneshot(common::get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{path}");
        assert_eq!(location(&response).as_deref(), Some(target), "{path}");
    }
}

#[tokio::test]
async fn test_default_locale_from_config() {
    let config = community_portal::config::Config {
        default_locale: community_portal::i18n::Locale::En,
        ..common::test_config()
    };
    let (app, state) = common::create_test_app_with(config);
    enable(&state, "").await;

    let response = app.oneshot(common::get("/events")).await.unwrap();
    assert_eq!(location(&response).as_deref(), Some("/en/maintenance"));
}

#[tokio::test]
async fn test_disabled_passes_through() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(common::get("/de/events")).await.unwrap();
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_admin_session_bypasses_gate() {
    let (app, state) = common::create_test_app();
    let cookie = common::admin_cookie(&app).await;
    enable(&state, "Upgrade").await;

    let response = app
        .oneshot(
            Request::builder()
                .uri("/de/events")
                .header(header::COOKIE, cookie)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_forged_admin_cookie_is_redirected() {
    let (app, state) = common::create_test_app();
    enable(&state, "Upgrade").await;

    for forged in [
        "portal_admin=1",
        "portal_admin=true",
        "portal_admin=eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhZG1pbiJ9.invalid",
    ] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/de/events")
                    .header(header::COOKIE, forged)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT, "{forged}");
    }
}

#[tokio::test]
async fn test_corrupt_marker_reads_as_disabled() {
    let (app, state) = common::create_test_app();
    tokio::fs::write(state.maintenance.path(), b"{not json")
        .await
        .unwrap();

    let response = app
        .clone()
        .oneshot(common::get("/de/events"))
        .await
        .unwrap();
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    let response = app.oneshot(common::get("/api/maintenance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["enabled"], false);
}

#[tokio::test]
async fn test_flag_is_reread_every_request() {
    let (app, state) = common::create_test_app();

    let response = app.clone().oneshot(common::get("/de/events")).await.unwrap();
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    enable(&state, "").await;
    let response = app.clone().oneshot(common::get("/de/events")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);

    state.maintenance.disable(None).await.unwrap();
    let response = app.oneshot(common::get("/de/events")).await.unwrap();
    assert_ne!(response.status(), StatusCode::TEMPORARY_REDIRECT);
}

#[tokio::test]
async fn test_maintenance_page_renders_notice() {
    let (app, state) = common::create_test_app();
    enable(&state, "Neue Server <heute>").await;

    let response = app
        .clone()
        .oneshot(common::get("/de/maintenance"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(bytes.to_vec()).unwrap();
    assert!(html.contains("Neue Server &lt;heute&gt;"));
    assert!(html.contains("lang=\"de\""));
}

#[tokio::test]
async fn test_maintenance_page_redirects_home_when_disabled() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(common::get("/en/maintenance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
    assert_eq!(location(&response).as_deref(), Some("/en"));
}
