// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    response::IntoResponse,
};
use community_portal::error::{AppError, ErrorResponse};
use community_portal::i18n::Locale;
use tower::ServiceExt;

mod common;

#[test]
fn test_status_mapping() {
    assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::InvalidCredentials.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(AppError::Conflict("rev".into()).status(), StatusCode::CONFLICT);
    assert_eq!(
        AppError::ServiceUnavailable("datastore").status(),
        StatusCode::SERVICE_UNAVAILABLE
    );
    assert_eq!(
        AppError::Upstream("timeout".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
    assert_eq!(
        AppError::Database("pool closed".into()).status(),
        StatusCode::INTERNAL_SERVER_ERROR
    );
}

#[tokio::test]
async fn test_internal_details_are_not_exposed() {
    let response = AppError::Database("password authentication failed for user".into())
        .into_response();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body = common::body_json(response).await;
    assert_eq!(body["error"], "database_error");
    assert!(body.get("details").is_none());
}

#[test]
fn test_error_response_localizes_message() {
    let body = ErrorResponse {
        error: "not_found",
        message: "Der Eintrag wurde nicht gefunden.",
        details: Some("event".to_string()),
    };
    let english = body.localized(Locale::En);
    assert_eq!(english.error, "not_found");
    assert_eq!(english.message, "The requested entry was not found.");
    assert_eq!(english.details.as_deref(), Some("event"));
}

#[tokio::test]
async fn test_error_locale_from_query_and_header() {
    let (app, _) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::get("/api/auth/me?lang=en"))
        .await
        .unwrap();
    assert_eq!(
        common::body_json(response).await["message"],
        "Authentication required."
    );

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::ACCEPT_LANGUAGE, "en-US,en;q=0.9")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(
        common::body_json(response).await["message"],
        "Authentication required."
    );

    let response = app.oneshot(common::get("/api/auth/me")).await.unwrap();
    assert_eq!(
        common::body_json(response).await["message"],
        "Anmeldung erforderlich."
    );
}

#[tokio::test]
async fn test_security_headers_on_api_responses() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(common::get("/health")).await.unwrap();
    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(
        headers.get("referrer-policy").unwrap(),
        "strict-origin-when-cross-origin"
    );
    assert_eq!(
        headers.get("content-security-policy").unwrap(),
        "default-src 'none'; frame-ancestors 'none'"
    );
}
