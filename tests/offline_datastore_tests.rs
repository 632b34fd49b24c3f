// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Behaviour with no datastore attached: lists degrade, creates refuse.

use axum::http::{header, StatusCode};
use serde_json::json;
use tower::ServiceExt;

mod common;

#[tokio::test]
async fn test_lists_return_empty_offline() {
    let (app, _) = common::create_test_app();

    for path in [
        "/api/events",
        "/api/events?category=Kultur&featured=true&from=2026-01-01",
        "/api/businesses?search=b%C3%A4cker",
        "/api/forum?category=allgemein&limit=10&offset=20",
        "/api/bulletin?type=offer",
        "/api/pets?status=lost&type=cat",
        "/api/reports?status=pending",
        "/api/waste?district=Nord&type=paper",
    ] {
        let response = app.clone().oneshot(common::get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{path}");

        let body = common::body_json(response).await;
        assert_eq!(body["items"], json!([]), "{path}");
        assert_eq!(body["offline"], true, "{path}");
    }
}

#[tokio::test]
async fn test_list_limit_is_capped() {
    let (app, _) = common::create_test_app();

    let response = app
        .oneshot(common::get("/api/events?limit=1000&offset=-5"))
        .await
        .unwrap();
    let body = common::body_json(response).await;
    assert_eq!(body["limit"], 50);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_invalid_query_is_400() {
    let (app, _) = common::create_test_app();

    for path in [
        "/api/events?limit=many",
        "/api/events?from=tomorrow",
        "/api/waste?from=31.12.2026",
    ] {
        let response = app.clone().oneshot(common::get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");
        assert_eq!(common::body_json(response).await["error"], "bad_request");
    }
}

#[tokio::test]
async fn test_categories_fall_back_to_static_lists() {
    let (app, _) = common::create_test_app();

    for path in ["/api/businesses/categories", "/api/forum/categories"] {
        let response = app.clone().oneshot(common::get(path)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get(header::CACHE_CONTROL).unwrap(),
            "public, max-age=86400"
        );

        let body = common::body_json(response).await;
        let categories = body.as_array().unwrap();
        assert!(!categories.is_empty(), "{path}");
        assert!(categories.iter().all(|c| c["slug"].is_string()));
    }
}

#[tokio::test]
async fn test_creates_return_503_offline() {
    let (app, _) = common::create_test_app();

    let cases = [
        (
            "/api/events",
            json!({"title": "Sommerfest", "start_date": "2030-07-01T16:00:00Z"}),
        ),
        ("/api/businesses", json!({"name": "Bäckerei Huber"})),
        (
            "/api/forum",
            json!({"title": "Spielplatz", "content": "Wann wird er fertig?", "author_name": "Jo"}),
        ),
        (
            "/api/bulletin",
            json!({"type": "offer", "title": "Fahrrad", "content": "Zu verschenken"}),
        ),
        (
            "/api/pets",
            json!({"status": "lost", "animal_type": "cat", "contact_phone": "0123 456"}),
        ),
        (
            "/api/reports",
            json!({"category": "litter", "description": "Müll am Weiher", "location": "Weiherweg", "is_anonymous": true}),
        ),
    ];

    for (path, body) in cases {
        let response = app
            .clone()
            .oneshot(common::json_request("POST", path, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE, "{path}");

        let body = common::body_json(response).await;
        assert_eq!(body["error"], "service_unavailable", "{path}");
        assert_eq!(body["details"], "datastore", "{path}");
    }
}

#[tokio::test]
async fn test_invalid_create_is_400_before_datastore_check() {
    let (app, _) = common::create_test_app();

    let response = app
        .clone()
        .oneshot(common::json_request(
            "POST",
            "/api/pets",
            json!({"status": "lost", "animal_type": "cat"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .oneshot(common::json_request(
            "POST",
            "/api/reports",
            json!({"category": "noise", "description": "Laut", "location": "Markt"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = common::body_json(response).await;
    assert!(body["details"].as_str().unwrap().contains("category"));
}

#[tokio::test]
async fn test_forum_thread_offline() {
    let (app, _) = common::create_test_app();

    let id = uuid::Uuid::new_v4();
    let response = app
        .clone()
        .oneshot(common::get(&format!("/api/forum/{id}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app
        .clone()
        .oneshot(common::get(&format!("/api/forum/{id}/replies")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app
        .oneshot(common::get("/api/forum/not-a-uuid"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_offline_datastore() {
    let (app, _) = common::create_test_app();

    let response = app.oneshot(common::get("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = common::body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["datastore"], false);
    assert_eq!(body["maintenance"], false);
}
