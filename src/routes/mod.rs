// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! HTTP route handlers.

pub mod admin;
pub mod auth;
pub mod bulletin;
pub mod businesses;
pub mod events;
pub mod forum;
pub mod maintenance;
pub mod pages;
pub mod pets;
pub mod reports;
pub mod waste;
pub mod widgets;

use crate::db::postgres::Window;
use crate::db::MAX_LIST_LIMIT;
use crate::error::{AppError, Result};
use crate::middleware::{localize_errors, maintenance_gate, require_admin};
use crate::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::http::{header, Method};
use axum::{middleware, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "web/src/lib/generated/")
)]
pub struct HealthResponse {
    pub status: String,
    pub build_id: String,
    pub datastore: bool,
    pub maintenance: bool,
}

/// Health check response
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let build_id = option_env!("BUILD_ID").unwrap_or("unknown").to_string();
    Json(HealthResponse {
        status: "ok".to_string(),
        build_id,
        datastore: state.db.is_configured(),
        maintenance: state.maintenance.is_enabled().await,
    })
}

// ─── Shared list plumbing ────────────────────────────────────

/// Paged list body shared by every list endpoint.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub limit: i64,
    pub offset: i64,
    /// True when no datastore is attached and `items` is a fallback
    pub offline: bool,
}

impl<T> ListResponse<T> {
    pub fn new(items: Vec<T>, window: Window, offline: bool) -> Self {
        Self {
            items,
            limit: window.limit,
            offset: window.offset,
            offline,
        }
    }
}

/// Clamp caller-supplied paging to `1..=50` rows and a non-negative offset.
pub fn page_window(limit: Option<i64>, offset: Option<i64>) -> Window {
    Window {
        limit: limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT),
        offset: offset.unwrap_or(0).max(0),
    }
}

/// Unwrap a JSON body, turning extractor rejections into `400`s.
pub fn json_body<T>(body: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    body.map(|Json(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Unwrap query parameters, turning extractor rejections into `400`s.
pub fn query_params<T>(query: std::result::Result<Query<T>, QueryRejection>) -> Result<T> {
    query
        .map(|Query(value)| value)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Build the complete router with all routes.
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS layer - allow requests from frontend URL and localhost (for dev)
    let frontend_url = state.config.frontend_url.clone();
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::AllowOrigin::predicate(
            move |origin: &axum::http::HeaderValue, _request_parts: &axum::http::request::Parts| {
                let origin_str = origin.to_str().unwrap_or("");
                origin_str == frontend_url
                    || origin_str.starts_with("http://localhost")
                    || origin_str.starts_with("http://127.0.0.1")
            },
        ))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::ACCEPT_LANGUAGE]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/health", get(health_check))
        .merge(admin::routes())
        .merge(auth::routes())
        .merge(events::routes())
        .merge(businesses::routes())
        .merge(forum::routes())
        .merge(bulletin::routes())
        .merge(pets::routes())
        .merge(reports::routes())
        .merge(waste::routes())
        .merge(maintenance::routes())
        .merge(widgets::routes())
        .merge(pages::routes());

    // Admin routes (valid admin session required)
    let admin_routes = maintenance::admin_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), require_admin));

    Router::new()
        .merge(public_routes)
        .merge(admin_routes)
        .fallback_service(pages::static_files(&state.config.public_dir))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            maintenance_gate,
        ))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            localize_errors,
        ))
        .layer(middleware::from_fn(
            crate::middleware::security::add_security_headers,
        ))
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_window_caps_limit() {
        assert_eq!(page_window(None, None), Window { limit: 50, offset: 0 });
        assert_eq!(page_window(Some(500), Some(20)), Window { limit: 50, offset: 20 });
        assert_eq!(page_window(Some(0), Some(-3)), Window { limit: 1, offset: 0 });
        assert_eq!(page_window(Some(10), None), Window { limit: 10, offset: 0 });
    }
}
