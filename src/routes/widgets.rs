// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Weather, transit and traffic widgets.
//!
//! These never fail because of an upstream: each service substitutes
//! fallback data and flags it with `isLive: false`. Caching is left to
//! clients and proxies via `Cache-Control`.

use crate::error::Result;
use crate::i18n::Locale;
use crate::routes::query_params;
use crate::services::transit::TransitQuery;
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    routing::get,
    Extension, Json, Router,
};
use std::sync::Arc;

pub const WEATHER_CACHE_CONTROL: &str = "public, max-age=600";
pub const TRAFFIC_CACHE_CONTROL: &str = "public, max-age=300";
pub const TRANSIT_CACHE_CONTROL: &str = "no-store";

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/weather", get(weather))
        .route("/api/transit", get(transit))
        .route("/api/traffic", get(traffic))
}

async fn weather(
    State(state): State<Arc<AppState>>,
    Extension(locale): Extension<Locale>,
) -> impl IntoResponse {
    let snapshot = state.weather.snapshot(locale).await;
    ([(header::CACHE_CONTROL, WEATHER_CACHE_CONTROL)], Json(snapshot))
}

async fn transit(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<TransitQuery>, QueryRejection>,
) -> Result<impl IntoResponse> {
    let params = query_params(query)?;
    let snapshot = state.transit.snapshot(&params).await;
    tracing::debug!(
        resolution = ?snapshot.resolution,
        boards = snapshot.boards.len(),
        is_live = snapshot.is_live,
        "Transit snapshot"
    );
    Ok(([(header::CACHE_CONTROL, TRANSIT_CACHE_CONTROL)], Json(snapshot)))
}

async fn traffic(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let snapshot = state.traffic.snapshot().await;
    ([(header::CACHE_CONTROL, TRAFFIC_CACHE_CONTROL)], Json(snapshot))
}
