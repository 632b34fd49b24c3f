// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Maintenance status API.

use crate::error::Result;
use crate::middleware::auth::AdminSession;
use crate::routes::{json_body, query_params};
use crate::services::maintenance::EnableMaintenance;
use crate::services::MaintenanceStatus;
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Public, read-only status.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/maintenance", get(public_status))
}

/// Admin routes. The session check is applied in routes/mod.rs.
pub fn admin_routes() -> Router<Arc<AppState>> {
    Router::new().route(
        "/api/admin/maintenance",
        get(admin_status).post(enable).delete(disable),
    )
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisableQuery {
    expected_revision: Option<u64>,
}

/// What visitors see. Revision bookkeeping stays admin-only.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicMaintenance {
    pub enabled: bool,
    pub message: String,
    pub estimated_end: Option<DateTime<Utc>>,
}

async fn public_status(State(state): State<Arc<AppState>>) -> Json<PublicMaintenance> {
    let status = state.maintenance.status().await;
    Json(PublicMaintenance {
        enabled: status.enabled,
        message: status.message,
        estimated_end: status.estimated_end,
    })
}

async fn admin_status(State(state): State<Arc<AppState>>) -> Json<MaintenanceStatus> {
    Json(state.maintenance.status().await)
}

async fn enable(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AdminSession>,
    body: std::result::Result<Json<EnableMaintenance>, JsonRejection>,
) -> Result<Json<MaintenanceStatus>> {
    let request = json_body(body)?;
    tracing::info!(
        session_issued_at = session.issued_at,
        expected_revision = ?request.expected_revision,
        "Admin enabling maintenance"
    );
    Ok(Json(state.maintenance.enable(request).await?))
}

async fn disable(
    State(state): State<Arc<AppState>>,
    Extension(session): Extension<AdminSession>,
    query: std::result::Result<Query<DisableQuery>, QueryRejection>,
) -> Result<Json<MaintenanceStatus>> {
    let params = query_params(query)?;
    tracing::info!(
        session_issued_at = session.issued_at,
        expected_revision = ?params.expected_revision,
        "Admin disabling maintenance"
    );
    Ok(Json(state.maintenance.disable(params.expected_revision).await?))
}
