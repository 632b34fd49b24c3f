// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Cleanliness reports. New reports start as `pending` until reviewed.

use crate::db::postgres::ReportFilter;
use crate::error::Result;
use crate::models::{non_empty, CleanlinessReport, NewCleanlinessReport};
use crate::routes::{json_body, page_window, query_params, ListResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/reports", get(list_reports).post(create_report))
}

#[derive(Debug, Default, Deserialize)]
pub struct ReportsQuery {
    status: Option<String>,
    category: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_reports(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ReportsQuery>, QueryRejection>,
) -> Result<Json<ListResponse<CleanlinessReport>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let filter = ReportFilter {
        status: non_empty(params.status).map(|s| s.to_lowercase()),
        category: non_empty(params.category).map(|c| c.to_lowercase()),
    };

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_reports(&filter, window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

async fn create_report(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewCleanlinessReport>, JsonRejection>,
) -> Result<(StatusCode, Json<CleanlinessReport>)> {
    let report = json_body(body)?.normalized();
    report.validate()?;

    let created = state
        .db
        .datastore()
        .writable()?
        .insert_report(&report)
        .await?;
    tracing::info!(
        report_id = %created.id,
        category = %created.category,
        anonymous = created.is_anonymous,
        "Cleanliness report filed"
    );

    Ok((StatusCode::CREATED, Json(created)))
}
