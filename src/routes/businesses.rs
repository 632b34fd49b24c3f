// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Local business directory.

use crate::db::postgres::BusinessFilter;
use crate::error::Result;
use crate::models::{non_empty, Business, BusinessCategory, NewBusiness};
use crate::routes::{json_body, page_window, query_params, ListResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

/// Categories change rarely; let clients keep them for a day.
pub const CATEGORIES_CACHE_CONTROL: &str = "public, max-age=86400";

const MAX_SEARCH_LEN: usize = 100;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/businesses", get(list_businesses).post(create_business))
        .route("/api/businesses/categories", get(list_categories))
}

#[derive(Debug, Default, Deserialize)]
pub struct BusinessesQuery {
    /// Category slug
    category: Option<String>,
    search: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_businesses(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<BusinessesQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Business>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let filter = BusinessFilter {
        category: non_empty(params.category).map(|c| c.to_lowercase()),
        search: non_empty(params.search).map(|s| s.chars().take(MAX_SEARCH_LEN).collect()),
    };

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_businesses(&filter, window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let categories = state
        .db
        .datastore()
        .read_or(BusinessCategory::fallback, |store| async move {
            store.list_business_categories().await
        })
        .await?;

    Ok((
        [(header::CACHE_CONTROL, CATEGORIES_CACHE_CONTROL)],
        Json(categories),
    ))
}

/// Directory submission. The entry stays hidden until an admin activates it.
async fn create_business(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewBusiness>, JsonRejection>,
) -> Result<(StatusCode, Json<Business>)> {
    let business = json_body(body)?.normalized();
    business.validate()?;

    let created = state
        .db
        .datastore()
        .writable()?
        .insert_business(&business)
        .await?;
    tracing::info!(business_id = %created.id, "Business submitted for review");

    Ok((StatusCode::CREATED, Json(created)))
}
