// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Bulletin board (offers, requests, notices).

use crate::error::Result;
use crate::models::{non_empty, BulletinPost, NewBulletinPost};
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
    Router::new().route("/api/bulletin", get(list_posts).post(create_post))
}

#[derive(Debug, Default, Deserialize)]
pub struct BulletinQuery {
    #[serde(rename = "type")]
    post_type: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<BulletinQuery>, QueryRejection>,
) -> Result<Json<ListResponse<BulletinPost>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let post_type = non_empty(params.post_type).map(|t| t.to_lowercase());

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_bulletin_posts(post_type.as_deref(), window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

async fn create_post(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewBulletinPost>, JsonRejection>,
) -> Result<(StatusCode, Json<BulletinPost>)> {
    let post = json_body(body)?.normalized();
    post.validate()?;

    let created = state
        .db
        .datastore()
        .writable()?
        .insert_bulletin_post(&post)
        .await?;
    tracing::info!(post_id = %created.id, post_type = %created.post_type, "Bulletin post created");

    Ok((StatusCode::CREATED, Json(created)))
}
