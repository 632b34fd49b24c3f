// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Discussion forum: categories, threads and replies.

use crate::error::{AppError, Result};
use crate::models::{non_empty, ForumCategory, ForumPost, ForumReply, NewForumPost, NewForumReply};
use crate::routes::businesses::CATEGORIES_CACHE_CONTROL;
use crate::routes::{json_body, page_window, query_params, ListResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

const THREAD_REPLY_PREVIEW: i64 = 50;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/forum", get(list_posts).post(create_post))
        .route("/api/forum/categories", get(list_categories))
        .route("/api/forum/{id}", get(get_thread))
        .route("/api/forum/{id}/replies", get(list_replies).post(create_reply))
}

#[derive(Debug, Default, Deserialize)]
pub struct ForumQuery {
    /// Category slug
    category: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RepliesQuery {
    limit: Option<i64>,
    offset: Option<i64>,
}

/// A thread with its first page of replies.
#[derive(Serialize)]
pub struct ThreadResponse {
    pub post: ForumPost,
    pub replies: Vec<ForumReply>,
}

fn parse_post_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::BadRequest(format!("Invalid post id '{}'", raw)))
}

async fn list_categories(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse> {
    let categories = state
        .db
        .datastore()
        .read_or(ForumCategory::fallback, |store| async move {
            store.list_forum_categories().await
        })
        .await?;

    Ok((
        [(header::CACHE_CONTROL, CATEGORIES_CACHE_CONTROL)],
        Json(categories),
    ))
}

async fn list_posts(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<ForumQuery>, QueryRejection>,
) -> Result<Json<ListResponse<ForumPost>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let category = non_empty(params.category).map(|c| c.to_lowercase());

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_forum_posts(category.as_deref(), window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<ThreadResponse>> {
    let id = parse_post_id(&id)?;
    let not_found = || AppError::NotFound(format!("Forum post {}", id));

    let thread = state
        .db
        .datastore()
        .read_or(
            || None,
            |store| async move {
                let Some(post) = store.get_forum_post(id).await? else {
                    return Ok(None);
                };
                let replies = store
                    .list_forum_replies(id, page_window(Some(THREAD_REPLY_PREVIEW), None))
                    .await?;
                Ok(Some(ThreadResponse { post, replies }))
            },
        )
        .await?;

    thread.map(Json).ok_or_else(not_found)
}

async fn list_replies(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    query: std::result::Result<Query<RepliesQuery>, QueryRejection>,
) -> Result<Json<ListResponse<ForumReply>>> {
    let id = parse_post_id(&id)?;
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_forum_replies(id, window).await
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
    body: std::result::Result<Json<NewForumPost>, JsonRejection>,
) -> Result<(StatusCode, Json<ForumPost>)> {
    let post = json_body(body)?.normalized();
    post.validate()?;

    let created = state
        .db
        .datastore()
        .writable()?
        .insert_forum_post(&post)
        .await?;
    tracing::info!(post_id = %created.id, "Forum thread created");

    Ok((StatusCode::CREATED, Json(created)))
}

async fn create_reply(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    body: std::result::Result<Json<NewForumReply>, JsonRejection>,
) -> Result<(StatusCode, Json<ForumReply>)> {
    let id = parse_post_id(&id)?;
    let reply = json_body(body)?.normalized();
    reply.validate()?;

    let store = state.db.datastore().writable()?;
    if store.get_forum_post(id).await?.is_none() {
        return Err(AppError::NotFound(format!("Forum post {}", id)));
    }
    let created = store.insert_forum_reply(id, &reply).await?;
    tracing::info!(post_id = %id, reply_id = %created.id, "Forum reply created");

    Ok((StatusCode::CREATED, Json(created)))
}
