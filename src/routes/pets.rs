// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lost and found pets.

use crate::db::postgres::PetFilter;
use crate::error::{AppError, Result};
use crate::models::{non_empty, NewPetAlert, PetAlert};
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
    Router::new().route("/api/pets", get(list_alerts).post(create_alert))
}

#[derive(Debug, Default, Deserialize)]
pub struct PetsQuery {
    /// "lost" or "found"
    status: Option<String>,
    #[serde(rename = "type")]
    animal_type: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

async fn list_alerts(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<PetsQuery>, QueryRejection>,
) -> Result<Json<ListResponse<PetAlert>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let filter = PetFilter {
        status: non_empty(params.status).map(|s| s.to_lowercase()),
        animal_type: non_empty(params.animal_type).map(|t| t.to_lowercase()),
    };

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_pet_alerts(&filter, window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

async fn create_alert(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewPetAlert>, JsonRejection>,
) -> Result<(StatusCode, Json<PetAlert>)> {
    let alert = json_body(body)?.normalized();
    alert.validate()?;
    if !alert.has_contact() {
        return Err(AppError::BadRequest(
            "Either contact_phone or contact_email is required".to_string(),
        ));
    }

    let created = state
        .db
        .datastore()
        .writable()?
        .insert_pet_alert(&alert)
        .await?;
    tracing::info!(alert_id = %created.id, status = %created.status, "Pet alert created");

    Ok((StatusCode::CREATED, Json(created)))
}
