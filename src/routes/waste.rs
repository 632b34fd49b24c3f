// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Waste collection schedule (read-only).

use crate::db::postgres::WasteFilter;
use crate::error::{AppError, Result};
use crate::models::{non_empty, WasteCollection};
use crate::routes::{page_window, query_params, ListResponse};
use crate::AppState;
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/waste", get(list_collections))
}

#[derive(Debug, Default, Deserialize)]
pub struct WasteQuery {
    district: Option<String>,
    #[serde(rename = "type")]
    waste_type: Option<String>,
    /// `YYYY-MM-DD`; defaults to today
    from: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

fn parse_from_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Utc::now().date_naive()),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
            AppError::BadRequest("Invalid 'from' parameter: must be YYYY-MM-DD".to_string())
        }),
    }
}

async fn list_collections(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<WasteQuery>, QueryRejection>,
) -> Result<Json<ListResponse<WasteCollection>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let filter = WasteFilter {
        district: non_empty(params.district),
        waste_type: non_empty(params.waste_type).map(|t| t.to_lowercase()),
        from: Some(parse_from_date(params.from.as_deref())?),
    };

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_waste_collections(&filter, window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_date() {
        assert_eq!(
            parse_from_date(Some("2026-03-02")).unwrap(),
            NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
        );
        assert_eq!(parse_from_date(None).unwrap(), Utc::now().date_naive());
        assert!(parse_from_date(Some("02.03.2026")).is_err());
    }
}
