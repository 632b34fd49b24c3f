// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community event calendar.

use crate::db::postgres::EventFilter;
use crate::error::{AppError, Result};
use crate::models::{non_empty, Event, NewEvent};
use crate::routes::{json_body, page_window, query_params, ListResponse};
use crate::AppState;
use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/events", get(list_events).post(create_event))
}

#[derive(Debug, Default, Deserialize)]
pub struct EventsQuery {
    category: Option<String>,
    featured: Option<bool>,
    /// RFC3339 timestamp or plain date; defaults to now
    from: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

/// Parse `from` as an RFC3339 timestamp or a `YYYY-MM-DD` date (midnight UTC).
fn parse_from(raw: Option<&str>) -> Result<DateTime<Utc>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(Utc::now());
    };
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            AppError::BadRequest(
                "Invalid 'from' parameter: must be RFC3339 datetime or YYYY-MM-DD".to_string(),
            )
        })
}

/// Upcoming active events, featured first.
async fn list_events(
    State(state): State<Arc<AppState>>,
    query: std::result::Result<Query<EventsQuery>, QueryRejection>,
) -> Result<Json<ListResponse<Event>>> {
    let params = query_params(query)?;
    let window = page_window(params.limit, params.offset);
    let filter = EventFilter {
        category: non_empty(params.category).map(|c| c.to_lowercase()),
        featured: params.featured,
        from: Some(parse_from(params.from.as_deref())?),
    };

    let datastore = state.db.datastore();
    let items = datastore
        .read_or(Vec::new, |store| async move {
            store.list_events(&filter, window).await
        })
        .await?;

    Ok(Json(ListResponse::new(
        items,
        window,
        !datastore.is_available(),
    )))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    body: std::result::Result<Json<NewEvent>, JsonRejection>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = json_body(body)?.normalized();
    event.validate()?;
    if event.end_date.is_some_and(|end| end < event.start_date) {
        return Err(AppError::BadRequest(
            "end_date must not be before start_date".to_string(),
        ));
    }

    let created = state.db.datastore().writable()?.insert_event(&event).await?;
    tracing::info!(event_id = %created.id, "Event submitted");

    Ok((StatusCode::CREATED, Json(created)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_from_accepts_dates_and_timestamps() {
        let date = parse_from(Some("2026-05-01")).unwrap();
        assert_eq!(date.to_rfc3339(), "2026-05-01T00:00:00+00:00");

        let ts = parse_from(Some("2026-05-01T18:30:00+02:00")).unwrap();
        assert_eq!(ts.to_rfc3339(), "2026-05-01T16:30:00+00:00");
    }

    #[test]
    fn test_parse_from_defaults_to_now() {
        let before = Utc::now();
        let from = parse_from(Some("  ")).unwrap();
        assert!(from >= before);
    }

    #[test]
    fn test_parse_from_rejects_garbage() {
        assert!(matches!(
            parse_from(Some("next tuesday")),
            Err(AppError::BadRequest(_))
        ));
    }
}
