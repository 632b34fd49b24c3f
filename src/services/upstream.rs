// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Best-effort upstream fetching.
//!
//! Each upstream call has its own timeout. Whatever goes wrong (timeout,
//! network error, non-2xx status, bad JSON, missing API key), the caller gets
//! a [`Snapshot`] holding either live data or the static fallback.
//! `is_live` tells the two apart.

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::future::Future;
use std::time::Duration;

/// Budget for address/coordinate lookups.
pub const LOOKUP_TIMEOUT: Duration = Duration::from_secs(5);
/// Budget for data calls (weather, departure boards, traffic).
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(8);

pub const FALLBACK_SOURCE: &str = "fallback";

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    #[error("upstream not configured")]
    NotConfigured,

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("unexpected response: {0}")]
    Decode(String),
}

/// Data from one upstream, live or substituted.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot<T> {
    pub data: T,
    pub is_live: bool,
    /// Upstream name for live data, `"fallback"` otherwise
    pub source: String,
    pub fetched_at: DateTime<Utc>,
}

impl<T> Snapshot<T> {
    pub fn live(source: &str, data: T) -> Self {
        Self {
            data,
            is_live: true,
            source: source.to_string(),
            fetched_at: Utc::now(),
        }
    }

    pub fn fallback(data: T) -> Self {
        Self {
            data,
            is_live: false,
            source: FALLBACK_SOURCE.to_string(),
            fetched_at: Utc::now(),
        }
    }
}

/// Run `fetch` within `budget`, falling back on any failure.
pub async fn with_fallback<T, F>(
    source: &str,
    budget: Duration,
    fetch: F,
    fallback: impl FnOnce() -> T,
) -> Snapshot<T>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    match bounded(budget, fetch).await {
        Ok(data) => Snapshot::live(source, data),
        Err(UpstreamError::NotConfigured) => {
            tracing::debug!(source, "Upstream not configured, serving fallback");
            Snapshot::fallback(fallback())
        }
        Err(e) => {
            tracing::warn!(source, error = %e, "Upstream fetch failed, serving fallback");
            Snapshot::fallback(fallback())
        }
    }
}

/// Apply a timeout to an upstream call.
pub async fn bounded<T, F>(budget: Duration, fetch: F) -> Result<T, UpstreamError>
where
    F: Future<Output = Result<T, UpstreamError>>,
{
    tokio::time::timeout(budget, fetch)
        .await
        .map_err(|_| UpstreamError::Timeout(budget))?
}

/// Send a request and parse a JSON body, mapping non-2xx to an error.
pub async fn get_json<T: DeserializeOwned>(
    request: reqwest::RequestBuilder,
) -> Result<T, UpstreamError> {
    let response = request.send().await?;

    if !response.status().is_success() {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let body: String = body.chars().take(200).collect();
        return Err(UpstreamError::Status { status, body });
    }

    response
        .json()
        .await
        .map_err(|e| UpstreamError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_live_value_passes_through() {
        let snap = with_fallback("test", Duration::from_secs(1), async { Ok(5) }, || 0).await;
        assert!(snap.is_live);
        assert_eq!(snap.data, 5);
        assert_eq!(snap.source, "test");
    }

    #[tokio::test]
    async fn test_error_uses_fallback() {
        let snap = with_fallback(
            "test",
            Duration::from_secs(1),
            async { Err::<i32, _>(UpstreamError::Decode("bad".into())) },
            || -1,
        )
        .await;
        assert!(!snap.is_live);
        assert_eq!(snap.data, -1);
        assert_eq!(snap.source, FALLBACK_SOURCE);
    }

    #[tokio::test]
    async fn test_timeout_uses_fallback() {
        let snap = with_fallback(
            "slow",
            Duration::from_millis(20),
            async {
                tokio::time::sleep(Duration::from_secs(5)).await;
                Ok(1)
            },
            || 2,
        )
        .await;
        assert!(!snap.is_live);
        assert_eq!(snap.data, 2);
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let json = serde_json::to_value(Snapshot::fallback(1)).unwrap();
        assert_eq!(json["isLive"], false);
        assert_eq!(json["source"], "fallback");
        assert!(json.get("fetchedAt").is_some());
    }
}
