// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Traffic widget backed by the Google Maps Distance Matrix API.
//!
//! Travel times for a fixed set of commuter routes are fetched
//! concurrently. A route whose lookup fails gets its canned typical
//! duration, marked as not live.

use crate::services::upstream::{self, get_json, with_fallback, Snapshot, UpstreamError};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SOURCE: &str = "google_maps";

/// A monitored route.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSpec {
    pub name: String,
    pub origin: String,
    pub destination: String,
    /// Canned duration used as fallback
    pub typical_minutes: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CongestionLevel {
    Free,
    Moderate,
    Heavy,
    Unknown,
}

impl CongestionLevel {
    /// Classify by the ratio of current to typical travel time.
    pub fn from_durations(current_secs: u64, typical_secs: u64) -> Self {
        if typical_secs == 0 {
            return CongestionLevel::Unknown;
        }
        let ratio = current_secs as f64 / typical_secs as f64;
        if ratio < 1.15 {
            CongestionLevel::Free
        } else if ratio < 1.4 {
            CongestionLevel::Moderate
        } else {
            CongestionLevel::Heavy
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteTraffic {
    pub duration_minutes: u32,
    pub typical_minutes: u32,
    pub delay_minutes: u32,
    pub distance_km: Option<f64>,
    pub level: CongestionLevel,
}

#[derive(Debug, Clone, Serialize)]
pub struct RouteReport {
    pub name: String,
    pub origin: String,
    pub destination: String,
    pub traffic: Snapshot<RouteTraffic>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrafficSnapshot {
    pub is_live: bool,
    pub routes: Vec<RouteReport>,
}

/// Default routes when `TRAFFIC_ROUTES` is not configured.
pub fn default_routes() -> Vec<RouteSpec> {
    [
        ("Ortsmitte → Autobahn", "Rathaus", "Autobahnanschluss", 12),
        ("Ortsmitte → Kreisstadt", "Rathaus", "Kreisstadt Zentrum", 25),
        ("Bahnhof → Gewerbegebiet", "Bahnhof", "Gewerbegebiet", 8),
    ]
    .into_iter()
    .map(|(name, origin, destination, typical_minutes)| RouteSpec {
        name: name.to_string(),
        origin: origin.to_string(),
        destination: destination.to_string(),
        typical_minutes,
    })
    .collect()
}

/// Parse `name|origin|destination[|typical_minutes]` entries separated by `;`.
///
/// Malformed entries are skipped with a warning.
pub fn parse_routes(spec: &str) -> Vec<RouteSpec> {
    spec.split(';')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .filter_map(|entry| {
            let parts: Vec<&str> = entry.split('|').map(str::trim).collect();
            let route = match parts.as_slice() {
                [name, origin, destination] => Some((name, origin, destination, 15)),
                [name, origin, destination, minutes] => minutes
                    .parse()
                    .ok()
                    .map(|m| (name, origin, destination, m)),
                _ => None,
            };
            match route {
                Some((name, origin, destination, typical_minutes))
                    if !name.is_empty() && !origin.is_empty() && !destination.is_empty() =>
                {
                    Some(RouteSpec {
                        name: name.to_string(),
                        origin: origin.to_string(),
                        destination: destination.to_string(),
                        typical_minutes,
                    })
                }
                _ => {
                    tracing::warn!(entry, "Skipping malformed traffic route");
                    None
                }
            }
        })
        .collect()
}

#[derive(Clone)]
pub struct TrafficService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    routes: Vec<RouteSpec>,
    timeout: Duration,
}

impl TrafficService {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        routes: Vec<RouteSpec>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            routes,
            timeout: upstream::FETCH_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn routes(&self) -> &[RouteSpec] {
        &self.routes
    }

    pub async fn snapshot(&self) -> TrafficSnapshot {
        let routes: Vec<RouteReport> = join_all(self.routes.iter().map(|route| async move {
            let traffic = with_fallback(SOURCE, self.timeout, self.route_traffic(route), || {
                RouteTraffic {
                    duration_minutes: route.typical_minutes,
                    typical_minutes: route.typical_minutes,
                    delay_minutes: 0,
                    distance_km: None,
                    level: CongestionLevel::Unknown,
                }
            })
            .await;
            RouteReport {
                name: route.name.clone(),
                origin: route.origin.clone(),
                destination: route.destination.clone(),
                traffic,
            }
        }))
        .await;

        TrafficSnapshot {
            is_live: routes.iter().any(|r| r.traffic.is_live),
            routes,
        }
    }

    async fn route_traffic(&self, route: &RouteSpec) -> Result<RouteTraffic, UpstreamError> {
        let key = self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)?;
        let url = format!("{}/maps/api/distancematrix/json", self.base_url);

        let matrix: DistanceMatrix = get_json(self.http.get(&url).query(&[
            ("origins", route.origin.as_str()),
            ("destinations", route.destination.as_str()),
            ("departure_time", "now"),
            ("mode", "driving"),
            ("key", key),
        ]))
        .await?;

        if matrix.status != "OK" {
            return Err(UpstreamError::Decode(format!("matrix status {}", matrix.status)));
        }

        let element = matrix
            .rows
            .into_iter()
            .next()
            .and_then(|row| row.elements.into_iter().next())
            .ok_or_else(|| UpstreamError::Decode("empty distance matrix".to_string()))?;

        if element.status != "OK" {
            return Err(UpstreamError::Decode(format!(
                "element status {}",
                element.status
            )));
        }

        let typical = element
            .duration
            .ok_or_else(|| UpstreamError::Decode("missing duration".to_string()))?
            .value;
        let current = element.duration_in_traffic.map(|d| d.value).unwrap_or(typical);

        Ok(RouteTraffic {
            duration_minutes: secs_to_minutes(current),
            typical_minutes: secs_to_minutes(typical),
            delay_minutes: secs_to_minutes(current.saturating_sub(typical)),
            distance_km: element.distance.map(|d| d.value as f64 / 1000.0),
            level: CongestionLevel::from_durations(current, typical),
        })
    }
}

fn secs_to_minutes(secs: u64) -> u32 {
    ((secs + 30) / 60) as u32
}

// ─── Distance Matrix wire types ──────────────────────────────

#[derive(Debug, Deserialize)]
struct DistanceMatrix {
    status: String,
    #[serde(default)]
    rows: Vec<MatrixRow>,
}

#[derive(Debug, Deserialize)]
struct MatrixRow {
    elements: Vec<MatrixElement>,
}

#[derive(Debug, Deserialize)]
struct MatrixElement {
    status: String,
    duration: Option<MatrixValue>,
    duration_in_traffic: Option<MatrixValue>,
    distance: Option<MatrixValue>,
}

#[derive(Debug, Deserialize)]
struct MatrixValue {
    value: u64,
}
