// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Public transit departure boards.
//!
//! Talks to a `transport.rest`-style HAFAS API. Stops are resolved in
//! this order:
//! 1. Exact stop id from the request
//! 2. Nearest stops to a geocoded address
//! 3. Nearest stops to the given coordinates
//! 4. The configured default stop
//! 5. The first stops of the static station list
//!
//! A lookup that fails or finds nothing falls through to the next step.
//! Departure boards for the resolved stops are fetched concurrently, and
//! each board falls back to an empty list on its own.

use crate::services::upstream::{
    self, bounded, get_json, with_fallback, Snapshot, UpstreamError, LOOKUP_TIMEOUT,
};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SOURCE: &str = "transit";
const MAX_BOARDS: usize = 5;
const DEFAULT_BOARDS: usize = 3;
const DEPARTURES_PER_BOARD: u32 = 10;
const BOARD_DURATION_MINUTES: u32 = 60;

/// A transit stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<u32>,
}

/// How the stops for a request were chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StopResolution {
    StopId,
    Address,
    Coordinates,
    DefaultStop,
    StaticList,
}

/// Caller's hints for stop resolution.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TransitQuery {
    pub stop: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Departure {
    pub line: String,
    pub product: Option<String>,
    pub direction: Option<String>,
    pub when: Option<String>,
    pub planned_when: Option<String>,
    pub delay_minutes: Option<i64>,
    pub platform: Option<String>,
    pub cancelled: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct StationBoard {
    pub stop: Stop,
    pub departures: Snapshot<Vec<Departure>>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransitSnapshot {
    pub resolution: StopResolution,
    /// True if at least one board carries live data
    pub is_live: bool,
    pub boards: Vec<StationBoard>,
}

/// Canned station list used as the last resort.
pub fn static_stops() -> Vec<Stop> {
    [
        ("static:rathaus", "Rathaus"),
        ("static:bahnhof", "Bahnhof"),
        ("static:marktplatz", "Marktplatz"),
        ("static:schulzentrum", "Schulzentrum"),
        ("static:friedhof", "Friedhof"),
    ]
    .into_iter()
    .map(|(id, name)| Stop {
        id: id.to_string(),
        name: name.to_string(),
        distance: None,
    })
    .collect()
}

#[derive(Clone)]
pub struct TransitService {
    http: reqwest::Client,
    base_url: String,
    default_stop_id: Option<String>,
    lookup_timeout: Duration,
    board_timeout: Duration,
}

impl TransitService {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        default_stop_id: Option<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            default_stop_id,
            lookup_timeout: LOOKUP_TIMEOUT,
            board_timeout: upstream::FETCH_TIMEOUT,
        }
    }

    pub fn with_timeouts(mut self, lookup: Duration, board: Duration) -> Self {
        self.lookup_timeout = lookup;
        self.board_timeout = board;
        self
    }

    /// Resolve stops and fetch their departure boards.
    pub async fn snapshot(&self, query: &TransitQuery) -> TransitSnapshot {
        let limit = query.limit.unwrap_or(DEFAULT_BOARDS).clamp(1, MAX_BOARDS);
        let (resolution, stops) = self.resolve_stops(query, limit).await;

        let boards: Vec<StationBoard> = join_all(stops.into_iter().map(|stop| async move {
            let departures = if stop.id.starts_with("static:") {
                Snapshot::fallback(Vec::new())
            } else {
                with_fallback(
                    SOURCE,
                    self.board_timeout,
                    self.departures(&stop.id),
                    Vec::new,
                )
                .await
            };
            StationBoard { stop, departures }
        }))
        .await;

        TransitSnapshot {
            resolution,
            is_live: boards.iter().any(|b| b.departures.is_live),
            boards,
        }
    }

    /// Apply the resolution precedence. Never fails.
    pub async fn resolve_stops(
        &self,
        query: &TransitQuery,
        limit: usize,
    ) -> (StopResolution, Vec<Stop>) {
        if let Some(id) = query.stop.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            return (
                StopResolution::StopId,
                vec![Stop {
                    id: id.to_string(),
                    name: id.to_string(),
                    distance: None,
                }],
            );
        }

        if let Some(address) = query
            .address
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
        {
            match self.stops_near_address(address, limit).await {
                Ok(stops) if !stops.is_empty() => return (StopResolution::Address, stops),
                Ok(_) => tracing::debug!(address, "No stops near address"),
                Err(e) => tracing::warn!(address, error = %e, "Address stop lookup failed"),
            }
        }

        if let (Some(lat), Some(lon)) = (query.lat, query.lon) {
            match bounded(self.lookup_timeout, self.stops_nearby(lat, lon, limit)).await {
                Ok(stops) if !stops.is_empty() => return (StopResolution::Coordinates, stops),
                Ok(_) => tracing::debug!(lat, lon, "No stops near coordinates"),
                Err(e) => tracing::warn!(lat, lon, error = %e, "Nearby stop lookup failed"),
            }
        }

        if let Some(id) = &self.default_stop_id {
            return (
                StopResolution::DefaultStop,
                vec![Stop {
                    id: id.clone(),
                    name: id.clone(),
                    distance: None,
                }],
            );
        }

        (
            StopResolution::StaticList,
            static_stops().into_iter().take(limit).collect(),
        )
    }

    async fn stops_near_address(
        &self,
        address: &str,
        limit: usize,
    ) -> Result<Vec<Stop>, UpstreamError> {
        let url = format!("{}/locations", self.base_url);
        let locations: Vec<HafasLocation> = bounded(
            self.lookup_timeout,
            get_json(self.http.get(&url).query(&[
                ("query", address),
                ("results", "1"),
                ("addresses", "true"),
                ("stops", "false"),
                ("poi", "false"),
            ])),
        )
        .await?;

        let Some((lat, lon)) = locations.into_iter().find_map(|l| l.coordinates()) else {
            return Ok(Vec::new());
        };

        bounded(self.lookup_timeout, self.stops_nearby(lat, lon, limit)).await
    }

    async fn stops_nearby(&self, lat: f64, lon: f64, limit: usize) -> Result<Vec<Stop>, UpstreamError> {
        let url = format!("{}/locations/nearby", self.base_url);
        let locations: Vec<HafasLocation> = get_json(self.http.get(&url).query(&[
            ("latitude", lat.to_string()),
            ("longitude", lon.to_string()),
            ("results", limit.to_string()),
        ]))
        .await?;

        Ok(locations
            .into_iter()
            .filter_map(HafasLocation::into_stop)
            .take(limit)
            .collect())
    }

    async fn departures(&self, stop_id: &str) -> Result<Vec<Departure>, UpstreamError> {
        let url = format!(
            "{}/stops/{}/departures",
            self.base_url,
            urlencoding::encode(stop_id)
        );
        let board: HafasBoard = get_json(self.http.get(&url).query(&[
            ("duration", BOARD_DURATION_MINUTES),
            ("results", DEPARTURES_PER_BOARD),
        ]))
        .await?;

        Ok(board.departures.into_iter().map(Departure::from).collect())
    }
}

// ─── HAFAS wire types ────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct HafasLocation {
    #[serde(rename = "type")]
    kind: Option<String>,
    id: Option<String>,
    name: Option<String>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    location: Option<HafasCoordinates>,
    distance: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct HafasCoordinates {
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl HafasLocation {
    fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => {
                let loc = self.location.as_ref()?;
                Some((loc.latitude?, loc.longitude?))
            }
        }
    }

    fn into_stop(self) -> Option<Stop> {
        match self.kind.as_deref() {
            Some("stop") | Some("station") => Some(Stop {
                id: self.id?,
                name: self.name.unwrap_or_default(),
                distance: self.distance,
            }),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
struct HafasBoard {
    #[serde(default)]
    departures: Vec<HafasDeparture>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HafasDeparture {
    when: Option<String>,
    planned_when: Option<String>,
    /// Seconds
    delay: Option<i64>,
    platform: Option<String>,
    direction: Option<String>,
    line: Option<HafasLine>,
    #[serde(default)]
    cancelled: bool,
}

#[derive(Debug, Deserialize)]
struct HafasLine {
    name: Option<String>,
    product: Option<String>,
}

impl From<HafasDeparture> for Departure {
    fn from(raw: HafasDeparture) -> Self {
        let (line, product) = match raw.line {
            Some(line) => (line.name.unwrap_or_default(), line.product),
            None => (String::new(), None),
        };
        Self {
            line,
            product,
            direction: raw.direction,
            when: raw.when,
            planned_when: raw.planned_when,
            delay_minutes: raw.delay.map(|s| s / 60),
            platform: raw.platform,
            cancelled: raw.cancelled,
        }
    }
}
