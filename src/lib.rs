// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Community portal backend.
//!
//! Serves the public JSON API for a municipal community portal (events,
//! business directory, forum, bulletin board, pet alerts, cleanliness
//! reports, waste schedule), weather/transit/traffic widgets with static
//! fallbacks, admin sessions and a file-flag maintenance mode.

pub mod config;
pub mod db;
pub mod error;
pub mod i18n;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::PortalDb;
use services::{MaintenanceStore, TrafficService, TransitService, WeatherService};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: PortalDb,
    pub maintenance: MaintenanceStore,
    pub weather: WeatherService,
    pub transit: TransitService,
    pub traffic: TrafficService,
}

impl AppState {
    /// Wire up services from configuration with a shared HTTP client.
    pub fn from_config(config: Config, db: PortalDb, http: reqwest::Client) -> Self {
        let routes = match config.traffic_routes.as_deref() {
            Some(spec) => {
                let parsed = services::traffic::parse_routes(spec);
                if parsed.is_empty() {
                    tracing::warn!("TRAFFIC_ROUTES has no valid entries, using defaults");
                    services::traffic::default_routes()
                } else {
                    parsed
                }
            }
            None => services::traffic::default_routes(),
        };

        Self {
            maintenance: MaintenanceStore::new(config.maintenance_file.clone()),
            weather: WeatherService::new(
                http.clone(),
                config.openweather_api_url.clone(),
                config.openweather_api_key.clone(),
                config.latitude,
                config.longitude,
            ),
            transit: TransitService::new(
                http.clone(),
                config.transit_api_url.clone(),
                config.default_stop_id.clone(),
            ),
            traffic: TrafficService::new(
                http,
                config.google_maps_api_url.clone(),
                config.google_maps_api_key.clone(),
                routes,
            ),
            config,
            db,
        }
    }
}
