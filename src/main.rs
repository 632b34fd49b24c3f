// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Community Portal API Server
//!
//! Every external dependency is optional: without a database, API keys or
//! an admin password the matching subsystem degrades instead of blocking
//! startup.

use community_portal::{config::Config, db::PortalDb, AppState};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const HTTP_CONNECT_TIMEOUT: Duration = Duration::from_secs(3);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(
        port = config.port,
        production = config.production,
        default_locale = %config.default_locale,
        "Starting community portal"
    );

    // Database is optional; lists degrade to empty results without it
    let db = match config.database_url.as_deref() {
        Some(url) => match PortalDb::connect_lazy(url) {
            Ok(db) => db,
            Err(e) => {
                tracing::error!(error = %e, "Invalid DATABASE_URL, running without datastore");
                PortalDb::new_offline()
            }
        },
        None => {
            tracing::warn!("DATABASE_URL not set, running without datastore");
            PortalDb::new_offline()
        }
    };

    if config.run_migrations {
        if let Err(e) = db.migrate().await {
            tracing::error!(error = %e, "Migrations failed, continuing");
        }
    }

    if config.admin_password.is_none() {
        tracing::warn!("ADMIN_PASSWORD not set, admin login disabled");
    }
    if config.openweather_api_key.is_none() {
        tracing::warn!("OPENWEATHER_API_KEY not set, weather widget serves fallback data");
    }
    if config.google_maps_api_key.is_none() {
        tracing::warn!("GOOGLE_MAPS_API_KEY not set, traffic widget serves fallback data");
    }

    let http = reqwest::Client::builder()
        .connect_timeout(HTTP_CONNECT_TIMEOUT)
        .user_agent(concat!("community-portal/", env!("CARGO_PKG_VERSION")))
        .build()?;

    // Build shared state
    let state = Arc::new(AppState::from_config(config.clone(), db, http));
    tracing::info!(
        maintenance_file = %state.maintenance.path().display(),
        traffic_routes = state.traffic.routes().len(),
        "Services initialized"
    );

    // Build router
    let app = community_portal::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("community_portal=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
