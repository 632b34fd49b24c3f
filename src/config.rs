// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application configuration loaded from environment variables.
//!
//! Only the server port and a few paths have hard defaults. Every secret
//! and API key is optional: when one is missing, the subsystem that needs
//! it degrades to its offline or fallback behaviour instead of failing
//! startup.

use crate::i18n::Locale;
use hkdf::Hkdf;
use sha2::Sha256;
use std::env;
use std::path::PathBuf;

/// Salt for deriving the session signing key from the admin password.
const SESSION_KEY_SALT: &[u8] = b"community-portal/session-key/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    // --- Server ---
    /// Server port
    pub port: u16,
    /// Frontend origin allowed by CORS
    pub frontend_url: String,
    /// `APP_ENV=production` turns on `Secure` cookies
    pub production: bool,
    /// Default locale for redirects and error messages
    pub default_locale: Locale,
    /// Static frontend build served for page routes
    pub public_dir: PathBuf,
    /// Marker file whose presence enables maintenance mode
    pub maintenance_file: PathBuf,

    // --- Datastore ---
    /// Postgres connection string (Supabase or self-hosted)
    pub database_url: Option<String>,
    /// Apply bundled migrations at startup
    pub run_migrations: bool,

    // --- Secrets ---
    /// Shared admin password
    pub admin_password: Option<String>,
    /// Session signing secret. Derived from the admin password if absent.
    pub session_secret: Option<String>,

    // --- External APIs ---
    pub openweather_api_key: Option<String>,
    pub openweather_api_url: String,
    pub google_maps_api_key: Option<String>,
    pub google_maps_api_url: String,
    pub transit_api_url: String,
    /// Stop used when a transit request names no stop, address or location
    pub default_stop_id: Option<String>,
    /// `name|origin|destination` entries separated by `;`
    pub traffic_routes: Option<String>,
    /// Town centre coordinates for the weather widget
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for Config {
    /// Default config for testing only.
    fn default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            production: false,
            default_locale: Locale::De,
            public_dir: PathBuf::from("public"),
            maintenance_file: env::temp_dir().join("community-portal-maintenance.json"),
            database_url: None,
            run_migrations: false,
            admin_password: Some("test_admin_password".to_string()),
            session_secret: Some("test_session_secret_32_bytes_min!".to_string()),
            openweather_api_key: None,
            openweather_api_url: "https://api.openweathermap.org".to_string(),
            google_maps_api_key: None,
            google_maps_api_url: "https://maps.googleapis.com".to_string(),
            transit_api_url: "https://v6.db.transport.rest".to_string(),
            default_stop_id: None,
            traffic_routes: None,
            latitude: 48.137,
            longitude: 11.575,
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let default_locale = match optional("DEFAULT_LOCALE") {
            Some(code) => Locale::from_code(&code).ok_or(ConfigError::Invalid("DEFAULT_LOCALE"))?,
            None => Locale::default(),
        };

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            production: env::var("APP_ENV")
                .map(|v| v.eq_ignore_ascii_case("production"))
                .unwrap_or(false),
            default_locale,
            public_dir: env::var("PUBLIC_DIR")
                .unwrap_or_else(|_| "public".to_string())
                .into(),
            maintenance_file: env::var("MAINTENANCE_FILE")
                .unwrap_or_else(|_| "data/maintenance.json".to_string())
                .into(),

            database_url: optional("DATABASE_URL"),
            run_migrations: env::var("RUN_MIGRATIONS")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .unwrap_or(false),

            admin_password: optional("ADMIN_PASSWORD"),
            session_secret: optional("SESSION_SECRET"),

            openweather_api_key: optional("OPENWEATHER_API_KEY"),
            openweather_api_url: env::var("OPENWEATHER_API_URL")
                .unwrap_or_else(|_| "https://api.openweathermap.org".to_string()),
            google_maps_api_key: optional("GOOGLE_MAPS_API_KEY"),
            google_maps_api_url: env::var("GOOGLE_MAPS_API_URL")
                .unwrap_or_else(|_| "https://maps.googleapis.com".to_string()),
            transit_api_url: env::var("TRANSIT_API_URL")
                .unwrap_or_else(|_| "https://v6.db.transport.rest".to_string()),
            default_stop_id: optional("DEFAULT_STOP_ID"),
            traffic_routes: optional("TRAFFIC_ROUTES"),
            latitude: parse_coordinate("PORTAL_LATITUDE", 48.137)?,
            longitude: parse_coordinate("PORTAL_LONGITUDE", 11.575)?,
        })
    }

    /// Key used to sign session tokens, or `None` if sessions are disabled.
    ///
    /// Uses `SESSION_SECRET` directly when set, otherwise derives a key from
    /// the admin password with HKDF-SHA256.
    pub fn session_key(&self) -> Option<Vec<u8>> {
        if let Some(secret) = &self.session_secret {
            return Some(secret.as_bytes().to_vec());
        }

        let password = self.admin_password.as_ref()?;
        let hk = Hkdf::<Sha256>::new(Some(SESSION_KEY_SALT), password.as_bytes());
        let mut okm = [0u8; 32];
        hk.expand(b"session-signing", &mut okm).ok()?;
        Some(okm.to_vec())
    }
}

/// Read an env var, treating empty or whitespace-only values as unset.
fn optional(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn parse_coordinate(name: &'static str, default: f64) -> Result<f64, ConfigError> {
    match optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("PORT", "9090");
        env::set_var("DEFAULT_LOCALE", "en");
        env::set_var("ADMIN_PASSWORD", "  hunter22  ");
        env::set_var("DATABASE_URL", "");
        env::set_var("APP_ENV", "Production");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.port, 9090);
        assert_eq!(config.default_locale, Locale::En);
        assert_eq!(config.admin_password.as_deref(), Some("hunter22"));
        assert!(config.database_url.is_none());
        assert!(config.production);

        env::remove_var("PORT");
        env::remove_var("DEFAULT_LOCALE");
        env::remove_var("ADMIN_PASSWORD");
        env::remove_var("DATABASE_URL");
        env::remove_var("APP_ENV");
    }

    #[test]
    fn test_session_key_prefers_explicit_secret() {
        let config = Config {
            session_secret: Some("explicit".to_string()),
            ..Config::default()
        };
        assert_eq!(config.session_key(), Some(b"explicit".to_vec()));
    }

    #[test]
    fn test_session_key_derived_from_admin_password() {
        let config = Config {
            session_secret: None,
            admin_password: Some("admin".to_string()),
            ..Config::default()
        };
        let key = config.session_key().unwrap();
        assert_eq!(key.len(), 32);
        assert_ne!(key, b"admin".to_vec());
        assert_eq!(config.session_key(), Some(key));
    }

    #[test]
    fn test_session_key_absent_without_secrets() {
        let config = Config {
            session_secret: None,
            admin_password: None,
            ..Config::default()
        };
        assert!(config.session_key().is_none());
    }
}
