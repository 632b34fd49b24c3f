// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! OpenWeatherMap client for the weather widget.
//!
//! Current conditions and air quality are fetched concurrently. Each side
//! falls back independently, so a slow air-quality endpoint never hides a
//! live weather reading.

use crate::i18n::Locale;
use crate::services::upstream::{self, get_json, with_fallback, Snapshot, UpstreamError};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SOURCE: &str = "openweathermap";

/// Current conditions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherReading {
    pub location: String,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: u8,
    pub pressure: u32,
    pub wind_speed: f64,
    pub description: String,
    pub icon: String,
}

impl WeatherReading {
    /// Canned reading served when the live source is unreachable.
    pub fn fallback() -> Self {
        Self {
            location: String::new(),
            temperature: 12.0,
            feels_like: 11.0,
            humidity: 70,
            pressure: 1015,
            wind_speed: 2.5,
            description: "partly cloudy".to_string(),
            icon: "03d".to_string(),
        }
    }
}

/// Air quality with the OpenWeatherMap 1..5 index.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AirQuality {
    pub aqi: u8,
    pub label: &'static str,
    pub pm2_5: f64,
    pub pm10: f64,
    pub o3: f64,
    pub no2: f64,
}

impl AirQuality {
    pub fn fallback() -> Self {
        Self {
            aqi: 2,
            label: aqi_label(2),
            pm2_5: 8.0,
            pm10: 15.0,
            o3: 60.0,
            no2: 12.0,
        }
    }
}

/// Combined weather widget payload.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSnapshot {
    pub weather: Snapshot<WeatherReading>,
    pub air_quality: Snapshot<AirQuality>,
}

pub fn aqi_label(aqi: u8) -> &'static str {
    match aqi {
        1 => "good",
        2 => "fair",
        3 => "moderate",
        4 => "poor",
        _ => "very_poor",
    }
}

#[derive(Clone)]
pub struct WeatherService {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    latitude: f64,
    longitude: f64,
    timeout: Duration,
}

impl WeatherService {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        api_key: Option<String>,
        latitude: f64,
        longitude: f64,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            latitude,
            longitude,
            timeout: upstream::FETCH_TIMEOUT,
        }
    }

    /// Override the per-call timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Fetch weather and air quality concurrently, each with its own fallback.
    pub async fn snapshot(&self, locale: Locale) -> WeatherSnapshot {
        let (weather, air_quality) = tokio::join!(
            with_fallback(
                SOURCE,
                self.timeout,
                self.current_weather(locale),
                WeatherReading::fallback
            ),
            with_fallback(
                SOURCE,
                self.timeout,
                self.air_quality(),
                AirQuality::fallback
            ),
        );
        WeatherSnapshot {
            weather,
            air_quality,
        }
    }

    pub async fn current_weather(&self, locale: Locale) -> Result<WeatherReading, UpstreamError> {
        let key = self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)?;
        let url = format!("{}/data/2.5/weather", self.base_url);

        let raw: OwmWeather = get_json(self.http.get(&url).query(&[
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("units", "metric".to_string()),
            ("lang", locale.code().to_string()),
            ("appid", key.to_string()),
        ]))
        .await?;

        let condition = raw.weather.into_iter().next().unwrap_or_default();
        Ok(WeatherReading {
            location: raw.name,
            temperature: raw.main.temp,
            feels_like: raw.main.feels_like,
            humidity: raw.main.humidity,
            pressure: raw.main.pressure,
            wind_speed: raw.wind.map(|w| w.speed).unwrap_or(0.0),
            description: condition.description,
            icon: condition.icon,
        })
    }

    pub async fn air_quality(&self) -> Result<AirQuality, UpstreamError> {
        let key = self.api_key.as_deref().ok_or(UpstreamError::NotConfigured)?;
        let url = format!("{}/data/2.5/air_pollution", self.base_url);

        let raw: OwmAirPollution = get_json(self.http.get(&url).query(&[
            ("lat", self.latitude.to_string()),
            ("lon", self.longitude.to_string()),
            ("appid", key.to_string()),
        ]))
        .await?;

        let entry = raw
            .list
            .into_iter()
            .next()
            .ok_or_else(|| UpstreamError::Decode("empty air pollution list".to_string()))?;

        Ok(AirQuality {
            aqi: entry.main.aqi,
            label: aqi_label(entry.main.aqi),
            pm2_5: entry.components.pm2_5,
            pm10: entry.components.pm10,
            o3: entry.components.o3,
            no2: entry.components.no2,
        })
    }
}

// ─── OpenWeatherMap wire types ───────────────────────────────

#[derive(Debug, Deserialize)]
struct OwmWeather {
    #[serde(default)]
    name: String,
    main: OwmMain,
    #[serde(default)]
    weather: Vec<OwmCondition>,
    wind: Option<OwmWind>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    feels_like: f64,
    humidity: u8,
    pressure: u32,
}

#[derive(Debug, Default, Deserialize)]
struct OwmCondition {
    description: String,
    icon: String,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmAirPollution {
    list: Vec<OwmAirEntry>,
}

#[derive(Debug, Deserialize)]
struct OwmAirEntry {
    main: OwmAqi,
    components: OwmComponents,
}

#[derive(Debug, Deserialize)]
struct OwmAqi {
    aqi: u8,
}

#[derive(Debug, Default, Deserialize)]
struct OwmComponents {
    #[serde(default)]
    pm2_5: f64,
    #[serde(default)]
    pm10: f64,
    #[serde(default)]
    o3: f64,
    #[serde(default)]
    no2: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aqi_labels() {
        assert_eq!(aqi_label(1), "good");
        assert_eq!(aqi_label(3), "moderate");
        assert_eq!(aqi_label(5), "very_poor");
        assert_eq!(aqi_label(0), "very_poor");
    }

    #[test]
    fn test_parse_owm_weather() {
        let raw: OwmWeather = serde_json::from_str(
            r#"{"name":"Musterstadt","main":{"temp":21.3,"feels_like":20.9,"humidity":55,"pressure":1012},
                "weather":[{"id":800,"main":"Clear","description":"klarer Himmel","icon":"01d"}],
                "wind":{"speed":3.1,"deg":200}}"#,
        )
        .unwrap();
        assert_eq!(raw.name, "Musterstadt");
        assert_eq!(raw.main.humidity, 55);
        assert_eq!(raw.weather[0].icon, "01d");
    }

    #[tokio::test]
    async fn test_missing_key_serves_fallback_for_both() {
        let service = WeatherService::new(
            reqwest::Client::new(),
            "http://127.0.0.1:9",
            None,
            48.0,
            11.0,
        );
        let snapshot = service.snapshot(Locale::De).await;
        assert!(!snapshot.weather.is_live);
        assert!(!snapshot.air_quality.is_live);
        assert_eq!(snapshot.weather.data, WeatherReading::fallback());
    }
}
