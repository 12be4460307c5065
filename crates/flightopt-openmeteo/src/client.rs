//! Open-Meteo current-weather HTTP client.

use crate::config::OpenMeteoConfig;
use anyhow::{Context, Result};
use flightopt_core::{Point, WindProvider, WindProviderError, WindVector};
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;

/// Wind provider backed by the Open-Meteo forecast API.
///
/// One GET per lookup, no retries; the wind model decides what a failure means.
#[derive(Debug, Clone)]
pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: Option<Value>,
}

impl OpenMeteoClient {
    pub fn new(config: &OpenMeteoConfig) -> Result<Self> {
        let mut builder = Client::builder().timeout(config.timeout);
        if config.accept_invalid_certs {
            tracing::warn!("TLS certificate verification disabled for wind provider");
            builder = builder.danger_accept_invalid_certs(true);
        }
        let client = builder
            .build()
            .context("Failed to create wind provider HTTP client")?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn request_url(&self, point: Point) -> String {
        build_request_url(&self.base_url, point)
    }
}

impl WindProvider for OpenMeteoClient {
    async fn fetch(&self, point: Point) -> std::result::Result<WindVector, WindProviderError> {
        let url = self.request_url(point);
        let response = self.client.get(&url).send().await.map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            tracing::debug!(%status, %url, "wind provider rejected request");
            return Err(WindProviderError::Status(status.as_u16()));
        }

        let body = response.text().await.map_err(classify)?;
        parse_current_weather(&body)
    }
}

fn classify(err: reqwest::Error) -> WindProviderError {
    if err.is_timeout() {
        WindProviderError::Timeout
    } else {
        WindProviderError::Transport(err.to_string())
    }
}

fn build_request_url(base: &str, point: Point) -> String {
    let separator = if base.contains('?') { "&" } else { "?" };
    format!(
        "{}{}latitude={:.6}&longitude={:.6}&current_weather=true&windspeed_unit=kmh",
        base, separator, point.lat, point.lon
    )
}

/// Extract wind speed (km/h) and meteorological direction from a forecast body.
pub fn parse_current_weather(body: &str) -> std::result::Result<WindVector, WindProviderError> {
    let payload: ForecastResponse =
        serde_json::from_str(body).map_err(|err| WindProviderError::Malformed(err.to_string()))?;
    let current = payload
        .current_weather
        .ok_or(WindProviderError::MissingField("current_weather"))?;
    let speed = number_field(&current, "windspeed")?;
    let direction = number_field(&current, "winddirection")?;
    WindVector::new(speed, direction).ok_or_else(|| {
        WindProviderError::Malformed(format!(
            "wind speed {speed} or direction {direction} out of range"
        ))
    })
}

fn number_field(
    current: &Value,
    name: &'static str,
) -> std::result::Result<f64, WindProviderError> {
    match current.get(name) {
        None | Some(Value::Null) => Err(WindProviderError::MissingField(name)),
        Some(value) => value
            .as_f64()
            .ok_or_else(|| WindProviderError::Malformed(format!("`{name}` is not a number"))),
    }
}
