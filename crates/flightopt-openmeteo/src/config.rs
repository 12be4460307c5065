//! Provider configuration from environment.

use std::env;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";

#[derive(Debug, Clone)]
pub struct OpenMeteoConfig {
    pub base_url: String,
    pub timeout: Duration,
    /// Suggested number of concurrent lookups for the wind model.
    pub concurrency: usize,
    /// Skip TLS certificate verification. Only for broken corporate proxies.
    pub accept_invalid_certs: bool,
}

impl Default for OpenMeteoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(8),
            concurrency: 8,
            accept_invalid_certs: false,
        }
    }
}

impl OpenMeteoConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            base_url: env::var("FLIGHTOPT_WIND_URL")
                .ok()
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
                .unwrap_or(defaults.base_url),
            timeout: env::var("FLIGHTOPT_WIND_TIMEOUT_S")
                .ok()
                .and_then(|s| s.parse::<f64>().ok())
                .filter(|secs| secs.is_finite() && *secs > 0.0)
                .map(Duration::from_secs_f64)
                .unwrap_or(defaults.timeout),
            concurrency: env::var("FLIGHTOPT_WIND_CONCURRENCY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n: &usize| *n > 0)
                .unwrap_or(defaults.concurrency),
            accept_invalid_certs: env::var("FLIGHTOPT_WIND_INSECURE")
                .map(|value| parse_flag(&value))
                .unwrap_or(defaults.accept_invalid_certs),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
