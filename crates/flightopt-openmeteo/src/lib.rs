//! Open-Meteo wind provider
//!
//! Fetches current-weather wind at a point for the corridor optimizer.

pub mod client;
pub mod config;

pub use client::{parse_current_weather, OpenMeteoClient};
pub use config::{OpenMeteoConfig, DEFAULT_BASE_URL};
