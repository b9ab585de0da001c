//! Core library for the `geoweather` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The provider abstraction and its OpenWeatherMap implementation
//! - Response models for the geocoding and current-weather endpoints
//! - The `lookup` pipeline: city name -> coordinates -> current temperature
//!
//! It is used by `geoweather-cli`, but can also be reused by other binaries or services.

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::debug;

pub mod config;
pub mod error;
pub mod model;
pub mod provider;
pub mod units;

pub use config::Config;
pub use error::LookupError;
pub use model::{Coordinates, CurrentWeather, GeoLocation, WeatherReport};
pub use provider::{WeatherProvider, provider_from_config};

/// Resolve `city` to its first geocoding match and fetch the current weather there.
pub async fn lookup(provider: &dyn WeatherProvider, city: &str) -> Result<WeatherReport> {
    let city = city.trim();
    if city.is_empty() {
        return Err(LookupError::EmptyCity.into());
    }

    let location = provider.geocode(city).await?;
    let coordinates = location.coordinates();

    let weather = provider
        .current_weather(coordinates)
        .await
        .with_context(|| format!("Failed to fetch current weather for {}", location.display_name()))?;

    debug!(
        kelvin = weather.main.temp,
        station = %weather.name,
        "current weather received"
    );

    Ok(WeatherReport {
        location_name: location.display_name(),
        coordinates,
        temperature_c: units::kelvin_to_celsius(weather.main.temp),
        condition: weather.condition().unwrap_or("Unknown").to_string(),
        observation_time: weather.observed_at().unwrap_or_else(Utc::now),
    })
}
