use crate::{
    Config,
    model::{Coordinates, CurrentWeather, GeoLocation},
    provider::openweather::OpenWeatherProvider,
};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod openweather;

/// The two remote calls a lookup needs: name -> coordinates, coordinates -> weather.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    /// First geocoding match for `city`; `LookupError::NoMatch` if there is none.
    async fn geocode(&self, city: &str) -> anyhow::Result<GeoLocation>;

    async fn current_weather(&self, coords: Coordinates) -> anyhow::Result<CurrentWeather>;
}

/// Construct the OpenWeatherMap provider from config and the `API_KEY` environment value.
pub fn provider_from_config(
    config: &Config,
    env_api_key: Option<String>,
) -> anyhow::Result<Box<dyn WeatherProvider>> {
    let api_key = config.resolve_api_key(env_api_key)?;

    let provider = OpenWeatherProvider::with_options(api_key, config.base_url(), config.timeout())?;

    Ok(Box::new(provider))
}
