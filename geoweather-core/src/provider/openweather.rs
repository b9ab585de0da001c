use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS},
    error::LookupError,
    model::{Coordinates, CurrentWeather, GeoLocation},
};

use super::WeatherProvider;

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const CURRENT_WEATHER_PATH: &str = "/data/2.5/weather";

#[derive(Debug, Clone)]
pub struct OpenWeatherProvider {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherProvider {
    pub fn new(api_key: String) -> Result<Self> {
        Self::with_options(api_key, DEFAULT_BASE_URL, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
        what: &str,
    ) -> Result<T> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "requesting OpenWeather {what}");

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .with_context(|| format!("Failed to send request to OpenWeather ({what})"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read OpenWeather {what} response body"))?;

        debug!(%status, bytes = body.len(), "OpenWeather {what} responded");

        if !status.is_success() {
            return Err(anyhow!(
                "OpenWeather {} request failed with status {}: {}",
                what,
                status,
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse OpenWeather {what} JSON"))
    }
}

#[async_trait]
impl WeatherProvider for OpenWeatherProvider {
    async fn geocode(&self, city: &str) -> Result<GeoLocation> {
        let matches: Vec<GeoLocation> = self
            .get_json(GEOCODE_PATH, &[("q", city), ("limit", "1")], "geocoding")
            .await?;

        let first = matches
            .into_iter()
            .next()
            .ok_or_else(|| LookupError::NoMatch { city: city.to_string() })?;

        info!(name = %first.name, lat = first.lat, lon = first.lon, "resolved '{city}'");
        Ok(first)
    }

    async fn current_weather(&self, coords: Coordinates) -> Result<CurrentWeather> {
        let lat = coords.lat.to_string();
        let lon = coords.lon.to_string();

        self.get_json(
            CURRENT_WEATHER_PATH,
            &[("lat", lat.as_str()), ("lon", lon.as_str())],
            "current weather",
        )
        .await
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }

    let mut end = MAX;
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &body[..end])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{method, path, query_param},
    };

    fn provider_for(server: &MockServer) -> OpenWeatherProvider {
        OpenWeatherProvider::with_options("KEY".into(), &server.uri(), Duration::from_secs(5))
            .expect("client should build")
    }

    fn weather_body(temp: f64) -> serde_json::Value {
        json!({
            "coord": {"lon": -113.4912, "lat": 53.5462},
            "weather": [{"id": 800, "main": "Clear", "description": "clear sky", "icon": "01d"}],
            "base": "stations",
            "main": {"temp": temp, "feels_like": temp, "temp_min": temp, "temp_max": temp,
                     "pressure": 1015, "humidity": 40},
            "visibility": 10000,
            "wind": {"speed": 3.6, "deg": 250},
            "clouds": {"all": 0},
            "dt": 1700000000,
            "sys": {"country": "CA", "sunrise": 1699972000, "sunset": 1700005000},
            "timezone": -25200,
            "id": 5946768,
            "name": "Edmonton",
            "cod": 200
        })
    }

    #[tokio::test]
    async fn geocode_returns_first_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .and(query_param("q", "Paris"))
            .and(query_param("limit", "1"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {"name": "Paris", "lat": 48.8588897, "lon": 2.3200410, "country": "FR", "state": "Ile-de-France"},
                {"name": "Paris", "lat": 33.6617962, "lon": -95.555130, "country": "US", "state": "Texas"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let geo = provider_for(&server).geocode("Paris").await.unwrap();

        assert_eq!(geo.country, "FR");
        assert_eq!(geo.lat, 48.8588897);
    }

    #[tokio::test]
    async fn geocode_empty_list_is_no_match() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;

        let err = provider_for(&server).geocode("Atlantis").await.unwrap_err();

        assert_eq!(
            err.downcast_ref::<LookupError>(),
            Some(&LookupError::NoMatch { city: "Atlantis".into() })
        );
    }

    #[tokio::test]
    async fn geocode_surfaces_http_errors() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(
                ResponseTemplate::new(401)
                    .set_body_string(r#"{"cod":401,"message":"Invalid API key."}"#),
            )
            .mount(&server)
            .await;

        let err = provider_for(&server).geocode("Edmonton").await.unwrap_err();
        let msg = err.to_string();

        assert!(msg.contains("geocoding request failed with status 401"));
        assert!(msg.contains("Invalid API key."));
    }

    #[tokio::test]
    async fn geocode_rejects_malformed_json() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(GEOCODE_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let err = provider_for(&server).geocode("Edmonton").await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse OpenWeather geocoding JSON"));
    }

    #[tokio::test]
    async fn current_weather_sends_coordinates() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_WEATHER_PATH))
            .and(query_param("lat", "53.5462055"))
            .and(query_param("lon", "-113.491241"))
            .and(query_param("appid", "KEY"))
            .respond_with(ResponseTemplate::new(200).set_body_json(weather_body(290.15)))
            .expect(1)
            .mount(&server)
            .await;

        let weather = provider_for(&server)
            .current_weather(Coordinates { lat: 53.5462055, lon: -113.491241 })
            .await
            .unwrap();

        assert_eq!(weather.main.temp, 290.15);
        assert_eq!(weather.condition(), Some("clear sky"));
    }

    #[tokio::test]
    async fn current_weather_decode_failure_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(CURRENT_WEATHER_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"cod": 200})))
            .mount(&server)
            .await;

        let err = provider_for(&server)
            .current_weather(Coordinates { lat: 0.0, lon: 0.0 })
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Failed to parse OpenWeather current weather JSON"));
    }

    #[test]
    fn new_targets_public_api() {
        let provider = OpenWeatherProvider::new("KEY".into()).unwrap();
        assert_eq!(provider.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn trailing_slash_is_dropped_from_base_url() {
        let provider = OpenWeatherProvider::with_options(
            "KEY".into(),
            "http://localhost:8080/",
            Duration::from_secs(1),
        )
        .unwrap();
        assert_eq!(provider.base_url, "http://localhost:8080");
    }

    #[test]
    fn truncate_body_keeps_short_bodies() {
        assert_eq!(truncate_body("short"), "short");
    }

    #[test]
    fn truncate_body_respects_char_boundaries() {
        let body = "é".repeat(150);
        let out = truncate_body(&body);

        assert!(out.ends_with("..."));
        assert!(out.len() <= 203);
    }
}
