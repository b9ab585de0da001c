use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One entry of the geocoding `direct` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct GeoLocation {
    pub name: String,
    /// Language code -> localized name. Many places have none.
    #[serde(default)]
    pub local_names: HashMap<String, String>,
    pub lat: f64,
    pub lon: f64,
    pub country: String,
    #[serde(default)]
    pub state: Option<String>,
}

impl GeoLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates { lat: self.lat, lon: self.lon }
    }

    /// "name, state, country", skipping a missing state.
    pub fn display_name(&self) -> String {
        match self.state.as_deref() {
            Some(state) if !state.is_empty() => {
                format!("{}, {}, {}", self.name, state, self.country)
            }
            _ => format!("{}, {}", self.name, self.country),
        }
    }

    pub fn local_name(&self, lang: &str) -> Option<&str> {
        self.local_names.get(lang).map(String::as_str)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Condition {
    pub id: u32,
    pub main: String,
    pub description: String,
    pub icon: String,
}

/// Temperatures are Kelvin (API default units).
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct MainReadings {
    pub temp: f64,
    pub feels_like: f64,
    pub temp_min: f64,
    pub temp_max: f64,
    pub pressure: u32,
    pub humidity: u8,
    #[serde(default)]
    pub sea_level: Option<u32>,
    #[serde(default)]
    pub grnd_level: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Wind {
    pub speed: f64,
    pub deg: f64,
    #[serde(default)]
    pub gust: Option<f64>,
}

/// Rain or snow volume in mm.
#[derive(Debug, Clone, PartialEq, Default, Deserialize, Serialize)]
pub struct Precipitation {
    #[serde(rename = "1h", default)]
    pub one_hour: Option<f64>,
    #[serde(rename = "3h", default)]
    pub three_hours: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Clouds {
    pub all: u8,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Sys {
    #[serde(rename = "type", default)]
    pub kind: Option<i64>,
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub country: Option<String>,
    pub sunrise: i64,
    pub sunset: i64,
}

/// Body of the `data/2.5/weather` response.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CurrentWeather {
    pub coord: Coordinates,
    pub weather: Vec<Condition>,
    #[serde(default)]
    pub base: String,
    pub main: MainReadings,
    #[serde(default)]
    pub visibility: Option<u32>,
    pub wind: Wind,
    #[serde(default)]
    pub rain: Option<Precipitation>,
    #[serde(default)]
    pub snow: Option<Precipitation>,
    pub clouds: Clouds,
    pub dt: i64,
    pub sys: Sys,
    pub timezone: i64,
    pub id: i64,
    pub name: String,
    pub cod: i64,
}

impl CurrentWeather {
    pub fn observed_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.dt, 0)
    }

    pub fn sunrise_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sys.sunrise, 0)
    }

    pub fn sunset_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.sys.sunset, 0)
    }

    pub fn condition(&self) -> Option<&str> {
        self.weather.first().map(|w| w.description.as_str())
    }
}

/// What the CLI prints: the resolved place and its temperature.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherReport {
    pub location_name: String,
    pub coordinates: Coordinates,
    pub temperature_c: f64,
    pub condition: String,
    pub observation_time: DateTime<Utc>,
}
