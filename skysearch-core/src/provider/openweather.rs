use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::instrument;

use crate::{
    error::{Error, Result},
    model::{CityForecast, Coordinates, WeatherSample},
};

use super::WeatherSource;

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct OpenWeatherSource {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherSource {
    pub fn with_options(api_key: String, base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http,
        })
    }

    /// GET `path` and return the body, turning a non-2xx status into `Upstream`.
    async fn get_body(&self, path: &str, query: &[(&str, &str)], what: &str) -> Result<String> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to send {what} request: {e}")))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .map_err(|e| Error::Upstream(format!("Failed to read {what} response body: {e}")))?;

        if !status.is_success() {
            return Err(Error::Upstream(format!(
                "OpenWeather {what} request failed with status {}: {}",
                status,
                truncate_body(&body),
            )));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct OwGeoEntry {
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct OwMain {
    temp: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct OwWeather {
    icon: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct OwWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwCity {
    name: String,
    #[serde(default)]
    timezone: i32,
}

#[derive(Debug, Deserialize)]
struct OwForecastEntry {
    dt_txt: String,
    main: OwMain,
    #[serde(default)]
    weather: Vec<OwWeather>,
    wind: OwWind,
}

#[derive(Debug, Deserialize)]
struct OwForecastResponse {
    #[serde(default)]
    cod: Option<Value>,
    city: Option<OwCity>,
    list: Option<Vec<OwForecastEntry>>,
}

impl From<OwForecastEntry> for WeatherSample {
    fn from(entry: OwForecastEntry) -> Self {
        let (icon, description) = entry
            .weather
            .into_iter()
            .next()
            .map(|w| (w.icon, w.description))
            .unwrap_or_else(|| (String::new(), "Unknown".to_string()));

        WeatherSample {
            timestamp: entry.dt_txt,
            temperature_c: entry.main.temp,
            humidity_pct: entry.main.humidity,
            wind_speed: entry.wind.speed,
            icon,
            description,
        }
    }
}

#[async_trait]
impl WeatherSource for OpenWeatherSource {
    #[instrument(skip(self), level = "debug")]
    async fn lookup_coordinates(&self, city: &str) -> Result<Coordinates> {
        let body = self
            .get_body("/geo/1.0/direct", &[("q", city), ("limit", "1")], "geocoding")
            .await?;

        let matches: Vec<OwGeoEntry> = serde_json::from_str(&body)
            .map_err(|e| Error::Upstream(format!("Failed to parse geocoding JSON: {e}")))?;

        let first = matches
            .first()
            .ok_or_else(|| Error::NoLocationFound(city.to_string()))?;

        tracing::debug!(lat = first.lat, lon = first.lon, "resolved city");
        Ok(Coordinates { lat: first.lat, lon: first.lon })
    }

    #[instrument(skip(self), level = "debug")]
    async fn fetch_samples(&self, coordinates: Coordinates) -> Result<CityForecast> {
        let lat = coordinates.lat.to_string();
        let lon = coordinates.lon.to_string();

        let body = self
            .get_body(
                "/data/2.5/forecast",
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("units", "metric")],
                "forecast",
            )
            .await?;

        let parsed: OwForecastResponse = serde_json::from_str(&body)
            .map_err(|e| Error::Upstream(format!("Failed to parse forecast JSON: {e}")))?;

        match &parsed.cod {
            Some(cod) if cod_is_ok(cod) => {}
            Some(cod) => {
                return Err(Error::Upstream(format!("OpenWeather forecast returned cod {cod}")));
            }
            None => {
                return Err(Error::Upstream("Forecast response is missing cod".into()));
            }
        }

        let list = parsed.list.ok_or(Error::EmptyInput)?;
        if list.is_empty() {
            return Err(Error::EmptyInput);
        }

        let city = parsed
            .city
            .ok_or_else(|| Error::Upstream("Forecast response is missing city metadata".into()))?;

        Ok(CityForecast {
            city_name: city.name,
            timezone_offset_seconds: city.timezone,
            samples: list.into_iter().map(WeatherSample::from).collect(),
        })
    }
}

fn cod_is_ok(cod: &Value) -> bool {
    match cod {
        Value::String(s) => s == "200",
        Value::Number(n) => n.as_u64() == Some(200),
        _ => false,
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
