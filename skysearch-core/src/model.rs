use serde::{Deserialize, Serialize};

/// Latitude/longitude pair returned by geocoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub lat: f64,
    pub lon: f64,
}

/// One timestamped observation as delivered by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    /// Location wall-clock time, `YYYY-MM-DD HH:MM:SS`, no zone.
    pub timestamp: String,
    pub temperature_c: f64,
    pub humidity_pct: u8,
    pub wind_speed: f64,
    pub icon: String,
    pub description: String,
}

/// Samples for a city plus the metadata the provider sends alongside them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityForecast {
    pub city_name: String,
    pub timezone_offset_seconds: i32,
    pub samples: Vec<WeatherSample>,
}

/// Weather for one point in time, ready to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeatherRecord {
    pub city_name: String,
    #[serde(rename = "date")]
    pub timestamp: String,
    pub icon: String,
    pub description: String,
    #[serde(rename = "temperature")]
    pub temperature_f: f64,
    pub humidity: u8,
    pub wind_speed: f64,
}

/// Current conditions plus up to five one-per-day forecast entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastResult {
    pub current_weather: WeatherRecord,
    pub forecast: Vec<WeatherRecord>,
    #[serde(rename = "timezone")]
    pub timezone_offset_seconds: i32,
}

/// A remembered city search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: i64,
    pub name: String,
}
