use chrono::Utc;

use crate::{
    Config,
    error::{Error, Result},
    forecast::normalize,
    history::HistoryStore,
    model::{ForecastResult, HistoryEntry},
    provider::{WeatherSource, source_from_config},
};

/// Weather lookup plus search history, as seen by a request handler.
#[derive(Debug)]
pub struct SkySearch {
    source: Box<dyn WeatherSource>,
    history: HistoryStore,
}

/// Result of [`SkySearch::search`]. A history failure does not hide the
/// weather that was already fetched.
#[derive(Debug)]
pub struct SearchOutcome {
    pub weather: ForecastResult,
    pub history: Result<Option<HistoryEntry>>,
}

impl SkySearch {
    pub fn new(source: Box<dyn WeatherSource>, history: HistoryStore) -> Self {
        Self { source, history }
    }

    /// Wire up the OpenWeather source and the history file named by `config`.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let source = source_from_config(config)?;
        let history = HistoryStore::from_file(config.history_file_path()?);
        Ok(Self::new(source, history))
    }

    pub async fn get_weather(&self, city: &str) -> Result<ForecastResult> {
        let city = city.trim();
        if city.is_empty() {
            return Err(Error::NoLocationFound(city.to_string()));
        }

        let coordinates = self.source.lookup_coordinates(city).await?;
        let raw = self.source.fetch_samples(coordinates).await?;
        let normalized = normalize(&raw.samples, &raw.city_name, Utc::now())?;

        Ok(ForecastResult {
            current_weather: normalized.current_weather,
            forecast: normalized.forecast,
            timezone_offset_seconds: raw.timezone_offset_seconds,
        })
    }

    /// Fetch weather for `city`, then remember the city as typed.
    pub async fn search(&self, city: &str) -> Result<SearchOutcome> {
        let weather = self.get_weather(city).await?;
        let history = self.add_to_history(city.trim()).await;

        if let Err(e) = &history {
            tracing::warn!("Error adding city to search history: {}", e);
        }

        Ok(SearchOutcome { weather, history })
    }

    pub async fn list_history(&self) -> Vec<HistoryEntry> {
        self.history.list().await
    }

    pub async fn add_to_history(&self, city: &str) -> Result<Option<HistoryEntry>> {
        self.history.add(city).await
    }

    pub async fn remove_from_history(&self, id: i64) -> Result<()> {
        self.history.remove(id).await
    }
}
