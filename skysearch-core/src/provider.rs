use std::fmt::Debug;
use std::time::Duration;

use async_trait::async_trait;

use crate::{
    Config,
    error::Result,
    model::{CityForecast, Coordinates},
    provider::openweather::OpenWeatherSource,
};

pub mod openweather;

/// Geocoding plus forecast lookup for a single weather provider.
#[async_trait]
pub trait WeatherSource: Send + Sync + Debug {
    /// Resolve a city name. Fails with `NoLocationFound` when nothing matches.
    async fn lookup_coordinates(&self, city: &str) -> Result<Coordinates>;

    /// Fetch the ordered sample list for a location.
    async fn fetch_samples(&self, coordinates: Coordinates) -> Result<CityForecast>;
}

/// Construct the OpenWeather source from config.
pub fn source_from_config(config: &Config) -> anyhow::Result<Box<dyn WeatherSource>> {
    let api_key = config.api_key.as_deref().ok_or_else(|| {
        anyhow::anyhow!(
            "No OpenWeather API key configured.\n\
                 Hint: run `skysearch configure` or set OPENWEATHER_API_KEY."
        )
    })?;

    let source = OpenWeatherSource::with_options(
        api_key.to_owned(),
        config.base_url(),
        Duration::from_secs(config.timeout_secs()),
    )?;

    Ok(Box::new(source))
}
