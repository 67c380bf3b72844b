//! Core library for the `skysearch` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The OpenWeather source behind a `WeatherSource` trait
//! - Forecast normalization (one sample per day for the next five days)
//! - The persisted search history
//!
//! It is used by `skysearch-cli`, but can also be reused by other binaries or services.

pub mod config;
pub mod error;
pub mod forecast;
pub mod history;
pub mod model;
pub mod provider;
pub mod service;

pub use config::Config;
pub use error::{Error, Result};
pub use forecast::{NormalizedForecast, normalize};
pub use history::{HistoryStore, JsonFileMedium, PersistenceMedium};
pub use model::{
    CityForecast, Coordinates, ForecastResult, HistoryEntry, WeatherRecord, WeatherSample,
};
pub use provider::{WeatherSource, openweather::OpenWeatherSource};
pub use service::{SearchOutcome, SkySearch};
