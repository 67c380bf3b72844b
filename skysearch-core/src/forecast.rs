//! Turns the provider's 3-hour sample list into current conditions plus one
//! entry per calendar day.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use crate::error::{Error, Result};
use crate::model::{WeatherRecord, WeatherSample};

/// Number of days reported after the reference day.
pub const FORECAST_DAYS: usize = 5;

/// Output of [`normalize`]; the caller attaches the timezone offset.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedForecast {
    pub current_weather: WeatherRecord,
    pub forecast: Vec<WeatherRecord>,
}

pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// Date portion of a provider timestamp (`YYYY-MM-DD HH:MM:SS` or ISO `T`).
fn sample_date(timestamp: &str) -> &str {
    timestamp
        .split_once([' ', 'T'])
        .map_or(timestamp, |(date, _)| date)
}

fn to_record(sample: &WeatherSample, city_name: &str) -> WeatherRecord {
    WeatherRecord {
        city_name: city_name.to_owned(),
        timestamp: sample.timestamp.clone(),
        icon: sample.icon.clone(),
        description: sample.description.clone(),
        temperature_f: celsius_to_fahrenheit(sample.temperature_c),
        humidity: sample.humidity_pct,
        wind_speed: sample.wind_speed,
    }
}

/// Build current weather from the first sample and a forecast from the
/// first sample of each later day.
///
/// Samples must be in provider order (ascending timestamp). Samples dated on
/// the UTC day of `reference_now` are skipped, as is every sample after the
/// first of its day. At most [`FORECAST_DAYS`] records are returned; fewer is
/// not an error.
pub fn normalize(
    samples: &[WeatherSample],
    city_name: &str,
    reference_now: DateTime<Utc>,
) -> Result<NormalizedForecast> {
    let first = samples.first().ok_or(Error::EmptyInput)?;
    let current_weather = to_record(first, city_name);

    let today = reference_now.format("%Y-%m-%d").to_string();
    let mut seen: HashSet<&str> = HashSet::new();
    let mut forecast = Vec::with_capacity(FORECAST_DAYS);

    for sample in samples {
        if forecast.len() == FORECAST_DAYS {
            break;
        }

        let date = sample_date(&sample.timestamp);
        if date == today || !seen.insert(date) {
            continue;
        }

        forecast.push(to_record(sample, city_name));
    }

    tracing::debug!(
        city = city_name,
        samples = samples.len(),
        days = forecast.len(),
        "normalized forecast"
    );

    Ok(NormalizedForecast { current_weather, forecast })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample(timestamp: &str, temperature_c: f64) -> WeatherSample {
        WeatherSample {
            timestamp: timestamp.to_string(),
            temperature_c,
            humidity_pct: 60,
            wind_speed: 4.1,
            icon: "10d".to_string(),
            description: "light rain".to_string(),
        }
    }

    /// Eight 3-hour samples per day for `days` days starting 2026-10-19.
    fn three_hourly(days: u32) -> Vec<WeatherSample> {
        (0..days)
            .flat_map(|day| {
                (0..8).map(move |slot| {
                    sample(&format!("2026-10-{:02} {:02}:00:00", 19 + day, slot * 3), slot as f64)
                })
            })
            .collect()
    }

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 19, 14, 30, 0).unwrap()
    }

    #[test]
    fn conversion_is_exact() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn empty_samples_fail() {
        let err = normalize(&[], "Paris", reference()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn six_days_yield_five_distinct_later_days() {
        let samples = three_hourly(6);
        let out = normalize(&samples, "Paris", reference()).unwrap();

        let dates: Vec<&str> = out.forecast.iter().map(|r| sample_date(&r.timestamp)).collect();
        assert_eq!(
            dates,
            ["2026-10-20", "2026-10-21", "2026-10-22", "2026-10-23", "2026-10-24"]
        );
        assert!(dates.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn first_sample_of_each_day_wins() {
        let samples = vec![
            sample("2026-10-20 00:00:00", 1.0),
            sample("2026-10-20 03:00:00", 30.0),
            sample("2026-10-21 00:00:00", 2.0),
        ];
        let out = normalize(&samples, "Paris", reference()).unwrap();

        assert_eq!(out.forecast.len(), 2);
        assert_eq!(out.forecast[0].timestamp, "2026-10-20 00:00:00");
        assert_eq!(out.forecast[0].temperature_f, celsius_to_fahrenheit(1.0));
    }

    #[test]
    fn short_input_is_not_padded() {
        // Reference day plus three later days.
        let samples = three_hourly(4);
        let out = normalize(&samples, "Paris", reference()).unwrap();
        assert_eq!(out.forecast.len(), 3);
        assert!(out.forecast.iter().all(|r| !r.timestamp.starts_with("2026-10-19")));
    }

    #[test]
    fn current_weather_comes_from_first_sample() {
        let samples = vec![
            sample("2026-10-19 15:00:00", 0.0),
            sample("2026-10-20 00:00:00", 100.0),
        ];
        let out = normalize(&samples, "Lyon", reference()).unwrap();

        assert_eq!(out.current_weather.city_name, "Lyon");
        assert_eq!(out.current_weather.timestamp, "2026-10-19 15:00:00");
        assert_eq!(out.current_weather.temperature_f, 32.0);
        assert_eq!(out.forecast[0].temperature_f, 212.0);
    }

    #[test]
    fn only_the_reference_day_is_excluded() {
        // Samples before the reference day are not filtered by the core.
        let samples = vec![
            sample("2026-10-18 21:00:00", 5.0),
            sample("2026-10-19 00:00:00", 5.0),
            sample("2026-10-20 00:00:00", 5.0),
        ];
        let out = normalize(&samples, "Paris", reference()).unwrap();

        let dates: Vec<&str> = out.forecast.iter().map(|r| sample_date(&r.timestamp)).collect();
        assert_eq!(dates, ["2026-10-18", "2026-10-20"]);
    }

    #[test]
    fn sample_date_accepts_iso_separator() {
        assert_eq!(sample_date("2026-10-20 09:00:00"), "2026-10-20");
        assert_eq!(sample_date("2026-10-20T09:00:00"), "2026-10-20");
        assert_eq!(sample_date("2026-10-20"), "2026-10-20");
    }
}
