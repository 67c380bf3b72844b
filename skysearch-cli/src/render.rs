use std::fmt::Write;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, Utc};
use skysearch_core::{ForecastResult, HistoryEntry, WeatherRecord, forecast::FORECAST_DAYS};

fn us_date(date: NaiveDate) -> String {
    date.format("%-m/%-d/%Y").to_string()
}

fn record_date(record: &WeatherRecord) -> Option<NaiveDate> {
    NaiveDateTime::parse_from_str(&record.timestamp, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.date())
        .or_else(|_| NaiveDate::parse_from_str(&record.timestamp, "%Y-%m-%d"))
        .ok()
}

/// Today's date at the city, given its UTC offset in seconds.
fn city_date(now: DateTime<Utc>, offset_seconds: i32) -> NaiveDate {
    match FixedOffset::east_opt(offset_seconds) {
        Some(offset) => now.with_timezone(&offset).date_naive(),
        None => now.date_naive(),
    }
}

/// Forecast days from tomorrow (relative to `today`) onward, at most five.
pub fn upcoming_days(forecast: &[WeatherRecord], today: NaiveDate) -> Vec<&WeatherRecord> {
    let Some(tomorrow) = today.succ_opt() else {
        return Vec::new();
    };

    forecast
        .iter()
        .filter(|record| record_date(record).is_some_and(|date| date >= tomorrow))
        .take(FORECAST_DAYS)
        .collect()
}

fn conditions(out: &mut String, record: &WeatherRecord, indent: &str) {
    let _ = writeln!(out, "{indent}Temp: {:.1} °F", record.temperature_f);
    let _ = writeln!(out, "{indent}Wind: {} MPH", record.wind_speed);
    let _ = writeln!(out, "{indent}Humidity: {} %", record.humidity);
}

/// Current conditions followed by the forecast cards.
pub fn forecast(result: &ForecastResult, now: DateTime<Utc>, today: NaiveDate) -> String {
    let current = &result.current_weather;
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{} ({}) {}",
        current.city_name,
        us_date(city_date(now, result.timezone_offset_seconds)),
        current.description,
    );
    conditions(&mut out, current, "");

    let _ = writeln!(out);
    let _ = writeln!(out, "5-Day Forecast:");
    for record in upcoming_days(&result.forecast, today) {
        let date = record_date(record).map(us_date).unwrap_or_default();
        let _ = writeln!(out, "  {} {} [{}]", date, record.description, record.icon);
        conditions(&mut out, record, "    ");
    }

    out
}

pub fn history(entries: &[HistoryEntry]) -> String {
    if entries.is_empty() {
        return "No Previous Search History\n".to_string();
    }

    let mut out = String::new();
    for entry in entries {
        let _ = writeln!(out, "{:>15}  {}", entry.id, entry.name);
    }
    out
}
