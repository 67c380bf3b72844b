//! End-to-end search against a mock OpenWeather server.

use chrono::{Duration, Utc};
use skysearch_core::{Config, Error, SkySearch};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Forecast list with eight 3-hour entries per day, starting today (UTC).
fn forecast_payload(days: i64) -> serde_json::Value {
    let today = Utc::now().date_naive();
    let list: Vec<serde_json::Value> = (0..days)
        .flat_map(|day| {
            (0..8).map(move |slot| {
                serde_json::json!({
                    "dt_txt": format!("{} {:02}:00:00", today + Duration::days(day), slot * 3),
                    "main": { "temp": 10.0 + day as f64, "humidity": 65 },
                    "weather": [{ "icon": "02d", "description": "few clouds" }],
                    "wind": { "speed": 5.5 }
                })
            })
        })
        .collect();

    serde_json::json!({
        "cod": "200",
        "city": { "name": "London", "timezone": 3600 },
        "list": list
    })
}

async fn mount_london(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "London"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "name": "London", "lat": 51.5, "lon": -0.12 }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/data/2.5/forecast"))
        .and(query_param("lat", "51.5"))
        .and(query_param("lon", "-0.12"))
        .respond_with(ResponseTemplate::new(200).set_body_json(forecast_payload(6)))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/geo/1.0/direct"))
        .and(query_param("q", "Atlantis"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(server)
        .await;
}

fn config_for(server: &MockServer, dir: &tempfile::TempDir) -> Config {
    Config {
        api_key: Some("test_key".into()),
        base_url: Some(server.uri()),
        history_file: Some(dir.path().join("searchHistory.json")),
        timeout_secs: Some(5),
    }
}

#[tokio::test]
async fn search_returns_five_days_and_records_history() {
    let server = MockServer::start().await;
    mount_london(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let app = SkySearch::from_config(&config_for(&server, &dir)).unwrap();
    let outcome = app.search("London").await.unwrap();

    let weather = outcome.weather;
    assert_eq!(weather.current_weather.city_name, "London");
    assert_eq!(weather.current_weather.temperature_f, 50.0);
    assert_eq!(weather.timezone_offset_seconds, 3600);
    assert_eq!(weather.forecast.len(), 5);
    assert!(weather.forecast.iter().all(|r| r.timestamp.ends_with("00:00:00")));

    let entry = outcome.history.unwrap().unwrap();
    assert_eq!(entry.name, "London");

    let history = app.list_history().await;
    assert_eq!(history, vec![entry.clone()]);

    app.remove_from_history(entry.id).await.unwrap();
    assert!(app.list_history().await.is_empty());
}

#[tokio::test]
async fn unknown_city_reports_no_location_and_leaves_history_alone() {
    let server = MockServer::start().await;
    mount_london(&server).await;
    let dir = tempfile::tempdir().unwrap();

    let app = SkySearch::from_config(&config_for(&server, &dir)).unwrap();
    let err = app.search("Atlantis").await.unwrap_err();

    assert!(matches!(err, Error::NoLocationFound(_)));
    assert_eq!(err.user_message(), "City not found.");
    assert!(app.list_history().await.is_empty());
}

#[tokio::test]
async fn history_is_shared_between_instances_on_the_same_file() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(&server, &dir);

    let first = SkySearch::from_config(&config).unwrap();
    first.add_to_history("Paris").await.unwrap();
    first.add_to_history("Lyon").await.unwrap();

    let second = SkySearch::from_config(&config).unwrap();
    let names: Vec<String> = second.list_history().await.into_iter().map(|e| e.name).collect();
    assert_eq!(names, ["Paris", "Lyon"]);
}
