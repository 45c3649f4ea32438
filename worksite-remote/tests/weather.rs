use std::collections::BTreeSet;

use chrono::NaiveDate;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};
use worksite_remote::{Location, Metric, WeatherClient};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn metrics(list: &str) -> BTreeSet<Metric> {
    Metric::parse_list(list).unwrap()
}

fn client(server: &MockServer) -> WeatherClient {
    WeatherClient::with_endpoints(
        &format!("{}/v1/forecast", server.uri()),
        &format!("{}/v1/era5", server.uri()),
    )
    .unwrap()
}

#[tokio::test]
async fn merges_archive_and_forecast() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/era5"))
        .and(query_param("start_date", "2025-10-13"))
        .and(query_param("end_date", "2025-10-14"))
        .and(query_param("hourly", "temperature_2m,precipitation"))
        .and(query_param("timezone", "Pacific/Auckland"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "hourly": {
                "time": ["2025-10-13T00:00", "2025-10-13T01:00", "2025-10-14T00:00"],
                "temperature_2m": [12.0, 14.0, 9.0],
                "precipitation": [0.4, 0.4, null]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("start_date", "2025-10-15"))
        .and(query_param("end_date", "2025-10-16"))
        .and(query_param(
            "daily",
            "precipitation_probability_max,precipitation_sum,temperature_2m_max,temperature_2m_min",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {
                "time": ["2025-10-15", "2025-10-16"],
                "precipitation_probability_max": [80, null],
                "precipitation_sum": [5.04, 0.0],
                "temperature_2m_max": [17.0, 20.0],
                "temperature_2m_min": [10.0, 11.0]
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let today = d(2025, 10, 15);
    let days = client(&server)
        .fetch(
            Location::Auckland,
            &metrics("rain,temp,prob"),
            d(2025, 10, 13),
            d(2025, 10, 16),
            today,
        )
        .await;

    assert_eq!(days.len(), 4);
    assert_eq!(days[&d(2025, 10, 13)].rain_mm, Some(0.8));
    assert_eq!(days[&d(2025, 10, 13)].temp_avg, Some(13.0));
    assert_eq!(days[&d(2025, 10, 13)].prob, None);
    assert_eq!(days[&d(2025, 10, 14)].rain_mm, Some(0.0));
    assert_eq!(days[&d(2025, 10, 15)].prob, Some(80.0));
    assert_eq!(days[&d(2025, 10, 15)].rain_mm, Some(5.0));
    assert_eq!(days[&d(2025, 10, 15)].temp_avg, Some(13.5));
    assert_eq!(days[&d(2025, 10, 16)].prob, None);
}

#[tokio::test]
async fn failing_source_is_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/era5"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream down"))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {"time": ["2025-10-15"], "precipitation_sum": [1.0]}
        })))
        .mount(&server)
        .await;

    let days = client(&server)
        .fetch(
            Location::Wellington,
            &metrics("rain"),
            d(2025, 10, 10),
            d(2025, 10, 15),
            d(2025, 10, 15),
        )
        .await;
    assert_eq!(days.len(), 1);
    assert_eq!(days[&d(2025, 10, 15)].rain_mm, Some(1.0));
}

#[tokio::test]
async fn probability_only_skips_archive() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/era5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"hourly": {}})))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("daily", "precipitation_probability_max"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "daily": {"time": ["2025-10-15"], "precipitation_probability_max": [30]}
        })))
        .mount(&server)
        .await;

    let days = client(&server)
        .fetch(
            Location::Christchurch,
            &metrics("prob"),
            d(2025, 10, 1),
            d(2025, 10, 15),
            d(2025, 10, 15),
        )
        .await;
    assert_eq!(days.len(), 1);
    assert_eq!(days[&d(2025, 10, 15)].prob, Some(30.0));
}

#[tokio::test]
async fn range_beyond_one_month_makes_no_requests() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let days = client(&server)
        .fetch(
            Location::Auckland,
            &metrics("rain,temp"),
            d(2026, 1, 1),
            d(2026, 1, 31),
            d(2025, 10, 15),
        )
        .await;
    assert!(days.is_empty());
}
