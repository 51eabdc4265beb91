//! Integration tests for sleep endpoints

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use nokia_health_client::params::{SleepMeasuresQuery, SleepSummaryQuery};
use nokia_health_shared::SleepState;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_sleep_measures() {
    let api = common::TestApi::new().await;

    Mock::given(method("GET"))
        .and(path("/v2/sleep"))
        .and(query_param("action", "get"))
        .and(query_param("startdate", "1686780000"))
        .and(query_param("enddate", "1686808800"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "body": {"series": [
                {"startdate": 1686780000, "enddate": 1686783600, "state": 0},
                {"startdate": 1686783600, "enddate": 1686790800, "state": 2}
            ], "model": 32}
        })))
        .expect(1)
        .mount(&api.server)
        .await;

    let query = SleepMeasuresQuery {
        start_date: Utc.timestamp_opt(1_686_780_000, 0).unwrap(),
        end_date: Utc.timestamp_opt(1_686_808_800, 0).unwrap(),
    };
    let body = api
        .user()
        .get_sleep_measures(&query)
        .await
        .unwrap()
        .body
        .unwrap();

    assert_eq!(body.series.len(), 2);
    assert_eq!(body.series[0].state, SleepState::Awake);
    assert_eq!(body.series[1].state, SleepState::DeepSleep);
    assert_eq!(
        body.series[1].end_resolved,
        Some(Utc.timestamp_opt(1_686_790_800, 0).unwrap())
    );
}

#[tokio::test]
async fn test_sleep_summary() {
    let api = common::TestApi::new().await;

    Mock::given(method("GET"))
        .and(path("/v2/sleep"))
        .and(query_param("action", "getsummary"))
        .and(query_param("startdateymd", "2023-06-10"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "body": {"series": [{
                "id": 5, "startdate": 1686780000, "enddate": 1686808800,
                "date": "2023-06-15", "timezone": "America/Denver",
                "data": {"wakeupduration": 300, "lightsleepduration": 12000,
                         "deepsleepduration": 6000, "remsleepduration": 4000,
                         "wakeupcount": 1, "durationtosleep": 600,
                         "durationtowakeup": 120}
            }], "more": false}
        })))
        .mount(&api.server)
        .await;

    let query = SleepSummaryQuery {
        start_date: NaiveDate::from_ymd_opt(2023, 6, 10),
        ..Default::default()
    };
    let body = api
        .user()
        .get_sleep_summary(&query)
        .await
        .unwrap()
        .body
        .unwrap();
    let summary = &body.series[0];

    assert_eq!(summary.data.remsleepduration, Some(4000));
    assert_eq!(summary.data.durationtowakeup, Some(120));
    assert_eq!(
        summary.date_resolved.unwrap().with_timezone(&Utc),
        Utc.with_ymd_and_hms(2023, 6, 15, 6, 0, 0).unwrap()
    );
}
