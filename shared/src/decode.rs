//! Decoding entry points
//!
//! Each function parses a raw response payload and resolves the body's date
//! fields. A body that fails to reconcile fails the whole decode; there are
//! no partially resolved results.

use serde::de::DeserializeOwned;

use crate::dates::Reconcile;
use crate::errors::DecodeResult;
use crate::types::*;

fn decode_reconciled<B>(bytes: &[u8]) -> DecodeResult<ApiResponse<B>>
where
    B: DeserializeOwned + Reconcile,
{
    let mut response: ApiResponse<B> = serde_json::from_slice(bytes)?;
    if let Some(body) = response.body.as_mut() {
        body.reconcile()?;
    }
    Ok(response)
}

/// Body measures carry only epoch dates; use
/// [`BodyMeasuresResponse::parse_data`] to normalize them.
pub fn decode_body_measures(bytes: &[u8]) -> DecodeResult<BodyMeasuresResponse> {
    Ok(serde_json::from_slice(bytes)?)
}

pub fn decode_activity_measures(bytes: &[u8]) -> DecodeResult<ActivityMeasuresResponse> {
    decode_reconciled(bytes)
}

pub fn decode_intraday_activity(bytes: &[u8]) -> DecodeResult<IntradayActivityResponse> {
    decode_reconciled(bytes)
}

pub fn decode_workouts(bytes: &[u8]) -> DecodeResult<WorkoutsResponse> {
    decode_reconciled(bytes)
}

pub fn decode_sleep_measures(bytes: &[u8]) -> DecodeResult<SleepMeasuresResponse> {
    decode_reconciled(bytes)
}

pub fn decode_sleep_summary(bytes: &[u8]) -> DecodeResult<SleepSummaryResponse> {
    decode_reconciled(bytes)
}

pub fn decode_notification_info(bytes: &[u8]) -> DecodeResult<NotificationInfoResponse> {
    decode_reconciled(bytes)
}

pub fn decode_notification_list(bytes: &[u8]) -> DecodeResult<NotificationListResponse> {
    decode_reconciled(bytes)
}

/// Status-only responses from subscribe and revoke calls
pub fn decode_ack(bytes: &[u8]) -> DecodeResult<AckResponse> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DecodeError;
    use crate::models::{MeasType, SleepState, Status, WorkoutType};
    use chrono::{DateTime, Utc};

    fn utc(s: &str) -> DateTime<Utc> {
        s.parse().unwrap()
    }

    // =========================================================================
    // Body Measures
    // =========================================================================

    const BODY_MEASURES: &str = r#"{
        "status": 0,
        "body": {
            "updatetime": 1686800000,
            "timezone": "Europe/Paris",
            "more": 0,
            "offset": 0,
            "measuregrps": [
                {"grpid": 11, "attrib": 0, "date": 1686787200, "category": 1,
                 "measures": [{"value": 7913, "type": 1, "unit": -3},
                              {"value": 215, "type": 6, "unit": -1}]},
                {"grpid": 12, "attrib": 2, "date": 1686700800, "category": 2,
                 "measures": [{"value": 70000, "type": 1, "unit": -3},
                              {"value": 5, "type": 9999, "unit": 0}]}
            ]
        }
    }"#;

    #[test]
    fn test_decode_body_measures() {
        let response = decode_body_measures(BODY_MEASURES.as_bytes()).unwrap();
        assert!(response.is_success());

        let body = response.body.as_ref().unwrap();
        assert_eq!(body.measure_groups.len(), 2);
        assert_eq!(body.measure_groups[0].measures[0].mantissa, 7913);
        assert_eq!(body.measure_groups[0].measures[0].exponent, -3);
        assert!(body.parsed.is_none());

        let parsed = response.parse_data();
        assert_eq!(parsed.len(), 3);
        let weights: Vec<f64> = parsed[MeasType::Weight].iter().map(|m| m.value).collect();
        assert_eq!(weights, vec![7.913, 70.0]);
        assert_eq!(parsed[MeasType::FatRatio][0].value, 21.5);
    }

    #[test]
    fn test_parse_data_without_body_is_empty() {
        let response = decode_body_measures(br#"{"status": 401}"#).unwrap();
        assert_eq!(response.status, Status::Other(401));
        assert!(response.body.is_none());
        assert!(response.parse_data().is_empty());
    }

    #[test]
    fn test_malformed_payload_is_json_error() {
        let err = decode_body_measures(b"{\"status\": ").unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }

    #[test]
    fn test_out_of_range_group_date_is_rejected() {
        let payload = r#"{"status":0,"body":{"measuregrps":[
            {"date": 9223372036854775807, "measures": []}]}}"#;
        assert!(matches!(
            decode_body_measures(payload.as_bytes()),
            Err(DecodeError::Json(_))
        ));
    }

    // =========================================================================
    // Activity
    // =========================================================================

    #[test]
    fn test_decode_single_day_activity() {
        let payload = r#"{"status":0,"body":{
            "date": "2023-06-15", "timezone": "America/Denver",
            "steps": 8042, "distance": 6123.5, "calories": 320.2,
            "elevation": 12, "soft": 3600, "moderate": 900, "intense": 300
        }}"#;
        let response = decode_activity_measures(payload.as_bytes()).unwrap();
        let body = response.body.unwrap();

        assert!(body.single_value);
        assert_eq!(body.steps, Some(8042.0));
        assert_eq!(
            body.date_resolved.unwrap().with_timezone(&Utc),
            utc("2023-06-15T06:00:00Z")
        );
        assert!(body.activities.is_empty());
    }

    #[test]
    fn test_decode_activity_range() {
        let payload = r#"{"status":0,"body":{"activities":[
            {"date": "2023-06-14", "timezone": "Europe/Paris", "steps": 1000},
            {"date": "2023-06-15", "timezone": "Asia/Tokyo", "steps": 2000}
        ], "more": false, "offset": 0}}"#;
        let body = decode_activity_measures(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();

        assert!(!body.single_value);
        assert_eq!(body.activities.len(), 2);
        assert_eq!(
            body.activities[0].date_resolved.unwrap().with_timezone(&Utc),
            utc("2023-06-13T22:00:00Z")
        );
        assert_eq!(
            body.activities[1].date_resolved.unwrap().with_timezone(&Utc),
            utc("2023-06-14T15:00:00Z")
        );
    }

    #[test]
    fn test_activity_alias_key() {
        let payload = r#"{"status":0,"body":{"activity":[
            {"date": "2023-06-15", "timezone": "UTC", "steps": 5}
        ]}}"#;
        let body = decode_activity_measures(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();
        assert_eq!(body.activities.len(), 1);
    }

    #[test]
    fn test_activity_null_values() {
        let payload = r#"{"status":0,"body":{
            "date": "2023-06-15", "timezone": "UTC",
            "steps": null, "calories": null, "soft": null,
            "activities": null, "more": null, "offset": null
        }}"#;
        let body = decode_activity_measures(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();

        assert!(body.single_value);
        assert_eq!(body.steps, None);
        assert_eq!(body.soft, None);
        assert!(body.activities.is_empty());
        assert_eq!(body.offset, 0);
    }

    #[test]
    fn test_activity_unknown_zone_fails_whole_decode() {
        let payload = r#"{"status":0,"body":{"activities":[
            {"date": "2023-06-14", "timezone": "UTC"},
            {"date": "2023-06-15", "timezone": "Mars/Phobos"}
        ]}}"#;
        let err = decode_activity_measures(payload.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::UnknownTimeZone(name) if name == "Mars/Phobos"));
    }

    #[test]
    fn test_activity_bad_date_fails_whole_decode() {
        let payload = r#"{"status":0,"body":{"date":"2023-13-99","timezone":"UTC"}}"#;
        let err = decode_activity_measures(payload.as_bytes()).unwrap_err();
        assert!(matches!(err, DecodeError::DateParse { .. }));
    }

    // =========================================================================
    // Intraday
    // =========================================================================

    #[test]
    fn test_decode_intraday_activity() {
        let payload = r#"{"status":0,"body":{"series":{
            "1686787260": {"steps": 12, "duration": 60},
            "1686787200": {"calories": 1.5, "distance": 8.2}
        }}}"#;
        let body = decode_intraday_activity(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();

        let starts: Vec<_> = body.series.values().map(|s| s.start_resolved).collect();
        assert_eq!(
            starts,
            vec![
                Some(utc("2023-06-15T00:00:00Z")),
                Some(utc("2023-06-15T00:01:00Z"))
            ]
        );
        assert_eq!(body.series[&1_686_787_260].steps, Some(12));
    }

    #[test]
    fn test_out_of_range_intraday_key_is_rejected() {
        let payload = r#"{"status":0,"body":{"series":{
            "9223372036854775807": {"steps": 1}
        }}}"#;
        assert!(matches!(
            decode_intraday_activity(payload.as_bytes()),
            Err(DecodeError::Json(_))
        ));
    }

    #[test]
    fn test_null_intraday_series_is_empty() {
        let payload = r#"{"status":0,"body":{"series":null}}"#;
        let body = decode_intraday_activity(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();
        assert!(body.series.is_empty());
    }

    // =========================================================================
    // Workouts
    // =========================================================================

    #[test]
    fn test_decode_workouts() {
        let payload = r#"{"status":0,"body":{"series":[{
            "id": 7, "userid": 42, "category": 7,
            "startdate": 1686837600, "enddate": 1686841200,
            "date": "2023-06-15", "timezone": "America/Denver",
            "model": 16, "attrib": 7, "modified": 1686841300,
            "data": {"calories": 410.5, "intensity": 30, "distance": 8000}
        }], "more": false, "offset": 0}}"#;
        let body = decode_workouts(payload.as_bytes()).unwrap().body.unwrap();
        let workout = &body.series[0];

        assert_eq!(workout.category, Some(WorkoutType::Swim));
        assert_eq!(workout.user_id, 42);
        assert_eq!(workout.start_resolved, Some(utc("2023-06-15T14:00:00Z")));
        assert_eq!(workout.end_resolved, Some(utc("2023-06-15T15:00:00Z")));
        // Calendar date is not derived from the epoch fields
        assert_eq!(
            workout.date_resolved.unwrap().with_timezone(&Utc),
            utc("2023-06-15T06:00:00Z")
        );
        assert_eq!(workout.data["calories"], Some(410.5));
    }

    #[test]
    fn test_workout_null_metric_is_kept() {
        let payload = r#"{"status":0,"body":{"series":[
            {"startdate": 0, "enddate": 60, "data": {"calories": null, "steps": 10}}
        ], "more": null, "offset": null}}"#;
        let body = decode_workouts(payload.as_bytes()).unwrap().body.unwrap();
        let workout = &body.series[0];

        assert_eq!(workout.data["calories"], None);
        assert_eq!(workout.data["steps"], Some(10.0));
        assert!(!body.more);
    }

    #[test]
    fn test_workout_without_calendar_date() {
        let payload = r#"{"status":0,"body":{"series":[
            {"startdate": 0, "enddate": 60, "category": 12345}
        ]}}"#;
        let body = decode_workouts(payload.as_bytes()).unwrap().body.unwrap();
        assert_eq!(body.series[0].category, Some(WorkoutType::Other(12345)));
        assert!(body.series[0].date_resolved.is_none());
    }

    // =========================================================================
    // Sleep
    // =========================================================================

    #[test]
    fn test_decode_sleep_measures() {
        let payload = r#"{"status":0,"body":{"series":[
            {"startdate": 1686787200, "enddate": 1686789000, "state": 1},
            {"startdate": 1686789000, "enddate": 1686790800, "state": 3},
            {"startdate": 1686790800, "enddate": 1686791400, "state": 8}
        ], "model": 32}}"#;
        let body = decode_sleep_measures(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();

        let states: Vec<_> = body.series.iter().map(|s| s.state).collect();
        assert_eq!(
            states,
            vec![SleepState::LightSleep, SleepState::Rem, SleepState::Other(8)]
        );
        assert_eq!(body.series[1].start_resolved, Some(utc("2023-06-15T00:30:00Z")));
    }

    #[test]
    fn test_decode_sleep_summary() {
        let payload = r#"{"status":0,"body":{"series":[{
            "id": 99, "startdate": 1686780000, "enddate": 1686808800,
            "date": "2023-06-15", "timezone": "Europe/Paris", "model": 32,
            "data": {"wakeupduration": 600, "lightsleepduration": 14400,
                     "deepsleepduration": 7200, "wakeupcount": 2,
                     "durationtosleep": 540}
        }], "more": false}}"#;
        let body = decode_sleep_summary(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();
        let summary = &body.series[0];

        assert_eq!(summary.data.deepsleepduration, 7200);
        assert_eq!(summary.data.remsleepduration, None);
        assert_eq!(summary.data.durationtowakeup, None);
        assert_eq!(
            summary.date_resolved.unwrap().with_timezone(&Utc),
            utc("2023-06-14T22:00:00Z")
        );
    }

    #[test]
    fn test_sleep_summary_null_durations() {
        let payload = r#"{"status":0,"body":{"series":[{
            "startdate": 1686780000, "enddate": 1686808800,
            "data": {"wakeupduration": null, "deepsleepduration": 3600,
                     "remsleepduration": null}
        }]}}"#;
        let body = decode_sleep_summary(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();
        let data = &body.series[0].data;

        assert_eq!(data.wakeupduration, 0);
        assert_eq!(data.deepsleepduration, 3600);
        assert_eq!(data.remsleepduration, None);
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    #[test]
    fn test_decode_notification_info() {
        let payload = r#"{"status":0,"body":{"expires":2147483647,"comment":"scale"}}"#;
        let body = decode_notification_info(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();
        assert_eq!(body.comment, "scale");
        assert_eq!(body.expires_resolved, Some(utc("2038-01-19T03:14:07Z")));
    }

    #[test]
    fn test_decode_notification_list() {
        let payload = r#"{"status":0,"body":{"profiles":[
            {"expires": 2147483647, "comment": "a", "callbackurl": "https://example.com/cb", "appli": 1},
            {"expires": 0, "comment": "b"}
        ]}}"#;
        let body = decode_notification_list(payload.as_bytes())
            .unwrap()
            .body
            .unwrap();

        assert_eq!(body.profiles.len(), 2);
        assert_eq!(body.profiles[0].appli, Some(1));
        assert_eq!(body.profiles[1].callbackurl, None);
        assert_eq!(body.profiles[1].expires_resolved, Some(utc("1970-01-01T00:00:00Z")));
    }

    #[test]
    fn test_decode_ack_with_error_status() {
        let response = decode_ack(br#"{"status": 293, "error": "Invalid callback"}"#).unwrap();
        assert_eq!(response.status, Status::InvalidCallbackUrl);
        assert!(!response.is_success());
        assert_eq!(response.error.as_deref(), Some("Invalid callback"));
    }

    #[test]
    fn test_error_status_with_partial_body_still_decodes() {
        let payload = r#"{"status":601,"body":{"series":[]}}"#;
        let response = decode_sleep_measures(payload.as_bytes()).unwrap();
        assert_eq!(response.status, Status::TooManyRequests);
        assert!(response.body.unwrap().series.is_empty());
    }
}
