//! Integration tests for notification subscriptions

mod common;

use chrono::{TimeZone, Utc};
use nokia_health_client::params::{
    CreateNotificationQuery, ListNotificationsQuery, NotificationInfoQuery,
    RevokeNotificationQuery,
};
use nokia_health_shared::Status;
use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

const CALLBACK: &str = "https://example.com/hook";

#[tokio::test]
async fn test_subscribe_and_revoke() {
    let api = common::TestApi::new().await;

    Mock::given(method("GET"))
        .and(path("/notify"))
        .and(query_param("action", "subscribe"))
        .and(query_param("callbackurl", CALLBACK))
        .and(query_param("comment", "scale updates"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 0})))
        .expect(1)
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notify"))
        .and(query_param("action", "revoke"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": 294})))
        .expect(1)
        .mount(&api.server)
        .await;

    let user = api.user();
    let created = user
        .create_notification(&CreateNotificationQuery {
            callback_url: CALLBACK.to_string(),
            comment: "scale updates".to_string(),
            appli: None,
        })
        .await
        .unwrap();
    assert!(created.is_success());

    let revoked = user
        .revoke_notification(&RevokeNotificationQuery {
            callback_url: CALLBACK.to_string(),
            appli: Some(1),
        })
        .await
        .unwrap();
    assert_eq!(revoked.status, Status::SubscriptionNotDeleted);
}

#[tokio::test]
async fn test_notification_info_and_list() {
    let api = common::TestApi::new().await;

    Mock::given(method("GET"))
        .and(path("/notify"))
        .and(query_param("action", "get"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "body": {"expires": 1700000000, "comment": "scale updates"}
        })))
        .mount(&api.server)
        .await;

    Mock::given(method("GET"))
        .and(path("/notify"))
        .and(query_param("action", "list"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": 0,
            "body": {"profiles": [
                {"expires": 1700000000, "comment": "a", "callbackurl": CALLBACK, "appli": 1},
                {"expires": 1700000100, "comment": "b", "callbackurl": CALLBACK, "appli": 4}
            ]}
        })))
        .mount(&api.server)
        .await;

    let user = api.user();
    let info = user
        .notification_info(&NotificationInfoQuery {
            callback_url: CALLBACK.to_string(),
            appli: None,
        })
        .await
        .unwrap()
        .body
        .unwrap();
    assert_eq!(info.comment, "scale updates");
    assert_eq!(
        info.expires_resolved,
        Some(Utc.timestamp_opt(1_700_000_000, 0).unwrap())
    );

    let list = user
        .list_notifications(&ListNotificationsQuery::default())
        .await
        .unwrap()
        .body
        .unwrap();
    let applis: Vec<_> = list.profiles.iter().map(|p| p.appli).collect();
    assert_eq!(applis, vec![Some(1), Some(4)]);
}
