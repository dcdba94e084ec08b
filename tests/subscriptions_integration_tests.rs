//! End-to-end tests of the HTTP API over in-memory SQLite

use axum::http::{Method, StatusCode};
use serde_json::json;

mod common;
use common::TestHarness;

const USER: &str = "60601fee-2bf1-4721-ae6f-7636e79a0cba";

#[tokio::test]
async fn test_crud_round_trip() {
    let harness = TestHarness::new().await;

    let id = harness
        .create(json!({
            "service_name": "Yandex Plus",
            "price": 400,
            "user_id": USER,
            "start_date": "07-2025"
        }))
        .await;

    let (status, fetched) = harness
        .request(Method::GET, &format!("/api/v1/subscriptions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["price"], 400);
    assert!(fetched["end_date"].is_null());

    let (status, updated) = harness
        .request(
            Method::PUT,
            &format!("/api/v1/subscriptions/{id}"),
            Some(json!({
                "service_name": "Yandex Plus",
                "price": 450,
                "user_id": USER,
                "start_date": "07-2025",
                "end_date": "12-2025"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price"], 450);
    assert_eq!(updated["end_date"], "12-2025");
    assert_eq!(updated["created_at"], fetched["created_at"]);

    let (status, body) = harness
        .request(Method::DELETE, &format!("/api/v1/subscriptions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = harness
        .request(Method::GET, &format!("/api/v1/subscriptions/{id}"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_filters_by_user_and_service() {
    let harness = TestHarness::new().await;

    for (service, user) in [("Netflix", "u1"), ("Spotify", "u1"), ("Netflix", "u2")] {
        harness
            .create(json!({
                "service_name": service,
                "price": 100,
                "user_id": user,
                "start_date": "01-2025"
            }))
            .await;
    }

    let (status, all) = harness
        .request(Method::GET, "/api/v1/subscriptions", None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(all.as_array().unwrap().len(), 3);

    let (_, mine) = harness
        .request(Method::GET, "/api/v1/subscriptions?user_id=u1", None)
        .await;
    assert_eq!(mine.as_array().unwrap().len(), 2);

    let (_, netflix) = harness
        .request(
            Method::GET,
            "/api/v1/subscriptions?user_id=u1&service_name=Netflix",
            None,
        )
        .await;
    let netflix = netflix.as_array().unwrap();
    assert_eq!(netflix.len(), 1);
    assert_eq!(netflix[0]["service_name"], "Netflix");
}

#[tokio::test]
async fn test_total_scenarios() {
    let harness = TestHarness::new().await;

    // Three billable months inside the period
    harness
        .create(json!({
            "service_name": "Netflix",
            "price": 100,
            "user_id": "u1",
            "start_date": "01-2025",
            "end_date": "03-2025"
        }))
        .await;
    assert_eq!(
        harness
            .total("user_id=u1&start_date=01-2025&end_date=12-2025")
            .await,
        300
    );

    // No overlap
    assert_eq!(
        harness
            .total("user_id=u1&start_date=04-2025&end_date=12-2025")
            .await,
        0
    );

    // Open-ended subscription billed up to the period end only
    harness
        .create(json!({
            "service_name": "Spotify",
            "price": 50,
            "user_id": "u2",
            "start_date": "06-2025"
        }))
        .await;
    assert_eq!(
        harness
            .total("user_id=u2&start_date=01-2025&end_date=06-2025")
            .await,
        50
    );

    // Service filter across a mixed set
    harness
        .create(json!({
            "service_name": "Yandex Plus",
            "price": 40,
            "user_id": "u3",
            "start_date": "03-2025",
            "end_date": "06-2025"
        }))
        .await;
    harness
        .create(json!({
            "service_name": "Netflix",
            "price": 999,
            "user_id": "u3",
            "start_date": "01-2025"
        }))
        .await;
    assert_eq!(
        harness
            .total("user_id=u3&service_name=Yandex%20Plus&start_date=01-2025&end_date=12-2025")
            .await,
        160
    );
}

#[tokio::test]
async fn test_total_is_idempotent_and_monotonic() {
    let harness = TestHarness::new().await;
    harness
        .create(json!({
            "service_name": "Netflix",
            "price": 100,
            "user_id": "u1",
            "start_date": "02-2025"
        }))
        .await;

    let narrow = harness
        .total("user_id=u1&start_date=03-2025&end_date=05-2025")
        .await;
    let again = harness
        .total("user_id=u1&start_date=03-2025&end_date=05-2025")
        .await;
    let wide = harness
        .total("user_id=u1&start_date=01-2025&end_date=12-2025")
        .await;

    assert_eq!(narrow, 300);
    assert_eq!(narrow, again);
    assert!(wide >= narrow);
    assert_eq!(wide, 1100);
}

#[tokio::test]
async fn test_total_validation_errors() {
    let harness = TestHarness::new().await;

    for query in [
        "start_date=01-2025&end_date=12-2025",
        "user_id=u1&end_date=12-2025",
        "user_id=u1&start_date=13-2025&end_date=12-2025",
        "user_id=u1&start_date=12-2025&end_date=01-2025",
    ] {
        let (status, body) = harness
            .request(
                Method::GET,
                &format!("/api/v1/subscriptions/total?{query}"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {query}: {body}");
        assert_eq!(body["error"], "Bad request");
    }
}

#[tokio::test]
async fn test_write_validation_errors() {
    let harness = TestHarness::new().await;

    let invalid = [
        json!({"service_name": "", "price": 1, "user_id": "u1", "start_date": "01-2025"}),
        json!({"service_name": "Netflix", "price": -1, "user_id": "u1", "start_date": "01-2025"}),
        json!({"service_name": "Netflix", "price": 4_611_686_018_427_387_903_i64,
               "user_id": "u1", "start_date": "01-2025"}),
        json!({"service_name": "Netflix", "price": 1, "user_id": "u1", "start_date": "1-2025"}),
        json!({"service_name": "Netflix", "price": 1, "user_id": "u1",
               "start_date": "05-2025", "end_date": "04-2025"}),
    ];

    for body in invalid {
        let (status, response) = harness
            .request(Method::POST, "/api/v1/subscriptions", Some(body.clone()))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "body {body}: {response}");
    }

    let (status, _) = harness
        .request(
            Method::PUT,
            "/api/v1/subscriptions/does-not-exist",
            Some(json!({
                "service_name": "Netflix",
                "price": 1,
                "user_id": "u1",
                "start_date": "01-2025"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_health_endpoints() {
    let harness = TestHarness::new().await;

    let (status, body) = harness.request(Method::GET, "/health?check=database", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checks"]["database"]["status"], "Healthy");

    let (status, body) = harness.request(Method::GET, "/db/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "db ok");

    let (status, doc) = harness.request(Method::GET, "/api/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/v1/subscriptions/total"].is_object());
}

#[tokio::test]
async fn test_total_at_max_price_over_long_period() {
    let harness = TestHarness::new().await;
    harness
        .create(json!({
            "service_name": "Enterprise",
            "price": 1_000_000_000_i64,
            "user_id": "u1",
            "start_date": "01-2000"
        }))
        .await;

    assert_eq!(
        harness
            .total("user_id=u1&start_date=01-2000&end_date=12-2099")
            .await,
        1_200_000_000_000
    );
}
