use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::Value;
use subscriptions_service::{Server, test_utils::TestServerBuilder};
use tower::ServiceExt;

/// Full application over in-memory SQLite, driven through `oneshot`
pub struct TestHarness {
    #[allow(dead_code)]
    pub server: Server,
    pub app: Router,
}

impl TestHarness {
    pub async fn new() -> Self {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();
        Self { server, app }
    }

    /// Send a request and decode the JSON body (`Value::Null` when empty)
    pub async fn request(&self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        let body = match body {
            Some(value) => {
                builder = builder.header("content-type", "application/json");
                Body::from(value.to_string())
            }
            None => Body::empty(),
        };

        let response = self
            .app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, value)
    }

    /// Create a subscription and return its id
    #[allow(dead_code)]
    pub async fn create(&self, body: Value) -> String {
        let (status, created) = self
            .request(Method::POST, "/api/v1/subscriptions", Some(body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {created}");
        created["id"].as_str().unwrap().to_string()
    }

    /// Query the total endpoint and return the number
    #[allow(dead_code)]
    pub async fn total(&self, query: &str) -> i64 {
        let (status, body) = self
            .request(
                Method::GET,
                &format!("/api/v1/subscriptions/total?{query}"),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "total failed: {body}");
        body["total"].as_i64().unwrap()
    }
}
