#[cfg(feature = "service")]
mod service_tests {
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use axum::Router;
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;
    use txstats::service::HttpConfig;
    use txstats::{HttpService, ManualClock, TransactionService, WindowAggregator, WindowConfig};

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
    }

    fn create_test_app(now: DateTime<Utc>) -> (Router, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::new(now));
        let aggregator =
            Arc::new(WindowAggregator::new(WindowConfig::from_secs(60, 1)).unwrap());
        let service = TransactionService::with_clock(aggregator, clock.clone());
        let app = HttpService::new(service, HttpConfig::default()).router();
        (app, clock)
    }

    async fn post_transaction(app: &Router, body: Value) -> StatusCode {
        app.clone()
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/transactions")
                    .header("content-type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
            .status()
    }

    async fn get_json(app: &Router, uri: &str) -> (StatusCode, Value) {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    fn millis(at: DateTime<Utc>) -> i64 {
        at.timestamp_millis()
    }

    #[tokio::test]
    async fn test_empty_statistics() {
        let (app, _clock) = create_test_app(base_time());

        let (status, body) = get_json(&app, "/statistics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({"sum": 0.0, "avg": 0.0, "max": 0.0, "min": 0.0, "count": 0})
        );
    }

    #[tokio::test]
    async fn test_statistics_skip_out_of_range_transactions() {
        let now = base_time();
        let (app, _clock) = create_test_app(now);

        let in_range = [(5, 12.3), (20, 4.1), (59, 7.0)];
        let out_of_range = [(61, 100.0), (90, 3.0), (120, 1.0)];

        for (age, amount) in in_range {
            let status = post_transaction(
                &app,
                json!({"timestamp": millis(now - chrono::Duration::seconds(age)), "amount": amount}),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
        }
        for (age, amount) in out_of_range {
            let status = post_transaction(
                &app,
                json!({"timestamp": millis(now - chrono::Duration::seconds(age)), "amount": amount}),
            )
            .await;
            assert_eq!(status, StatusCode::NO_CONTENT);
        }

        let (status, body) = get_json(&app, "/statistics").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], json!(3));
        assert_eq!(body["sum"], json!(23.4));
        assert_eq!(body["avg"], json!(7.8));
        assert_eq!(body["max"], json!(12.3));
        assert_eq!(body["min"], json!(4.1));
    }

    #[tokio::test]
    async fn test_future_transaction_rejected() {
        let now = base_time();
        let (app, _clock) = create_test_app(now);

        let status = post_transaction(
            &app,
            json!({"timestamp": millis(now + chrono::Duration::seconds(1)), "amount": 7.0}),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (_, body) = get_json(&app, "/statistics").await;
        assert_eq!(body["count"], json!(0));

        let (_, metrics) = get_json(&app, "/metrics").await;
        assert_eq!(metrics["transactions_rejected"], json!(1));
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let (app, _clock) = create_test_app(base_time());

        let status = post_transaction(&app, json!({"amount": 1.0})).await;
        assert!(status.is_client_error());

        let status = post_transaction(&app, json!({"timestamp": 0, "amount": "abc"})).await;
        assert!(status.is_client_error());

        let (_, body) = get_json(&app, "/statistics").await;
        assert_eq!(body["count"], json!(0));
    }

    #[tokio::test]
    async fn test_statistics_expire_with_clock() {
        let now = base_time();
        let (app, clock) = create_test_app(now);

        let status = post_transaction(&app, json!({"timestamp": millis(now), "amount": 2.0})).await;
        assert_eq!(status, StatusCode::CREATED);

        clock.advance(chrono::Duration::seconds(59));
        let (_, body) = get_json(&app, "/statistics").await;
        assert_eq!(body["count"], json!(1));

        clock.advance(chrono::Duration::seconds(1));
        let (_, body) = get_json(&app, "/statistics").await;
        assert_eq!(body["count"], json!(0));
        assert_eq!(body["avg"], json!(0.0));
    }

    #[tokio::test]
    async fn test_transactions_cannot_be_deleted() {
        let now = base_time();
        let (app, _clock) = create_test_app(now);
        post_transaction(&app, json!({"timestamp": millis(now), "amount": 2.0})).await;

        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/transactions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);

        let (_, body) = get_json(&app, "/statistics").await;
        assert_eq!(body["count"], json!(1));
        assert_eq!(body["sum"], json!(2.0));
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let (app, _clock) = create_test_app(base_time());

        let (status, body) = get_json(&app, "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], json!("healthy"));
        assert_eq!(body["version"], json!(txstats::VERSION));
    }
}
