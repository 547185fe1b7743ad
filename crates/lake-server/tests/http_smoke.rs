mod common;

use axum::http::StatusCode;

#[tokio::test]
async fn health_ready_metrics_endpoints() {
    let (app, state) = common::empty_app();

    // /healthz returns 200 and increments a counter
    let (status, _) = common::get(&app, "/healthz").await;
    assert_eq!(status, StatusCode::OK);

    // /readyz initially 503
    let (status, _) = common::get(&app, "/readyz").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

    // Set ready
    lake_server::set_ready(&state, true);

    // /readyz now 200
    let (status, _) = common::get(&app, "/readyz").await;
    assert_eq!(status, StatusCode::OK);

    // /metrics returns prometheus text and contains our counter
    let res = {
        use axum::body::Body;
        use axum::http::Request;
        use tower::ServiceExt;
        app.clone()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap()
    };
    assert_eq!(res.status(), StatusCode::OK);
    let ct = res.headers().get("content-type").unwrap().to_str().unwrap();
    assert!(ct.starts_with("text/plain"));
    let body = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("lakewatch_requests_total"));
}

#[tokio::test]
async fn health_reports_status_and_timestamp() {
    let (app, _state) = common::empty_app();

    let (status, body) = common::get_json(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    let timestamp = body["timestamp"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_rfc3339(timestamp).is_ok());
}

#[tokio::test]
async fn not_found_lookups_are_counted() {
    let (app, _state) = common::empty_app();

    let (status, _) = common::get(&app, "/api/lakes/atlantis/water-quality").await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = common::get(&app, "/metrics").await;
    let text = String::from_utf8(body).unwrap();
    assert!(text.contains("lakewatch_not_found_total"));
}

#[tokio::test]
async fn cross_origin_requests_are_allowed() {
    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    let (app, _state) = common::empty_app();

    let res = app
        .oneshot(
            Request::builder()
                .uri("/api/lakes/hussain-sagar/temporal-data")
                .header("origin", "http://localhost:5173")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let allow = res
        .headers()
        .get("access-control-allow-origin")
        .unwrap()
        .to_str()
        .unwrap();
    assert_eq!(allow, "*");
}
