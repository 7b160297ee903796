//! Failure-path tests for the /topics report endpoint.

use axum::http::StatusCode;
use axum_test::TestServer;
use chrono::Utc;
use integration_tests::setup::TestContext;

#[tokio::test]
async fn topic_listing_failure_returns_500_with_empty_body() {
    let ctx = TestContext::csv();
    ctx.gateway.set_fail_topic_listing(true);

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/topics").await;

    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    // No body: a failed cycle must not look like an empty report.
    assert_eq!(response.text(), "");
}

#[tokio::test]
async fn cycle_failure_is_not_sticky() {
    let ctx = TestContext::csv();
    ctx.gateway.add_topic("orders", 1);
    ctx.gateway.add_record("orders", 0, Utc::now());
    ctx.gateway.set_fail_topic_listing(true);

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/topics").await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    // The broker recovers; the next request succeeds.
    ctx.gateway.set_fail_topic_listing(false);

    let response = server.get("/topics").await;
    response.assert_status_ok();
    assert!(response.text().contains("orders,"));
}

#[tokio::test]
async fn unprobeable_topic_is_omitted_not_fatal() {
    let ctx = TestContext::csv();
    ctx.gateway.add_topic("good", 1);
    ctx.gateway.add_record("good", 0, Utc::now());
    ctx.gateway.add_topic("bad", 1);
    ctx.gateway.fail_partitions("bad");

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/topics").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("good,"));
    assert!(!body.contains("bad,"));
}

#[tokio::test]
async fn stopped_worker_returns_503() {
    let ctx = TestContext::csv();
    let router = ctx.stop_worker().await;

    let server = TestServer::new(router).expect("Failed to create test server");
    let response = server.get("/topics").await;

    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
}
