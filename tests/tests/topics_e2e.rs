//! End-to-end tests for the /topics report endpoint.
//!
//! These run the real router, coordinator and reporters against a scripted
//! in-memory broker, so everything but the Kafka client itself is exercised.

use axum_test::TestServer;
use chrono::{Duration, Utc};
use integration_tests::setup::TestContext;

#[tokio::test]
async fn csv_report_classifies_and_orders_topics() {
    let now = Utc::now();
    let ctx = TestContext::csv();

    // Written an hour ago: active.
    ctx.gateway.add_topic("orders", 1);
    ctx.gateway.add_record("orders", 0, now - Duration::hours(1));

    // Last written 30 days ago but read yesterday: still active.
    ctx.gateway.add_topic("sessions", 2);
    ctx.gateway.add_record("sessions", 0, now - Duration::days(30));
    ctx.gateway.commit(
        "session-readers",
        "sessions",
        0,
        1,
        &(now - Duration::days(1)).to_rfc3339(),
    );

    // Untouched for 30 days: inactive.
    ctx.gateway.add_topic("audit", 1);
    ctx.gateway.add_record("audit", 0, now - Duration::days(30));

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/topics").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "text/csv");

    let body = response.text();
    let lines: Vec<&str> = body.lines().collect();

    assert_eq!(
        lines[0],
        "Topic,LastWriteTime,LastReadTime,PartitionNumber,Active"
    );
    // Rows come back in the broker's listing order.
    assert_eq!(lines.len(), 4);
    assert!(lines[1].starts_with("orders,") && lines[1].ends_with(",true"));
    assert!(lines[2].starts_with("sessions,") && lines[2].ends_with(",true"));
    assert!(lines[3].starts_with("audit,") && lines[3].ends_with(",false"));
}

#[tokio::test]
async fn csv_report_leaves_unknown_times_empty() {
    let ctx = TestContext::csv();
    ctx.gateway.add_topic("empty-topic", 3);

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/topics").await;
    response.assert_status_ok();

    let body = response.text();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[1], "empty-topic,,,3,false");
}

#[tokio::test]
async fn json_report_uses_pascal_case_fields() {
    let now = Utc::now();
    let ctx = TestContext::json();
    ctx.gateway.add_topic("orders", 2);
    ctx.gateway.add_record("orders", 1, now - Duration::hours(3));

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");
    let response = server.get("/topics").await;
    response.assert_status_ok();
    assert_eq!(response.header("content-type"), "application/json");

    let body: serde_json::Value = response.json();
    let topics = body.as_array().expect("report should be a JSON array");
    assert_eq!(topics.len(), 1);

    let topic = &topics[0];
    assert_eq!(topic["TopicName"], "orders");
    assert_eq!(topic["PartitionNumber"], 2);
    assert_eq!(topic["Active"], true);
    assert!(topic["LastWriteTime"].is_string());
    assert!(topic["LastReadTime"].is_null());
}

#[tokio::test]
async fn empty_cluster_still_yields_a_report() {
    let ctx = TestContext::csv();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/topics").await;
    response.assert_status_ok();
    assert_eq!(
        response.text(),
        "Topic,LastWriteTime,LastReadTime,PartitionNumber,Active\n"
    );

    let ctx = TestContext::json();
    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let response = server.get("/topics").await;
    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body, serde_json::json!([]));
}

#[tokio::test]
async fn each_request_recomputes_the_report() {
    let now = Utc::now();
    let ctx = TestContext::csv();
    ctx.gateway.add_topic("orders", 1);

    let server = TestServer::new(ctx.router.clone()).expect("Failed to create test server");

    let first = server.get("/topics").await;
    first.assert_status_ok();
    assert!(first.text().contains("orders,,,1,false"));

    // A record arriving between requests flips the next report.
    ctx.gateway.add_record("orders", 0, now);

    let second = server.get("/topics").await;
    second.assert_status_ok();
    assert!(second.text().contains(",true"));
}
