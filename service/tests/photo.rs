//! Profile-photo upload tests against a mock image host.

mod common;

use axum::http::StatusCode;
use common::TestHarness;
use ledgerly_store::Store;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn upload_stores_the_hosted_url_and_propagates_it() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "url": "https://img.example/hosted/alice.png" },
        })))
        .expect(1)
        .mount(&host)
        .await;

    let harness = TestHarness::with_upload_url(Some(host.uri()));
    let alice = harness.create_user("alice").await;
    let bob = harness.create_user("bob").await;
    harness.befriend(&alice, &bob).await;

    let response = harness
        .server
        .post("/v1/users/me/photo?filename=alice.png")
        .add_header("authorization", harness.auth_header(&alice))
        .bytes(vec![0x89, b'P', b'N', b'G'].into())
        .await;

    response.assert_status_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["url"], "https://img.example/hosted/alice.png");

    // Account document and relationship snapshot both carry the new URL
    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert_eq!(user.photo_url.as_deref(), Some("https://img.example/hosted/alice.png"));

    let friendships = harness.store.friendships_for_user(&alice).unwrap();
    assert_eq!(
        friendships[0].users[&alice].photo_url.as_deref(),
        Some("https://img.example/hosted/alice.png")
    );
}

#[tokio::test]
async fn host_error_message_is_surfaced() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "success": false,
            "error": { "message": "File too large" },
        })))
        .mount(&host)
        .await;

    let harness = TestHarness::with_upload_url(Some(host.uri()));
    let alice = harness.create_user("alice").await;

    let response = harness
        .server
        .post("/v1/users/me/photo")
        .add_header("authorization", harness.auth_header(&alice))
        .bytes(vec![1, 2, 3].into())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "File too large");

    // Nothing was propagated
    let user = harness.store.get_user(&alice).unwrap().unwrap();
    assert!(user.photo_url.is_none());
}

#[tokio::test]
async fn declared_failure_in_a_success_response_is_an_error() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "error": { "message": "Unsupported format" },
        })))
        .mount(&host)
        .await;

    let harness = TestHarness::with_upload_url(Some(host.uri()));
    let alice = harness.create_user("alice").await;

    let response = harness
        .server
        .post("/v1/users/me/photo")
        .add_header("authorization", harness.auth_header(&alice))
        .bytes(vec![1, 2, 3].into())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "Unsupported format");
}

#[tokio::test]
async fn unparseable_host_failure_uses_the_generic_fallback() {
    let host = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&host)
        .await;

    let harness = TestHarness::with_upload_url(Some(host.uri()));
    let alice = harness.create_user("alice").await;

    let response = harness
        .server
        .post("/v1/users/me/photo")
        .add_header("authorization", harness.auth_header(&alice))
        .bytes(vec![1, 2, 3].into())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    let message = body["error"]["message"].as_str().unwrap();
    assert!(message.contains("500"), "unexpected message: {message}");
}

#[tokio::test]
async fn upload_without_a_configured_host_is_rejected() {
    let harness = TestHarness::new();
    let alice = harness.create_user("alice").await;

    let response = harness
        .server
        .post("/v1/users/me/photo")
        .add_header("authorization", harness.auth_header(&alice))
        .bytes(vec![1, 2, 3].into())
        .await;

    response.assert_status(StatusCode::BAD_GATEWAY);
    let body: serde_json::Value = response.json();
    assert_eq!(body["error"]["message"], "Image host not configured");
}
