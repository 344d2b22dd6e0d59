//! Common test utilities for ledgerly integration tests.

#![allow(dead_code)] // Some utilities are used by different test files

use std::sync::Arc;

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use tempfile::TempDir;

use ledgerly_core::UserId;
use ledgerly_service::auth::JwtClaims;
use ledgerly_service::{create_router, AppState, ServiceConfig};
use ledgerly_store::RocksStore;

/// HS256 secret the harness signs test tokens with.
pub const TEST_SECRET: &str = "test-signing-secret";

/// Test harness containing everything needed for integration tests.
pub struct TestHarness {
    /// The test server for making HTTP requests.
    pub server: TestServer,
    /// Temporary directory for the database (kept alive for test duration).
    pub _temp_dir: TempDir,
    /// Direct handle on the store, for assertions behind the API's back.
    pub store: Arc<RocksStore>,
}

impl TestHarness {
    /// Create a new test harness with a fresh database.
    pub fn new() -> Self {
        Self::with_upload_url(None)
    }

    /// Create a harness whose image host points at the given URL.
    pub fn with_upload_url(upload_url: Option<String>) -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let store = Arc::new(RocksStore::open(temp_dir.path()).expect("Failed to open store"));

        let config = ServiceConfig {
            listen_addr: "127.0.0.1:0".into(),
            data_dir: temp_dir.path().to_string_lossy().to_string(),
            auth_secret: Some(TEST_SECRET.into()),
            auth_audience: "ledgerly".into(),
            upload_url,
            upload_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout_seconds: 30,
        };

        let state = AppState::new(Arc::clone(&store), config);
        let router: Router = create_router(state);
        let server = TestServer::new(router).expect("Failed to create test server");

        Self {
            server,
            _temp_dir: temp_dir,
            store,
        }
    }

    /// Get the authorization header for a user.
    pub fn auth_header(&self, user_id: &UserId) -> String {
        let now = chrono::Utc::now().timestamp();
        let claims = JwtClaims {
            sub: user_id.to_string(),
            aud: "ledgerly".into(),
            exp: now + 3600,
            iat: now,
        };
        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
        )
        .expect("Failed to sign test token");
        format!("Bearer {token}")
    }

    /// Create an account and return its id.
    pub async fn create_user(&self, display_name: &str) -> UserId {
        self.create_user_with_email(display_name, &format!("{display_name}@example.com"))
            .await
    }

    /// Create an account with an explicit email and return its id.
    pub async fn create_user_with_email(&self, display_name: &str, email: &str) -> UserId {
        let user_id = UserId::generate();
        self.server
            .post("/v1/users")
            .add_header("authorization", self.auth_header(&user_id))
            .json(&serde_json::json!({
                "display_name": display_name,
                "email": email,
            }))
            .await
            .assert_status_ok();
        user_id
    }

    /// Make two accounts friends via the request/accept flow.
    pub async fn befriend(&self, a: &UserId, b: &UserId) {
        let response = self
            .server
            .post("/v1/friends/requests")
            .add_header("authorization", self.auth_header(a))
            .json(&serde_json::json!({ "to": b }))
            .await;
        response.assert_status_ok();
        let request: serde_json::Value = response.json();
        let request_id = request["id"].as_str().expect("request id").to_string();

        self.server
            .post(&format!("/v1/friends/requests/{request_id}/accept"))
            .add_header("authorization", self.auth_header(b))
            .await
            .assert_status_ok();
    }

    /// Create a circle owned by `creator` and return its id.
    pub async fn create_circle(&self, creator: &UserId, name: &str) -> String {
        let response = self
            .server
            .post("/v1/circles")
            .add_header("authorization", self.auth_header(creator))
            .json(&serde_json::json!({ "name": name }))
            .await;
        response.assert_status_ok();
        let circle: serde_json::Value = response.json();
        circle["id"].as_str().expect("circle id").to_string()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
