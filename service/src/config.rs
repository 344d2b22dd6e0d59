//! Service configuration.

use serde::Deserialize;
use std::path::Path;

/// Service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Address to listen on (default: "0.0.0.0:8080").
    pub listen_addr: String,

    /// Path to the `RocksDB` data directory (default: "/data/ledgerly").
    pub data_dir: String,

    /// HS256 signing secret for bearer JWTs. When absent the service runs
    /// in dev mode and accepts `test-token:<uuid>` tokens instead.
    pub auth_secret: Option<String>,

    /// Expected JWT audience (default: "ledgerly").
    pub auth_audience: String,

    /// Image-host upload endpoint (optional).
    pub upload_url: Option<String>,

    /// Image-host API key (optional).
    pub upload_api_key: Option<String>,

    /// CORS allowed origins.
    pub cors_origins: Vec<String>,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,

    /// Request timeout in seconds.
    pub request_timeout_seconds: u64,
}

/// Image-host secrets file structure.
#[derive(Debug, Deserialize)]
struct UploadSecrets {
    upload_url: String,
    #[serde(default)]
    api_key: Option<String>,
}

impl ServiceConfig {
    /// Load configuration from environment variables and secrets files.
    #[must_use]
    pub fn from_env() -> Self {
        // Try to load image-host secrets from file first, then fall back to env vars
        let (upload_url, upload_api_key) = load_upload_secrets();

        Self {
            listen_addr: std::env::var("LISTEN_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".into()),
            data_dir: std::env::var("DATA_DIR").unwrap_or_else(|_| "/data/ledgerly".into()),
            auth_secret: std::env::var("AUTH_SECRET").ok(),
            auth_audience: std::env::var("AUTH_AUDIENCE").unwrap_or_else(|_| "ledgerly".into()),
            upload_url,
            upload_api_key,
            cors_origins: std::env::var("CORS_ORIGINS")
                .unwrap_or_else(|_| "*".into())
                .split(',')
                .map(|s| s.trim().to_string())
                .collect(),
            max_body_bytes: std::env::var("MAX_BODY_BYTES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(4 * 1024 * 1024), // 4MB, photo uploads included
            request_timeout_seconds: std::env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
        }
    }
}

/// Load image-host secrets from file or environment.
fn load_upload_secrets() -> (Option<String>, Option<String>) {
    let secret_paths = [
        ".secrets/uploads.json",
        "ledgerly/.secrets/uploads.json",
        "../.secrets/uploads.json",
    ];

    for path in &secret_paths {
        if let Ok(secrets) = load_secrets_file::<UploadSecrets>(path) {
            tracing::info!(path = %path, "Loaded image-host secrets from file");
            return (Some(secrets.upload_url), secrets.api_key);
        }
    }

    // Fall back to environment variables
    tracing::debug!("Image-host secrets file not found, using environment variables");
    (
        std::env::var("IMAGE_UPLOAD_URL").ok(),
        std::env::var("IMAGE_UPLOAD_API_KEY").ok(),
    )
}

/// Load secrets from a JSON file.
fn load_secrets_file<T: serde::de::DeserializeOwned>(path: &str) -> Result<T, std::io::Error> {
    let path = Path::new(path);
    if !path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "Secrets file not found",
        ));
    }
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents)
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:8080".into(),
            data_dir: "/data/ledgerly".into(),
            auth_secret: None,
            auth_audience: "ledgerly".into(),
            upload_url: None,
            upload_api_key: None,
            cors_origins: vec!["*".into()],
            max_body_bytes: 4 * 1024 * 1024,
            request_timeout_seconds: 30,
        }
    }
}
