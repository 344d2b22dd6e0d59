//! Image-host client.
//!
//! Profile photos are stored by an external image host. The client posts
//! the raw bytes as a multipart form and parses the host's
//! `{success, data, error}` envelope. The host's own error message is
//! surfaced when it can be parsed; otherwise a generic fallback names the
//! HTTP status.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Error type for image-host operations.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The image host reported a failure.
    #[error("{0}")]
    Api(String),
}

/// Response envelope returned by the image host.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<UploadData>,
    #[serde(default)]
    error: Option<UploadErrorBody>,
}

#[derive(Debug, Deserialize)]
struct UploadData {
    url: String,
}

#[derive(Debug, Deserialize)]
struct UploadErrorBody {
    #[serde(default)]
    message: Option<String>,
}

/// Image-host API client.
#[derive(Debug, Clone)]
pub struct UploadClient {
    client: Client,
    endpoint: String,
    api_key: Option<String>,
}

impl UploadClient {
    /// Create a new image-host client.
    ///
    /// # Arguments
    ///
    /// * `endpoint` - Upload endpoint URL
    /// * `api_key` - Optional bearer key for the host
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be built (should not happen with
    /// default settings).
    pub fn new(endpoint: impl Into<String>, api_key: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            endpoint: endpoint.into().trim_end_matches('/').to_string(),
            api_key,
        }
    }

    /// Upload an image and return its public URL.
    ///
    /// # Errors
    ///
    /// Returns [`UploadError::Api`] wrapping the host's reported message
    /// (or a generic fallback when the response cannot be parsed), and
    /// [`UploadError::Http`] for transport failures.
    pub async fn upload_image(&self, filename: &str, bytes: Vec<u8>) -> Result<String, UploadError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = reqwest::multipart::Form::new().part("image", part);

        let mut request = self.client.post(&self.endpoint).multipart(form);
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let message = response
                .json::<UploadResponse>()
                .await
                .ok()
                .and_then(|body| body.error.and_then(|e| e.message))
                .unwrap_or_else(|| {
                    format!("Failed to upload image. Server responded with {status}.")
                });
            return Err(UploadError::Api(message));
        }

        let body: UploadResponse = response.json().await?;
        if !body.success {
            let message = body
                .error
                .and_then(|e| e.message)
                .unwrap_or_else(|| "Upload failed due to a generic API error.".to_string());
            return Err(UploadError::Api(message));
        }

        body.data
            .map(|data| data.url)
            .ok_or_else(|| UploadError::Api("Upload failed due to a generic API error.".to_string()))
    }
}
