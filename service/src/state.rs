//! Application state.

use std::sync::Arc;

use ledgerly_store::RocksStore;

use crate::config::ServiceConfig;
use crate::upload::UploadClient;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Image-host client for profile photos (optional).
    pub uploader: Option<Arc<UploadClient>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        // Create the image-host client if configured
        let uploader = config.upload_url.as_ref().map(|url| {
            tracing::info!(upload_url = %url, "Image host configured");
            Arc::new(UploadClient::new(url, config.upload_api_key.clone()))
        });

        if uploader.is_none() {
            tracing::warn!("Image host not configured - profile photo uploads will be rejected");
        }

        Self {
            store,
            config,
            uploader,
        }
    }

    /// Check if the image host is configured.
    #[must_use]
    pub fn has_uploader(&self) -> bool {
        self.uploader.is_some()
    }
}
