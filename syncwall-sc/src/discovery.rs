//! Stream discovery client
//!
//! Consumes the external discovery endpoint: `GET /api/streams`
//! returns an ordered JSON array of absolute playback URLs. The order
//! of this array is the registry order for the whole session.

use crate::error::Result;
use tracing::info;

/// HTTP client for the stream discovery endpoint
pub struct DiscoveryClient {
    client: reqwest::Client,
    base_url: String,
}

impl DiscoveryClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
        }
    }

    /// Fetch the ordered list of playable source URLs
    pub async fn fetch_stream_urls(&self) -> Result<Vec<String>> {
        let url = format!("{}/api/streams", self.base_url.trim_end_matches('/'));
        info!("Fetching stream list from {}", url);

        let urls: Vec<String> = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        info!("Discovered {} streams", urls.len());
        Ok(urls)
    }
}
