//! HTTP client for the SomaFM API
//!
//! This module wraps the three requests the crate performs: the channel
//! list, the per-channel PLS playlist, and the channel artwork download.
//!
//! # Example
//!
//! ```no_run
//! use pmosomafm::SomaFmClient;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SomaFmClient::new()?;
//!
//!     let channels = client.fetch_channels().await?;
//!     println!("{} channels upstream", channels.len());
//!
//!     let urls = client
//!         .fetch_playlist_urls("https://somafm.com/groovesalad256.pls")
//!         .await?;
//!     println!("Streams: {:?}", urls);
//!
//!     Ok(())
//! }
//! ```

use crate::error::{Error, Result};
use crate::models::{ChannelsResponse, RawChannel};
use crate::playlist::parse_playlist;
use futures::StreamExt;
use reqwest::{Client, Response};
use std::path::Path;
use std::time::Duration;
use tokio::io::AsyncWriteExt;
use tracing::debug;
use url::Url;

/// Default channel list endpoint
pub const DEFAULT_API_URL: &str = "https://api.somafm.com/channels.json";

/// Default timeout for HTTP requests (30 seconds)
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default User-Agent, sent with every request
pub const DEFAULT_USER_AGENT: &str = concat!(
    "pmosomafm/",
    env!("CARGO_PKG_VERSION"),
    " (https://github.com/uschek/somafm)"
);

/// SomaFM HTTP client
///
/// The client is stateless and does not cache responses.
/// Caching is handled by [`crate::SomaFmStatefulClient`].
#[derive(Debug, Clone)]
pub struct SomaFmClient {
    pub(crate) client: Client,
    api_url: String,
    timeout: Duration,
}

impl SomaFmClient {
    /// Create a new client with default settings
    pub fn new() -> Result<Self> {
        Self::builder().build()
    }

    /// Create a builder for configuring the client
    pub fn builder() -> ClientBuilder {
        ClientBuilder::default()
    }

    /// Create a client with a custom reqwest::Client
    ///
    /// The identifying User-Agent is then up to the provided client.
    pub fn with_client(client: Client) -> Self {
        Self {
            client,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
        }
    }

    /// Get the channel list URL
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Get the internal HTTP client
    pub fn http_client(&self) -> &Client {
        &self.client
    }

    // ========================================================================
    // Channel list
    // ========================================================================

    /// Fetch the raw channel list
    pub async fn fetch_channels(&self) -> Result<Vec<RawChannel>> {
        let url = Url::parse(&self.api_url)?;
        debug!("Fetching channel list: {}", url);

        let body = self.get(url).await?.text().await?;
        let response: ChannelsResponse = serde_json::from_str(&body)?;

        debug!("Received {} raw channels", response.channels.len());
        Ok(response.channels)
    }

    // ========================================================================
    // Playlists
    // ========================================================================

    /// Fetch a document as text
    pub async fn fetch_text(&self, url: &str) -> Result<String> {
        let url = Url::parse(url)?;
        Ok(self.get(url).await?.text().await?)
    }

    /// Fetch a PLS playlist and return its stream URLs in order
    pub async fn fetch_playlist_urls(&self, playlist_url: &str) -> Result<Vec<String>> {
        debug!("Resolving playlist: {}", playlist_url);

        let text = self.fetch_text(playlist_url).await?;
        let urls = parse_playlist(&text)?;

        debug!("Playlist {} lists {} streams", playlist_url, urls.len());
        Ok(urls)
    }

    // ========================================================================
    // Artwork
    // ========================================================================

    /// Stream a URL into a file, returning the number of bytes written
    ///
    /// The body is written verbatim; the file is created or truncated.
    pub async fn download_to_file(&self, url: &str, path: &Path) -> Result<u64> {
        let url = Url::parse(url)?;
        let response = self.get(url).await?;

        let mut file = tokio::fs::File::create(path).await?;
        let mut stream = response.bytes_stream();
        let mut written = 0u64;

        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            file.write_all(&chunk).await?;
            written += chunk.len() as u64;
        }

        file.flush().await?;
        Ok(written)
    }

    async fn get(&self, url: Url) -> Result<Response> {
        let response = self.client.get(url).timeout(self.timeout).send().await?;

        if !response.status().is_success() {
            return Err(Error::ApiError(format!(
                "{} returned status: {}",
                response.url(),
                response.status()
            )));
        }

        Ok(response)
    }
}

/// Builder for configuring a SomaFmClient
#[derive(Debug)]
pub struct ClientBuilder {
    client: Option<Client>,
    api_url: String,
    timeout: Duration,
    user_agent: String,
    proxy: Option<String>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self {
            client: None,
            api_url: DEFAULT_API_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            proxy: None,
        }
    }
}

impl ClientBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a custom HTTP client
    pub fn client(mut self, client: Client) -> Self {
        self.client = Some(client);
        self
    }

    /// Set the channel list URL
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom User-Agent header
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Set a proxy URL
    pub fn proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }

    /// Build the client
    pub fn build(self) -> Result<SomaFmClient> {
        Url::parse(&self.api_url)?;

        let client = if let Some(client) = self.client {
            client
        } else {
            let mut builder = Client::builder()
                .user_agent(&self.user_agent)
                .timeout(self.timeout);

            if let Some(proxy_url) = &self.proxy {
                let proxy = reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::other(format!("Invalid proxy: {}", e)))?;
                builder = builder.proxy(proxy);
            }

            builder.build()?
        };

        Ok(SomaFmClient {
            client,
            api_url: self.api_url,
            timeout: self.timeout,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let builder = ClientBuilder::default();
        assert_eq!(builder.api_url, DEFAULT_API_URL);
        assert_eq!(
            builder.timeout,
            Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS)
        );
        assert!(builder.user_agent.starts_with("pmosomafm/"));
    }

    #[test]
    fn test_builder_rejects_invalid_api_url() {
        let err = SomaFmClient::builder()
            .api_url("not a url")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    /// Run with: cargo test -p pmosomafm -- --ignored
    #[tokio::test]
    #[ignore = "Integration test - calls real SomaFM API"]
    async fn test_fetch_real_channel_list() {
        let client = SomaFmClient::new().expect("Failed to create client");
        let channels = client.fetch_channels().await;

        assert!(
            channels.is_ok(),
            "Failed to fetch channels: {:?}",
            channels.err()
        );

        let channels = channels.unwrap();
        assert!(!channels.is_empty(), "Expected channels");
        assert!(channels
            .iter()
            .any(|c| c.id.as_deref() == Some("groovesalad")));
    }
}
