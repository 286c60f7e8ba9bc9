//! Stateful client for SomaFM with automatic caching
//!
//! This module provides the high-level API: the channel list is kept in an
//! in-memory slot owned by the client and in a persistent [`ChannelStore`]
//! entry, both valid for one minute by default.
//!
//! # Example
//!
//! ```no_run
//! use pmosomafm::{ChannelOptions, SomaFmConfig, SomaFmStatefulClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = SomaFmConfig::load()?;
//!     let client = SomaFmStatefulClient::from_config(&config)?;
//!
//!     // Served from cache when possible
//!     let ambient = client
//!         .get_channels(&ChannelOptions::new().search("ambient"))
//!         .await?;
//!     println!("{} ambient channels", ambient.len());
//!
//!     // Resolves the playable URLs of the channel
//!     let lookup = client.get_channel("groovesalad", &ChannelOptions::new()).await?;
//!     println!("{:?}", lookup.channel.stream_urls());
//!
//!     Ok(())
//! }
//! ```

use crate::artwork::{self, ArtworkDownload};
use crate::cache::{ChannelStore, DiskCache};
use crate::client::SomaFmClient;
use crate::config::SomaFmConfig;
use crate::error::{Error, Result};
use crate::filter::{filter_channels, Search};
use crate::models::{Channel, StreamPreference};
use crate::normalize::normalize_channels;
use crate::streams::{default_preferences, merge_preferences};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Store key of the channel list
pub const CHANNELS_CACHE_KEY: &str = "channels";

/// Default validity of the cached channel list (one minute)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 60;

/// Options of [`SomaFmStatefulClient::get_channels`] and
/// [`SomaFmStatefulClient::get_channel`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChannelOptions {
    /// Bypass both caches and fetch the list again
    pub force_update: bool,
    /// Order a freshly fetched list by title
    pub sort_channels: bool,
    pub search: Option<Search>,
    /// Merged position by position over the client's preferences
    pub streams: Vec<StreamPreference>,
}

impl ChannelOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn force_update(mut self, force_update: bool) -> Self {
        self.force_update = force_update;
        self
    }

    pub fn sort_channels(mut self, sort_channels: bool) -> Self {
        self.sort_channels = sort_channels;
        self
    }

    pub fn search(mut self, search: impl Into<Search>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn streams(mut self, streams: Vec<StreamPreference>) -> Self {
        self.streams = streams;
        self
    }
}

/// Result of [`SomaFmStatefulClient::get_channel`]
#[derive(Debug)]
pub struct ChannelLookup {
    /// The channel, with resolved stream URLs and `image_file` set
    pub channel: Channel,
    /// Artwork transfer started by the lookup, `None` when the file was
    /// already there or could not be started
    pub artwork: Option<ArtworkDownload>,
}

/// In-memory copy of the channel list
#[derive(Debug, Clone)]
struct CachedChannels {
    channels: Vec<Channel>,
    /// `None` when the ttl does not fit in an `Instant`
    valid_until: Option<Instant>,
}

impl CachedChannels {
    fn new(channels: Vec<Channel>, ttl: Duration) -> Self {
        Self {
            channels,
            valid_until: Instant::now().checked_add(ttl),
        }
    }

    fn is_valid(&self) -> bool {
        self.valid_until.map_or(true, |t| Instant::now() < t)
    }
}

/// Stateful SomaFM client with automatic caching
///
/// Wraps [`SomaFmClient`] and adds:
/// - an in-memory channel slot, shared by clones of the client
/// - a persistent channel cache through an injected [`ChannelStore`]
/// - lazy playlist resolution and artwork download on lookup
///
/// Concurrent calls are not de-duplicated: two calls racing on an empty
/// cache may both fetch the list.
#[derive(Clone)]
pub struct SomaFmStatefulClient {
    client: SomaFmClient,
    store: Arc<dyn ChannelStore>,
    channels: Arc<RwLock<Option<CachedChannels>>>,
    preferences: Vec<StreamPreference>,
    cache_key: String,
    cache_ttl: Duration,
    artwork_dir: PathBuf,
}

impl SomaFmStatefulClient {
    /// Create a client over an HTTP client and a persistent store
    pub fn new(client: SomaFmClient, store: Arc<dyn ChannelStore>) -> Self {
        Self {
            client,
            store,
            channels: Arc::new(RwLock::new(None)),
            preferences: default_preferences(),
            cache_key: CHANNELS_CACHE_KEY.to_string(),
            cache_ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
            artwork_dir: std::env::temp_dir().join(crate::config::APP_DIR_NAME),
        }
    }

    /// Create a client with a disk store as described by `config`
    pub fn from_config(config: &SomaFmConfig) -> Result<Self> {
        let client = SomaFmClient::builder()
            .api_url(&config.api_url)
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .build()?;
        let store = DiskCache::new(&config.cache_dir)?;

        Ok(Self::new(client, Arc::new(store))
            .with_cache_key(config.cache_key.clone())
            .with_cache_ttl(config.cache_ttl())
            .with_artwork_dir(config.artwork_dir.clone())
            .with_preferences(merge_preferences(&default_preferences(), &config.streams)))
    }

    pub fn with_cache_key(mut self, key: impl Into<String>) -> Self {
        self.cache_key = key.into();
        self
    }

    pub fn with_cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = ttl;
        self
    }

    pub fn with_artwork_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.artwork_dir = dir.into();
        self
    }

    /// Replace the base preference list (the built-in order by default)
    pub fn with_preferences(mut self, preferences: Vec<StreamPreference>) -> Self {
        self.preferences = preferences;
        self
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &SomaFmClient {
        &self.client
    }

    pub fn preferences(&self) -> &[StreamPreference] {
        &self.preferences
    }

    pub fn cache_ttl(&self) -> Duration {
        self.cache_ttl
    }

    pub fn artwork_dir(&self) -> &Path {
        &self.artwork_dir
    }

    // ========================================================================
    // Channel list
    // ========================================================================

    /// Get the channel list, using the caches when valid
    ///
    /// 1. The in-memory slot, filled from the persistent store when empty
    /// 2. Otherwise (or with `force_update`) a fresh fetch, normalized and
    ///    written to both caches
    ///
    /// The search is applied last and never affects what is cached.
    pub async fn get_channels(&self, options: &ChannelOptions) -> Result<Vec<Channel>> {
        let channels = self.channels_from_api_or_cache(options).await?;
        Ok(filter_channels(channels, options.search.as_ref()))
    }

    /// Fetch the channel list again, bypassing both caches
    pub async fn refresh_channels(&self, options: &ChannelOptions) -> Result<Vec<Channel>> {
        let options = options.clone().force_update(true);
        self.get_channels(&options).await
    }

    async fn channels_from_api_or_cache(&self, options: &ChannelOptions) -> Result<Vec<Channel>> {
        if !options.force_update {
            if let Some(channels) = self.cached_channels().await {
                return Ok(channels);
            }
        }

        self.fetch_channels(options).await
    }

    async fn cached_channels(&self) -> Option<Vec<Channel>> {
        {
            let slot = self.channels.read().await;
            if let Some(cached) = slot.as_ref().filter(|c| c.is_valid()) {
                debug!("Using {} channels from memory", cached.channels.len());
                return Some(cached.channels.clone());
            }
        }

        match self.load_persisted().await {
            Ok(Some(channels)) if !channels.is_empty() => {
                debug!("Using {} channels from the persistent cache", channels.len());
                *self.channels.write().await =
                    Some(CachedChannels::new(channels.clone(), self.cache_ttl));
                Some(channels)
            }
            Ok(_) => None,
            Err(e) => {
                warn!("Ignoring unreadable channel cache: {}", e);
                None
            }
        }
    }

    async fn load_persisted(&self) -> Result<Option<Vec<Channel>>> {
        match self.store.get(&self.cache_key).await? {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    async fn fetch_channels(&self, options: &ChannelOptions) -> Result<Vec<Channel>> {
        info!("Channel cache miss - fetching the SomaFM channel list");

        let preferences = merge_preferences(&self.preferences, &options.streams);
        let raw = self.client.fetch_channels().await?;
        let channels = normalize_channels(raw, &preferences, options.sort_channels)?;

        self.store_channels(&channels).await?;
        info!("Fetched and cached {} channels", channels.len());

        Ok(channels)
    }

    /// Replace both caches; restarts the validity window
    async fn store_channels(&self, channels: &[Channel]) -> Result<()> {
        *self.channels.write().await =
            Some(CachedChannels::new(channels.to_vec(), self.cache_ttl));

        let value = serde_json::to_value(channels)?;
        self.store.set(&self.cache_key, value, self.cache_ttl).await?;
        Ok(())
    }

    // ========================================================================
    // Single channel
    // ========================================================================

    /// Look up one channel by id (case-insensitive)
    ///
    /// The list is read like [`Self::get_channels`] with `sort_channels` set
    /// and no search. On the first lookup of a channel its playlist is
    /// fetched and the resolved URLs are written back to the caches. The
    /// artwork download is started in the background; its failure does not
    /// affect the lookup.
    ///
    /// Ids are assumed unique: with duplicates the first one in list order
    /// is returned.
    pub async fn get_channel(&self, id: &str, options: &ChannelOptions) -> Result<ChannelLookup> {
        let options = ChannelOptions {
            sort_channels: true,
            search: None,
            ..options.clone()
        };
        let mut channels = self.get_channels(&options).await?;

        let wanted = id.to_lowercase();
        let index = channels
            .iter()
            .position(|c| c.id.to_lowercase() == wanted)
            .ok_or_else(|| Error::ChannelNotFound(id.to_string()))?;

        if self.resolve_stream_urls(&mut channels[index]).await? {
            self.store_channels(&channels).await?;
        }

        let mut channel = channels.swap_remove(index);
        let artwork = self.download_artwork(&channel).await;
        channel.image_file = Some(self.artwork_path(&channel));

        Ok(ChannelLookup { channel, artwork })
    }

    /// Fill `stream.urls` from the playlist; `true` when it was fetched
    async fn resolve_stream_urls(&self, channel: &mut Channel) -> Result<bool> {
        let Some(stream) = channel.stream.as_mut() else {
            debug!("Channel {} has no preferred stream", channel.id);
            return Ok(false);
        };

        if stream.urls.is_some() {
            debug!("Reusing cached stream URLs for {}", channel.id);
            return Ok(false);
        }

        let urls = self.client.fetch_playlist_urls(&stream.url).await?;
        info!("Resolved {} stream URLs for {}", urls.len(), channel.id);
        stream.urls = Some(urls);
        Ok(true)
    }

    // ========================================================================
    // Artwork
    // ========================================================================

    /// Local artwork path of a channel
    pub fn artwork_path(&self, channel: &Channel) -> PathBuf {
        artwork::artwork_path(&self.artwork_dir, &channel.id)
    }

    /// Start the artwork download of a channel unless already on disk
    pub async fn download_artwork(&self, channel: &Channel) -> Option<ArtworkDownload> {
        artwork::start_download(&self.client, channel, &self.artwork_dir).await
    }
}

impl std::fmt::Debug for SomaFmStatefulClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SomaFmStatefulClient")
            .field("client", &self.client)
            .field("cache_key", &self.cache_key)
            .field("cache_ttl", &self.cache_ttl)
            .field("artwork_dir", &self.artwork_dir)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cached_channels_validity() {
        let fresh = CachedChannels::new(Vec::new(), Duration::from_secs(60));
        assert!(fresh.is_valid());

        let stale = CachedChannels::new(Vec::new(), Duration::ZERO);
        assert!(!stale.is_valid());

        let forever = CachedChannels::new(Vec::new(), Duration::MAX);
        assert!(forever.is_valid());
    }

    #[test]
    fn test_channel_options_builder() {
        let options = ChannelOptions::new()
            .force_update(true)
            .sort_channels(true)
            .search(vec!["ambient", "space"]);

        assert!(options.force_update);
        assert!(options.sort_channels);
        assert_eq!(
            options.search,
            Some(Search::Terms(vec!["ambient".to_string(), "space".to_string()]))
        );
        assert!(options.streams.is_empty());
    }
}
