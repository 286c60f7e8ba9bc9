//! SomaFM client library for PMOMusic
//!
//! This crate fetches the SomaFM channel catalog, keeps one stream per
//! channel according to a ranked quality/format preference list, resolves
//! the playable URLs of a channel from its PLS playlist, and caches the
//! whole catalog for one minute.
//!
//! # Features
//!
//! - **Channel List**: normalized channels (trimmed description, `/`-separated
//!   genres, "SomaFM ..." full title)
//! - **Stream Selection**: best encoding per channel from a preference list,
//!   customizable position by position
//! - **Search**: case-insensitive substring search over id, title,
//!   description, genre and DJ; several terms must all match
//! - **Playlist Resolution**: playable URLs read lazily from the channel's
//!   `.pls` playlist and cached with the list
//! - **Artwork**: channel image downloaded in the background to a temp directory
//! - **Caching**: in-memory slot plus a pluggable persistent store
//!
//! # Example
//!
//! ```no_run
//! use pmosomafm::{ChannelOptions, SomaFmConfig, SomaFmStatefulClient};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = SomaFmStatefulClient::from_config(&SomaFmConfig::default())?;
//!
//!     let options = ChannelOptions::new().sort_channels(true);
//!     for channel in client.get_channels(&options).await? {
//!         println!("{} - {} ({} listeners)", channel.id, channel.title, channel.listeners);
//!     }
//!
//!     let lookup = client.get_channel("dronezone", &options).await?;
//!     if let Some(url) = lookup.channel.stream_urls().and_then(|urls| urls.first()) {
//!         println!("Play: {}", url);
//!     }
//!     if let Some(artwork) = lookup.artwork {
//!         artwork.wait().await?;
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! # Stream Preferences
//!
//! The built-in order is highest/mp3, highest/aac, high/mp3, high/aacp,
//! low/aacp, low/mp3. Entries passed in [`ChannelOptions::streams`] replace
//! the built-in entry at the same position:
//!
//! ```
//! use pmosomafm::{merge_preferences, default_preferences, Format, Quality, StreamPreference};
//!
//! let prefs = merge_preferences(
//!     &default_preferences(),
//!     &[StreamPreference::new(Quality::High, Format::Aacp)],
//! );
//! assert_eq!(prefs[0], StreamPreference::new(Quality::High, Format::Aacp));
//! assert_eq!(prefs[1], StreamPreference::new(Quality::Highest, Format::Aac));
//! ```

pub mod artwork;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod filter;
pub mod models;
pub mod normalize;
pub mod playlist;
pub mod stateful_client;
pub mod streams;

// Re-exports
pub use artwork::ArtworkDownload;
pub use cache::{CacheEntry, ChannelStore, DiskCache, MemoryCache};
pub use client::{ClientBuilder, SomaFmClient};
pub use config::SomaFmConfig;
pub use error::{Error, Result};
pub use filter::{filter_channels, Search};
pub use models::{
    Channel, ChannelsResponse, Format, PlaylistEntry, Quality, RawChannel, RawPlaylistEntry,
    SelectedStream, StreamPreference,
};
pub use normalize::normalize_channels;
pub use playlist::parse_playlist;
pub use stateful_client::{ChannelLookup, ChannelOptions, SomaFmStatefulClient};
pub use streams::{default_preferences, merge_preferences, select_stream};
