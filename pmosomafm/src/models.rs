//! Data models for the SomaFM channel catalog
//!
//! `Raw*` types mirror the JSON served by `channels.json`; [`Channel`] and
//! [`SelectedStream`] are the normalized records handed to callers and
//! written to the persistent cache.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::PathBuf;

// ============================================================================
// Stream qualities and formats
// ============================================================================

/// Quality tier of an encoding as reported by SomaFM
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Quality {
    Highest,
    High,
    Low,
    /// Any tier this crate does not know about
    Other(String),
}

impl Quality {
    pub fn as_str(&self) -> &str {
        match self {
            Quality::Highest => "highest",
            Quality::High => "high",
            Quality::Low => "low",
            Quality::Other(s) => s,
        }
    }
}

impl From<&str> for Quality {
    fn from(s: &str) -> Self {
        match s {
            "highest" => Quality::Highest,
            "high" => Quality::High,
            "low" => Quality::Low,
            other => Quality::Other(other.to_string()),
        }
    }
}

impl From<String> for Quality {
    fn from(s: String) -> Self {
        Quality::from(s.as_str())
    }
}

impl From<Quality> for String {
    fn from(q: Quality) -> Self {
        q.as_str().to_string()
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Audio format of an encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Format {
    Mp3,
    Aac,
    /// AAC+ (HE-AAC)
    Aacp,
    Other(String),
}

impl Format {
    pub fn as_str(&self) -> &str {
        match self {
            Format::Mp3 => "mp3",
            Format::Aac => "aac",
            Format::Aacp => "aacp",
            Format::Other(s) => s,
        }
    }

    /// MIME type of the audio carried by this format
    pub fn mime_type(&self) -> &str {
        match self {
            Format::Mp3 => "audio/mpeg",
            Format::Aac | Format::Aacp => "audio/aac",
            Format::Other(_) => "application/octet-stream",
        }
    }
}

impl From<&str> for Format {
    fn from(s: &str) -> Self {
        match s {
            "mp3" => Format::Mp3,
            "aac" => Format::Aac,
            "aacp" => Format::Aacp,
            other => Format::Other(other.to_string()),
        }
    }
}

impl From<String> for Format {
    fn from(s: String) -> Self {
        Format::from(s.as_str())
    }
}

impl From<Format> for String {
    fn from(f: Format) -> Self {
        f.as_str().to_string()
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of a ranked stream preference list
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StreamPreference {
    pub quality: Quality,
    pub format: Format,
}

impl StreamPreference {
    pub fn new(quality: impl Into<Quality>, format: impl Into<Format>) -> Self {
        Self {
            quality: quality.into(),
            format: format.into(),
        }
    }

    /// Check whether an encoding has exactly this quality and format
    pub fn matches(&self, entry: &PlaylistEntry) -> bool {
        self.quality == entry.quality && self.format == entry.format
    }
}

// ============================================================================
// Raw API models
// ============================================================================

/// Top-level document returned by `channels.json`
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelsResponse {
    pub channels: Vec<RawChannel>,
}

/// One encoding offered by a channel, as served by the API
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct RawPlaylistEntry {
    #[serde(deserialize_with = "lenient")]
    pub quality: Option<Quality>,
    #[serde(deserialize_with = "lenient")]
    pub format: Option<Format>,
    /// URL of the playlist (`.pls`) for this encoding
    #[serde(deserialize_with = "lenient")]
    pub url: Option<String>,
}

impl RawPlaylistEntry {
    pub fn new(quality: impl Into<Quality>, format: impl Into<Format>, url: impl Into<String>) -> Self {
        Self {
            quality: Some(quality.into()),
            format: Some(format.into()),
            url: Some(url.into()),
        }
    }
}

/// A channel record as served by the API
///
/// Every field is optional at this stage, and a field of the wrong JSON
/// type reads as absent, so that the normalizer can report it with the
/// channel it belongs to.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawChannel {
    #[serde(deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub dj: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub genre: Option<String>,
    #[serde(deserialize_with = "lenient")]
    pub last_playing: Option<String>,
    /// Sent as a decimal string by the live API, accepted as a number too
    pub listeners: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient")]
    pub image: Option<String>,
    #[serde(deserialize_with = "lenient_entries")]
    pub playlists: Option<Vec<RawPlaylistEntry>>,
}

/// A string field; any other JSON type reads as `None`
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(T::from(s)),
        _ => None,
    })
}

/// An array of encodings; a non-object element reads as an empty entry
fn lenient_entries<'de, D>(deserializer: D) -> Result<Option<Vec<RawPlaylistEntry>>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Array(items)) => Some(
            items
                .into_iter()
                .map(|item| serde_json::from_value::<RawPlaylistEntry>(item).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    })
}

/// A validated encoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistEntry {
    pub quality: Quality,
    pub format: Format,
    pub url: String,
}

impl PlaylistEntry {
    pub fn new(quality: impl Into<Quality>, format: impl Into<Format>, url: impl Into<String>) -> Self {
        Self {
            quality: quality.into(),
            format: format.into(),
            url: url.into(),
        }
    }
}

// ============================================================================
// Normalized models
// ============================================================================

/// The encoding picked for a channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedStream {
    /// Playlist URL of the encoding
    pub url: String,
    pub format: Format,
    pub quality: Quality,
    /// Playable URLs read from the playlist, filled on first lookup
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub urls: Option<Vec<String>>,
}

impl From<&PlaylistEntry> for SelectedStream {
    fn from(entry: &PlaylistEntry) -> Self {
        Self {
            url: entry.url.clone(),
            format: entry.format.clone(),
            quality: entry.quality.clone(),
            urls: None,
        }
    }
}

/// A normalized SomaFM channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Channel {
    /// Lowercase unique identifier (e.g. "groovesalad")
    pub id: String,
    pub title: String,
    /// "SomaFM " followed by the title
    pub full_title: String,
    pub description: String,
    pub dj: String,
    /// Genres separated by `/`
    pub genre: String,
    pub last_playing: String,
    pub listeners: u64,
    /// `None` when no encoding matched the preference list
    pub stream: Option<SelectedStream>,
    /// Artwork URL
    pub image: String,
    /// Local artwork path, only set by a channel lookup
    #[serde(skip)]
    pub image_file: Option<PathBuf>,
}

impl Channel {
    /// Playable URLs, if they have been resolved
    pub fn stream_urls(&self) -> Option<&[String]> {
        self.stream.as_ref().and_then(|s| s.urls.as_deref())
    }
}
