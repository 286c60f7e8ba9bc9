//! Error types for the SomaFM client

/// Result type alias for SomaFM operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when using the SomaFM client
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON parsing failed
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid URL
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// API returned an error status
    #[error("API error: {0}")]
    ApiError(String),

    /// No channel with this id in the catalog
    #[error("Channel not found: {0}")]
    ChannelNotFound(String),

    /// A raw channel record lacks a required field
    #[error("Malformed channel {channel}: missing or invalid field '{field}'")]
    MalformedChannel {
        /// Channel id, or its position in the payload when the id itself is missing
        channel: String,
        /// Name of the offending field, e.g. `genre` or `playlists[0].url`
        field: String,
    },

    /// Playlist document without a usable `[playlist]` section
    #[error("Invalid playlist: {0}")]
    InvalidPlaylist(String),

    /// Persistent cache store failure
    #[error("Cache error: {0}")]
    Cache(#[from] anyhow::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a generic error from a string
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }

    /// Create an API error
    pub fn api_error(msg: impl Into<String>) -> Self {
        Self::ApiError(msg.into())
    }

    /// Create a malformed-input error
    pub fn malformed(channel: impl Into<String>, field: impl Into<String>) -> Self {
        Self::MalformedChannel {
            channel: channel.into(),
            field: field.into(),
        }
    }

    /// `true` when the requested channel does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ChannelNotFound(_))
    }

    /// `true` for network, status and payload decoding failures
    pub fn is_fetch_error(&self) -> bool {
        matches!(
            self,
            Self::Http(_)
                | Self::Json(_)
                | Self::ApiError(_)
                | Self::InvalidUrl(_)
                | Self::InvalidPlaylist(_)
        )
    }

    /// `true` when the upstream catalog contained an incomplete channel record
    pub fn is_malformed_input(&self) -> bool {
        matches!(self, Self::MalformedChannel { .. })
    }
}
