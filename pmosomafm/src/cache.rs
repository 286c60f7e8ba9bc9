//! Persistent key/value stores for the channel list
//!
//! The stateful client only needs `get` and `set` with a time-to-live, so
//! the store sits behind the [`ChannelStore`] trait and can be swapped
//! (disk in production, memory in tests or short-lived processes).
//!
//! Values are stored as JSON wrapped in a [`CacheEntry`] carrying the
//! expiry timestamp. Expired entries read as `None`.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::RwLock;
use tracing::{debug, info};

/// A key/value store with per-entry expiry
#[async_trait]
pub trait ChannelStore: Send + Sync {
    /// Read a value, `None` when absent or expired
    async fn get(&self, key: &str) -> Result<Option<Value>>;

    /// Write a value, valid for `ttl` from now
    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()>;
}

/// Stored value with its expiry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub expires_at: DateTime<Utc>,
    pub value: Value,
}

impl CacheEntry {
    pub fn new(value: Value, ttl: Duration) -> Self {
        let ttl = chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::MAX);
        Self {
            expires_at: Utc::now().checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            value,
        }
    }

    pub fn is_fresh(&self) -> bool {
        Utc::now() < self.expires_at
    }
}

// ============================================================================
// Disk store
// ============================================================================

/// One JSON file per key under a cache directory
#[derive(Debug, Clone)]
pub struct DiskCache {
    cache_dir: PathBuf,
}

impl DiskCache {
    /// Create a disk store, creating the directory if needed
    pub fn new<P: AsRef<Path>>(cache_dir: P) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();

        if !cache_dir.exists() {
            std::fs::create_dir_all(&cache_dir)?;
            info!("Created cache directory: {}", cache_dir.display());
        }

        Ok(Self { cache_dir })
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Format: `{cache_dir}/{key}.json`
    fn cache_path(&self, key: &str) -> PathBuf {
        self.cache_dir.join(format!("{}.json", key))
    }
}

#[async_trait]
impl ChannelStore for DiskCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let path = self.cache_path(key);

        if !tokio::fs::try_exists(&path).await? {
            debug!("Cache file does not exist: {}", path.display());
            return Ok(None);
        }

        let json = tokio::fs::read_to_string(&path).await?;
        let entry: CacheEntry = serde_json::from_str(&json)?;

        if !entry.is_fresh() {
            debug!(
                "Cache expired at {}: {}",
                entry.expires_at.to_rfc3339(),
                path.display()
            );
            let _ = tokio::fs::remove_file(&path).await;
            return Ok(None);
        }

        debug!("Loaded cache from {}", path.display());
        Ok(Some(entry.value))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        let path = self.cache_path(key);
        let json = serde_json::to_string_pretty(&CacheEntry::new(value, ttl))?;

        tokio::fs::create_dir_all(&self.cache_dir).await?;
        tokio::fs::write(&path, json).await?;
        debug!("Saved cache to {} (ttl {}s)", path.display(), ttl.as_secs());

        Ok(())
    }
}

// ============================================================================
// Memory store
// ============================================================================

/// In-process store, lost when dropped
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl ChannelStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<Option<Value>> {
        let entries = self.entries.read().await;
        Ok(entries
            .get(key)
            .filter(|entry| entry.is_fresh())
            .map(|entry| entry.value.clone()))
    }

    async fn set(&self, key: &str, value: Value, ttl: Duration) -> Result<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), CacheEntry::new(value, ttl));
        Ok(())
    }
}
