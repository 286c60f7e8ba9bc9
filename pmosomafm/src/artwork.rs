//! Channel artwork download
//!
//! Artwork is saved as `{artwork_dir}/{channel id}` and downloaded at most
//! once per file: an existing file is never fetched again. The transfer
//! runs in a spawned task whose handle is returned to the caller, who may
//! await it or drop it.

use crate::client::SomaFmClient;
use crate::error::{Error, Result};
use crate::models::Channel;
use std::path::{Path, PathBuf};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

/// Local artwork path of a channel
///
/// Always a direct child of `artwork_dir`: characters outside
/// `[a-z0-9_-]` are replaced by `_`, so an id can neither be absolute nor
/// climb out of the directory.
pub fn artwork_path(artwork_dir: &Path, channel_id: &str) -> PathBuf {
    artwork_dir.join(artwork_file_name(channel_id))
}

fn artwork_file_name(channel_id: &str) -> String {
    let name: String = channel_id
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '_' | '-' => c,
            _ => '_',
        })
        .collect();

    if name.is_empty() {
        "_".to_string()
    } else {
        name
    }
}

/// A background artwork transfer
///
/// Dropping it detaches the task; the file keeps being written.
#[derive(Debug)]
pub struct ArtworkDownload {
    path: PathBuf,
    handle: JoinHandle<Result<u64>>,
}

impl ArtworkDownload {
    /// Destination file, possibly still incomplete
    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }

    /// Wait for the transfer and return the number of bytes written
    pub async fn wait(self) -> Result<u64> {
        self.handle
            .await
            .map_err(|e| Error::other(format!("Artwork task failed: {}", e)))?
    }
}

/// Start downloading a channel's artwork unless the file already exists
///
/// Never fails: directory or spawn problems are logged and yield `None`.
pub(crate) async fn start_download(
    client: &SomaFmClient,
    channel: &Channel,
    artwork_dir: &Path,
) -> Option<ArtworkDownload> {
    let path = artwork_path(artwork_dir, &channel.id);

    if tokio::fs::try_exists(&path).await.unwrap_or(false) {
        debug!("Artwork already present: {}", path.display());
        return None;
    }

    if let Err(e) = tokio::fs::create_dir_all(artwork_dir).await {
        warn!(
            "Cannot create artwork directory {}: {}",
            artwork_dir.display(),
            e
        );
        return None;
    }

    debug!("Downloading artwork for {} to {}", channel.id, path.display());

    let client = client.clone();
    let url = channel.image.clone();
    let channel_id = channel.id.clone();
    let task_path = path.clone();

    let handle = tokio::spawn(async move {
        match client.download_to_file(&url, &task_path).await {
            Ok(written) => {
                debug!("Artwork for {} saved ({} bytes)", channel_id, written);
                Ok(written)
            }
            Err(e) => {
                warn!("Artwork download for {} failed: {}", channel_id, e);
                // never leave a partial file behind
                let _ = tokio::fs::remove_file(&task_path).await;
                Err(e)
            }
        }
    });

    Some(ArtworkDownload { path, handle })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artwork_path_is_deterministic() {
        let dir = Path::new("/tmp/pmosomafm");
        assert_eq!(
            artwork_path(dir, "groovesalad"),
            PathBuf::from("/tmp/pmosomafm/groovesalad")
        );
        assert_eq!(artwork_path(dir, "groovesalad"), artwork_path(dir, "groovesalad"));
    }

    #[test]
    fn test_artwork_path_stays_in_directory() {
        let dir = Path::new("/tmp/pmosomafm");

        for id in ["/etc/passwd", "../x", "..", "a/../../b", "c:\\x", ""] {
            let path = artwork_path(dir, id);
            assert_eq!(path.parent(), Some(dir), "id {:?} gave {:?}", id, path);
        }
        assert_eq!(artwork_path(dir, "../x"), dir.join("___x"));
        assert_eq!(artwork_path(dir, "/etc/passwd"), dir.join("_etc_passwd"));
        assert_eq!(artwork_path(dir, "secret-agent_2"), dir.join("secret-agent_2"));
    }
}
