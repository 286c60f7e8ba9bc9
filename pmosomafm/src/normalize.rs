//! Conversion of raw API records into [`Channel`]s
//!
//! Pure transformation: no network and no cache access.

use crate::error::{Error, Result};
use crate::models::{Channel, PlaylistEntry, RawChannel, RawPlaylistEntry, StreamPreference};
use crate::streams::select_stream;
use icu_collator::options::CollatorOptions;
use icu_collator::Collator;
use serde_json::Value;

/// Prefix of [`Channel::full_title`]
pub const FULL_TITLE_PREFIX: &str = "SomaFM ";

/// Normalize a full catalog
///
/// With `sort_alphabetically`, channels are first ordered by title using
/// Unicode collation on the lowercased titles (stable, so ties keep their
/// API order). Fails on the first record lacking a required field.
pub fn normalize_channels(
    mut raw_channels: Vec<RawChannel>,
    preferences: &[StreamPreference],
    sort_alphabetically: bool,
) -> Result<Vec<Channel>> {
    if sort_alphabetically {
        raw_channels = sort_by_title(raw_channels)?;
    }

    raw_channels
        .into_iter()
        .enumerate()
        .map(|(index, raw)| normalize_channel(raw, index, preferences))
        .collect()
}

/// Normalize one record; `index` only serves error reporting
pub fn normalize_channel(
    raw: RawChannel,
    index: usize,
    preferences: &[StreamPreference],
) -> Result<Channel> {
    let id = raw
        .id
        .ok_or_else(|| Error::malformed(format!("#{}", index), "id"))?
        .to_lowercase();

    let field = |value: Option<String>, name: &'static str| {
        value.ok_or_else(|| Error::malformed(id.clone(), name))
    };

    let title = field(raw.title, "title")?;
    let description = field(raw.description, "description")?;
    let dj = field(raw.dj, "dj")?;
    let genre = field(raw.genre, "genre")?;
    let last_playing = field(raw.last_playing, "lastPlaying")?;
    let image = field(raw.image, "image")?;
    let listeners = raw
        .listeners
        .as_ref()
        .and_then(parse_listeners)
        .ok_or_else(|| Error::malformed(id.clone(), "listeners"))?;
    let playlists = raw
        .playlists
        .ok_or_else(|| Error::malformed(id.clone(), "playlists"))?
        .into_iter()
        .enumerate()
        .map(|(i, entry)| validate_entry(entry, i, &id))
        .collect::<Result<Vec<_>>>()?;

    Ok(Channel {
        full_title: format!("{}{}", FULL_TITLE_PREFIX, title),
        description: description.trim().to_string(),
        genre: genre.replace('|', "/"),
        stream: select_stream(&playlists, preferences),
        id,
        title,
        dj,
        last_playing,
        listeners,
        image,
        image_file: None,
    })
}

/// Order by lowercased title, as a collator for the root locale sees it
fn sort_by_title(raw_channels: Vec<RawChannel>) -> Result<Vec<RawChannel>> {
    let collator = Collator::try_new(Default::default(), CollatorOptions::default())
        .map_err(|e| Error::other(format!("Cannot load collation data: {}", e)))?;

    let mut keyed: Vec<(String, RawChannel)> = raw_channels
        .into_iter()
        .map(|c| (c.title.as_deref().unwrap_or_default().to_lowercase(), c))
        .collect();
    keyed.sort_by(|(a, _), (b, _)| collator.compare(a, b));

    Ok(keyed.into_iter().map(|(_, c)| c).collect())
}

fn validate_entry(entry: RawPlaylistEntry, index: usize, id: &str) -> Result<PlaylistEntry> {
    let missing = |field: &str| Error::malformed(id, format!("playlists[{}].{}", index, field));

    Ok(PlaylistEntry {
        quality: entry.quality.ok_or_else(|| missing("quality"))?,
        format: entry.format.ok_or_else(|| missing("format"))?,
        url: entry.url.ok_or_else(|| missing("url"))?,
    })
}

fn parse_listeners(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
