//! Stream selection
//!
//! A channel is broadcast in several encodings; the one kept is the first
//! encoding matching the highest-ranked entry of a preference list.

use crate::models::{Format, Quality, PlaylistEntry, SelectedStream, StreamPreference};

/// Built-in preference order, most preferred first
pub const DEFAULT_PREFERRED_STREAMS: &[(&str, &str)] = &[
    ("highest", "mp3"),
    ("highest", "aac"),
    ("high", "mp3"),
    ("high", "aacp"),
    ("low", "aacp"),
    ("low", "mp3"),
];

/// The built-in preference list
pub fn default_preferences() -> Vec<StreamPreference> {
    DEFAULT_PREFERRED_STREAMS
        .iter()
        .map(|(quality, format)| StreamPreference::new(Quality::from(*quality), Format::from(*format)))
        .collect()
}

/// Merge caller preferences over a base list
///
/// Entry `i` of `overrides` replaces entry `i` of `base`; overrides longer
/// than `base` are appended. Neither input is modified.
pub fn merge_preferences(
    base: &[StreamPreference],
    overrides: &[StreamPreference],
) -> Vec<StreamPreference> {
    let len = base.len().max(overrides.len());
    (0..len)
        .filter_map(|i| overrides.get(i).or_else(|| base.get(i)).cloned())
        .collect()
}

/// Pick the best encoding for a channel
///
/// Preference order dominates encoding order: every encoding is checked
/// against the first preference before the second one is considered.
/// Returns `None` when nothing matches.
pub fn select_stream(
    encodings: &[PlaylistEntry],
    preferences: &[StreamPreference],
) -> Option<SelectedStream> {
    preferences.iter().find_map(|preference| {
        encodings
            .iter()
            .find(|entry| preference.matches(entry))
            .map(SelectedStream::from)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(quality: &str, format: &str, url: &str) -> PlaylistEntry {
        PlaylistEntry::new(quality, format, url)
    }

    #[test]
    fn test_default_order() {
        let prefs = default_preferences();
        assert_eq!(prefs.len(), 6);
        assert_eq!(prefs[0], StreamPreference::new(Quality::Highest, Format::Mp3));
        assert_eq!(prefs[3], StreamPreference::new(Quality::High, Format::Aacp));
        assert_eq!(prefs[5], StreamPreference::new(Quality::Low, Format::Mp3));
    }

    #[test]
    fn test_preference_order_wins_over_encoding_order() {
        let encodings = vec![
            entry("low", "mp3", "http://low"),
            entry("high", "mp3", "http://high"),
            entry("highest", "aac", "http://highest-aac"),
        ];

        let stream = select_stream(&encodings, &default_preferences()).unwrap();
        assert_eq!(stream.url, "http://highest-aac");
        assert_eq!(stream.quality, Quality::Highest);
        assert_eq!(stream.format, Format::Aac);
        assert!(stream.urls.is_none());

        let mut reversed = encodings.clone();
        reversed.reverse();
        assert_eq!(
            select_stream(&reversed, &default_preferences()).unwrap().url,
            "http://highest-aac"
        );
    }

    #[test]
    fn test_no_match_is_none() {
        let encodings = vec![entry("medium", "ogg", "http://ogg")];
        assert!(select_stream(&encodings, &default_preferences()).is_none());
        assert!(select_stream(&[], &default_preferences()).is_none());
        assert!(select_stream(&encodings, &[]).is_none());
    }

    #[test]
    fn test_duplicate_encodings_first_wins() {
        let encodings = vec![
            entry("high", "mp3", "http://first"),
            entry("high", "mp3", "http://second"),
        ];
        assert_eq!(
            select_stream(&encodings, &default_preferences()).unwrap().url,
            "http://first"
        );
    }

    #[test]
    fn test_merge_is_positional() {
        let defaults = default_preferences();
        let overrides = vec![StreamPreference::new(Quality::Low, Format::Aacp)];

        let merged = merge_preferences(&defaults, &overrides);
        assert_eq!(merged.len(), defaults.len());
        assert_eq!(merged[0], overrides[0]);
        assert_eq!(&merged[1..], &defaults[1..]);
        // inputs untouched
        assert_eq!(defaults, default_preferences());
    }

    #[test]
    fn test_merge_longer_overrides_append() {
        let base = vec![StreamPreference::new(Quality::High, Format::Mp3)];
        let overrides = vec![
            StreamPreference::new(Quality::Low, Format::Mp3),
            StreamPreference::new(Quality::Other("medium".into()), Format::Other("ogg".into())),
        ];

        assert_eq!(merge_preferences(&base, &overrides), overrides);
        assert_eq!(merge_preferences(&base, &[]), base);
    }
}
