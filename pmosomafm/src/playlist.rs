//! PLS playlist parsing
//!
//! SomaFM playlists are INI documents:
//!
//! ```text
//! [playlist]
//! numberofentries=2
//! File1=https://ice1.somafm.com/groovesalad-256-mp3
//! Title1=SomaFM: Groove Salad (#1): A nicely chilled plate of ambient/downtempo beats and grooves.
//! Length1=-1
//! File2=https://ice2.somafm.com/groovesalad-256-mp3
//! Version=2
//! ```
//!
//! Only the `FileN` entries are kept, in `N` order.

use crate::error::{Error, Result};

/// Entry count key as the PLS format spells it
const ENTRY_COUNT_KEY: &str = "NumberOfEntries";

/// Extract the stream URLs of a PLS document
///
/// Fails with [`Error::InvalidPlaylist`] when the document is not a
/// playlist (no `[playlist]` section, missing entry count or `FileN` key).
pub fn parse_playlist(text: &str) -> Result<Vec<String>> {
    let document = canonical_entry_count(text);
    let mut reader = document.as_bytes();

    let entries = pls::parse(&mut reader).map_err(|e| Error::InvalidPlaylist(e.to_string()))?;

    Ok(entries.into_iter().map(|entry| entry.path).collect())
}

/// SomaFM writes `numberofentries`; spell it the way the parser expects
fn canonical_entry_count(text: &str) -> String {
    text.lines()
        .map(|line| match line.split_once('=') {
            Some((key, value)) if key.trim().eq_ignore_ascii_case(ENTRY_COUNT_KEY) => {
                format!("{}={}", ENTRY_COUNT_KEY, value.trim())
            }
            _ => line.to_string(),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    const GROOVESALAD_PLS: &str = "[playlist]\n\
        numberofentries=3\n\
        File1=https://ice1.somafm.com/groovesalad-256-mp3\n\
        Title1=SomaFM: Groove Salad (#1)\n\
        Length1=-1\n\
        File2=https://ice2.somafm.com/groovesalad-256-mp3\n\
        Title2=SomaFM: Groove Salad (#2)\n\
        Length2=-1\n\
        File3=https://ice4.somafm.com/groovesalad-256-mp3\n\
        Title3=SomaFM: Groove Salad (#3)\n\
        Length3=-1\n\
        Version=2\n";

    #[test]
    fn test_somafm_playlist() {
        let urls = parse_playlist(GROOVESALAD_PLS).unwrap();
        assert_eq!(
            urls,
            vec![
                "https://ice1.somafm.com/groovesalad-256-mp3",
                "https://ice2.somafm.com/groovesalad-256-mp3",
                "https://ice4.somafm.com/groovesalad-256-mp3",
            ]
        );
    }

    #[test]
    fn test_entry_count_spelling() {
        assert_eq!(
            canonical_entry_count("[playlist]\r\nnumberofentries = 1\r\nFile1=http://a"),
            "[playlist]\nNumberOfEntries=1\nFile1=http://a"
        );
    }

    #[test]
    fn test_empty_playlist_section() {
        assert!(parse_playlist("[playlist]\nNumberOfEntries=0\nVersion=2\n")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_missing_section_is_an_error() {
        let err = parse_playlist("[other]\nFile1=http://a\n").unwrap_err();
        assert!(matches!(err, Error::InvalidPlaylist(_)));
        assert!(err.is_fetch_error());
    }
}
