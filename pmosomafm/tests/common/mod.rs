//! Shared fixtures for the pmosomafm integration tests

#![allow(dead_code)]

use pmosomafm::{ChannelStore, SomaFmClient, SomaFmStatefulClient};
use serde_json::{json, Value};
use std::path::Path;
use std::sync::Arc;
use wiremock::MockServer;

pub const GROOVESALAD_PLS: &str = "[playlist]\n\
numberofentries=2\n\
File1=https://ice1.somafm.com/groovesalad-128-aac\n\
Title1=SomaFM: Groove Salad (#1)\n\
Length1=-1\n\
File2=https://ice2.somafm.com/groovesalad-128-aac\n\
Title2=SomaFM: Groove Salad (#2)\n\
Length2=-1\n\
Version=2\n";

pub const ARTWORK_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake";

/// A channel record shaped like the live `channels.json`
pub fn mock_channel_json(base: &str, id: &str, title: &str, genre: &str, description: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "description": description,
        "dj": "Rusty Hodge",
        "djmail": "rusty@somafm.com",
        "genre": genre,
        "image": format!("{}/img/{}120.png", base, id),
        "largeimage": format!("{}/logos/256/{}256.png", base, id),
        "xlimage": format!("{}/logos/512/{}512.png", base, id),
        "twitter": "",
        "updated": "1396144686",
        "lastPlaying": "Bonobo - Kiara",
        "listeners": "1234",
        "playlists": [
            {"url": format!("{}/{}130.pls", base, id), "format": "aac", "quality": "highest"},
            {"url": format!("{}/{}.pls", base, id), "format": "mp3", "quality": "high"},
            {"url": format!("{}/{}64.pls", base, id), "format": "aacp", "quality": "high"},
            {"url": format!("{}/{}32.pls", base, id), "format": "aacp", "quality": "low"}
        ]
    })
}

/// Three channels, not in title order
pub fn mock_channels_json(base: &str) -> Value {
    json!({
        "channels": [
            mock_channel_json(base, "groovesalad", "Groove Salad", "ambient|electronica", "A nicely chilled plate of ambient/downtempo beats and grooves."),
            mock_channel_json(base, "secretagent", "Secret Agent", "lounge", "The soundtrack for your stylish, mysterious, dangerous life."),
            mock_channel_json(base, "dronezone", "Drone Zone", "ambient|space", " Served best chilled, safe with most medications. "),
        ]
    })
}

pub fn http_client(server: &MockServer) -> SomaFmClient {
    SomaFmClient::builder()
        .api_url(format!("{}/channels.json", server.uri()))
        .build()
        .expect("client")
}

pub fn stateful_client(
    server: &MockServer,
    store: Arc<dyn ChannelStore>,
    artwork_dir: &Path,
) -> SomaFmStatefulClient {
    SomaFmStatefulClient::new(http_client(server), store).with_artwork_dir(artwork_dir)
}
