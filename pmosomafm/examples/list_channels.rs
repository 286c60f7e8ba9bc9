//! Example: List SomaFM channels and resolve one of them
//!
//! Run with: cargo run -p pmosomafm --example list_channels
//! Or with a search and a channel: cargo run -p pmosomafm --example list_channels -- ambient dronezone

use pmosomafm::{ChannelOptions, SomaFmConfig, SomaFmStatefulClient};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let search = env::args().nth(1);
    let channel_id = env::args()
        .nth(2)
        .unwrap_or_else(|| "groovesalad".to_string());

    let config = SomaFmConfig::load()?;
    let client = SomaFmStatefulClient::from_config(&config)?;

    let mut options = config.default_options();
    if let Some(search) = &search {
        options = options.search(search.as_str());
    }

    let channels = client.get_channels(&options).await?;
    println!("Found {} channels:\n", channels.len());
    for channel in &channels {
        println!(
            "  {:<16} {:<28} {:>5} listeners  [{}]",
            channel.id, channel.title, channel.listeners, channel.genre
        );
    }

    println!("\n=== {} ===", channel_id);
    let lookup = client
        .get_channel(&channel_id, &ChannelOptions::new())
        .await?;
    let channel = lookup.channel;

    println!("{}", channel.full_title);
    println!("{}", channel.description);
    if let Some(stream) = &channel.stream {
        println!("Stream: {} {} ({})", stream.quality, stream.format, stream.url);
    }
    for url in channel.stream_urls().unwrap_or_default() {
        println!("  -> {}", url);
    }

    if let Some(artwork) = lookup.artwork {
        let bytes = artwork.wait().await?;
        println!("Artwork: {} bytes", bytes);
    }
    if let Some(path) = &channel.image_file {
        println!("Artwork file: {}", path.display());
    }

    Ok(())
}
