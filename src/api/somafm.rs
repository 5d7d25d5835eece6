//! SomaFM client for the channel catalogue, playlists and song metadata.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soma_rail::api::somafm::SomaFm;
//! use soma_rail::libs::config::PlayerConfig;
//!
//! # async fn run() -> anyhow::Result<()> {
//! let client = SomaFm::new(&PlayerConfig::default());
//! let channels = client.fetch_channels().await?;
//! if let Some(channel) = channels.first() {
//!     let url = client.resolve_stream(channel).await?;
//!     println!("{:?}", url);
//! }
//! # Ok(())
//! # }
//! ```

use crate::libs::config::PlayerConfig;
use crate::libs::playlist::{self, IceServer};
use chrono::{DateTime, Local};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

include!(concat!(env!("OUT_DIR"), "/app_metadata.rs"));

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("HTTP error! status: {0}")]
    Status(StatusCode),

    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Playlist {
    pub url: String,
    pub format: String,
    pub quality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Channel {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub genre: String,
    pub listeners: u64,
    pub playlists: Vec<Playlist>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Song {
    pub title: String,
    pub artist: String,
    pub album: String,
    /// When the song started, if the feed says so.
    pub played_at: Option<DateTime<Local>>,
}

#[derive(Debug, Deserialize)]
struct ChannelsResponse {
    channels: Vec<RawChannel>,
}

// The catalogue encodes listener counts as strings.
#[derive(Debug, Deserialize)]
struct RawChannel {
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    image: String,
    #[serde(default)]
    image_xlarge: Option<String>,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    listeners: serde_json::Value,
    #[serde(default)]
    playlists: Vec<Playlist>,
}

impl From<RawChannel> for Channel {
    fn from(raw: RawChannel) -> Self {
        let listeners = match &raw.listeners {
            serde_json::Value::Number(n) => n.as_u64().unwrap_or(0),
            serde_json::Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        };
        let image = raw.image_xlarge.filter(|url| !url.is_empty()).unwrap_or(raw.image);
        Channel {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            image,
            genre: raw.genre,
            listeners,
            playlists: raw.playlists,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SongsResponse {
    #[serde(default)]
    songs: Vec<RawSong>,
}

#[derive(Debug, Deserialize)]
struct RawSong {
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    artist: Option<String>,
    #[serde(default)]
    album: Option<String>,
    // Unix seconds, sent as a string.
    #[serde(default)]
    date: Option<String>,
}

fn played_at(date: Option<&str>) -> Option<DateTime<Local>> {
    let seconds: i64 = date?.trim().parse().ok()?;
    DateTime::from_timestamp(seconds, 0).map(|utc| utc.with_timezone(&Local))
}

/// Parses the body of `channels.json`.
pub fn parse_channels(body: &str) -> Result<Vec<Channel>, ApiError> {
    let response: ChannelsResponse = serde_json::from_str(body)?;
    Ok(response.channels.into_iter().map(Channel::from).collect())
}

/// Parses the body of `songs/{id}.json`, returning the song on air.
pub fn parse_now_playing(body: &str) -> Result<Option<Song>, ApiError> {
    let response: SongsResponse = serde_json::from_str(body)?;
    Ok(response.songs.into_iter().next().map(|song| Song {
        played_at: played_at(song.date.as_deref()),
        title: song.title.unwrap_or_default(),
        artist: song.artist.unwrap_or_default(),
        album: song.album.unwrap_or_default(),
    }))
}

/// Picks the playlist to stream, preferring AAC and falling back to MP3.
pub fn select_playlist(channel: &Channel) -> Option<&Playlist> {
    let find = |format: &str, quality: Option<&str>| {
        channel
            .playlists
            .iter()
            .find(|p| p.format == format && quality.map_or(true, |q| p.quality == q))
    };

    find("aac", Some("highest"))
        .or_else(|| find("aac", Some("high")))
        .or_else(|| find("aac", None))
        .or_else(|| find("mp3", Some("low")))
        .or_else(|| find("mp3", None))
        .or_else(|| channel.playlists.first())
}

pub fn find_channel<'a>(channels: &'a [Channel], id: &str) -> Option<&'a Channel> {
    channels.iter().find(|channel| channel.id == id)
}

#[derive(Debug, Clone)]
pub struct SomaFm {
    client: Client,
    api_url: String,
    songs_url: String,
    server: IceServer,
}

impl SomaFm {
    pub fn new(config: &PlayerConfig) -> Self {
        let client = Client::builder()
            .user_agent(format!("{}/{}", APP_METADATA_NAME, APP_METADATA_VERSION))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            songs_url: config.songs_url.trim_end_matches('/').to_string(),
            server: config.preferred_server,
        }
    }

    pub fn with_server(mut self, server: IceServer) -> Self {
        self.server = server;
        self
    }

    async fn get_text(&self, url: &str) -> Result<String, ApiError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            return Err(ApiError::Status(response.status()));
        }
        Ok(response.text().await?)
    }

    pub async fn fetch_channels(&self) -> Result<Vec<Channel>, ApiError> {
        let url = format!("{}/channels.json", self.api_url);
        let body = self.get_text(&url).await?;
        let channels = parse_channels(&body)?;
        tracing::debug!(count = channels.len(), "fetched channel catalogue");
        Ok(channels)
    }

    /// Fetches the playlist chosen by [`select_playlist`] and returns its stream URL.
    ///
    /// `Ok(None)` means the channel has no playlist or the playlist was empty.
    pub async fn resolve_stream(&self, channel: &Channel) -> Result<Option<String>, ApiError> {
        let Some(playlist) = select_playlist(channel) else {
            return Ok(None);
        };
        let body = self.get_text(&playlist.url).await?;
        let url = playlist::parse_pls(&body, self.server);
        if let Some(url) = &url {
            tracing::info!(channel = %channel.id, url = %url, "resolved stream");
        }
        Ok(url)
    }

    /// Every mirror of the channel's stream.
    pub async fn stream_mirrors(&self, channel: &Channel) -> Result<Vec<String>, ApiError> {
        let Some(playlist) = select_playlist(channel) else {
            return Ok(Vec::new());
        };
        let body = self.get_text(&playlist.url).await?;
        Ok(playlist::all_stream_urls(&body))
    }

    /// Song currently on air. Metadata is best effort: failures are logged and
    /// reported as `None`.
    pub async fn fetch_now_playing(&self, channel_id: &str) -> Option<Song> {
        let url = format!("{}/{}.json", self.songs_url, channel_id);
        let result = match self.get_text(&url).await {
            Ok(body) => parse_now_playing(&body),
            Err(e) => Err(e),
        };
        match result {
            Ok(song) => song,
            Err(e) => {
                tracing::warn!(channel = channel_id, error = %e, "failed to fetch song metadata");
                None
            }
        }
    }
}
