//! PLS playlist handling.
//!
//! SomaFM publishes one `.pls` file per stream. Only the first entry is used,
//! and its relay host can be swapped for a preferred `iceN` server.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

const ENTRY_KEY: &str = "File1=";

static RELAY_HOST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"ice[1-6]\.somafm\.com").expect("RELAY_HOST_RE regex pattern is valid"));

/// Relay servers serving SomaFM streams.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum IceServer {
    Ice1,
    Ice2,
    Ice3,
    Ice4,
    Ice5,
    #[default]
    Ice6,
    /// Keep whatever host the playlist names.
    Original,
}

/// Fallback order used when listing every mirror of a stream.
pub const MIRROR_ORDER: [IceServer; 5] = [IceServer::Ice3, IceServer::Ice1, IceServer::Ice4, IceServer::Ice5, IceServer::Ice6];

impl IceServer {
    fn host(&self) -> Option<&'static str> {
        match self {
            IceServer::Ice1 => Some("ice1"),
            IceServer::Ice2 => Some("ice2"),
            IceServer::Ice3 => Some("ice3"),
            IceServer::Ice4 => Some("ice4"),
            IceServer::Ice5 => Some("ice5"),
            IceServer::Ice6 => Some("ice6"),
            IceServer::Original => None,
        }
    }
}

impl fmt::Display for IceServer {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.host().unwrap_or("original"))
    }
}

impl FromStr for IceServer {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ice1" => Ok(IceServer::Ice1),
            "ice2" => Ok(IceServer::Ice2),
            "ice3" => Ok(IceServer::Ice3),
            "ice4" => Ok(IceServer::Ice4),
            "ice5" => Ok(IceServer::Ice5),
            "ice6" => Ok(IceServer::Ice6),
            "original" => Ok(IceServer::Original),
            other => Err(format!("unknown server '{}'", other)),
        }
    }
}

/// Extracts the first stream URL from PLS text, pointed at `server`.
///
/// Returns `None` when the text carries no `File1=` entry or the entry is blank.
pub fn parse_pls(text: &str, server: IceServer) -> Option<String> {
    let start = text.find(ENTRY_KEY)? + ENTRY_KEY.len();
    let rest = &text[start..];
    let line = rest.lines().next().unwrap_or("");
    let url = line.trim();
    if url.is_empty() {
        return None;
    }

    match server.host() {
        Some(host) => Some(replace_relay_host(url, host)),
        None => Some(url.to_string()),
    }
}

/// Every mirror of the playlist's stream, in [`MIRROR_ORDER`].
pub fn all_stream_urls(text: &str) -> Vec<String> {
    match parse_pls(text, IceServer::Original) {
        Some(base) => MIRROR_ORDER
            .iter()
            .filter_map(|server| server.host())
            .map(|host| replace_relay_host(&base, host))
            .collect(),
        None => Vec::new(),
    }
}

// Rewrites the first relay host; other hosts pass through unchanged.
fn replace_relay_host(url: &str, host: &str) -> String {
    let relay = format!("{}.somafm.com", host);
    RELAY_HOST_RE.replacen(url, 1, relay.as_str()).into_owned()
}
