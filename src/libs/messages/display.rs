//! Display implementation for soma-rail messages.
//!
//! All user-facing text lives here, so commands only deal with structured
//! [`Message`] values.

use super::types::Message;
use std::fmt::{Display, Formatter, Result};

fn percent(value: f64) -> String {
    format!("{:.0}%", value * 100.0)
}

impl Display for Message {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let text = match self {
            // === CONFIGURATION MESSAGES ===
            Message::ConfigSaved => "Configuration saved successfully".to_string(),
            Message::ConfigDeleted => "Configuration removed".to_string(),
            Message::ConfigModulePlayer => "Player settings".to_string(),
            Message::ConfigModuleAttention => "Attention settings".to_string(),
            Message::PromptSelectModules => "Select modules to configure".to_string(),
            Message::PromptApiUrl => "Enter the channel catalogue URL".to_string(),
            Message::PromptSongsUrl => "Enter the song metadata URL".to_string(),
            Message::PromptPreferredServer => "Select the preferred relay server".to_string(),
            Message::PromptMetadataPollInterval => "Enter the metadata refresh interval (in seconds)".to_string(),
            Message::PromptMinRate => "Enter the slowest playback rate the player supports".to_string(),
            Message::PromptJitterThreshold => "Enter the pointer jitter threshold (in pixels)".to_string(),
            Message::PromptDistractionIncrement => "Enter the distraction increment per tick".to_string(),
            Message::PromptRecoveryDuration => "Enter the full recovery duration (in milliseconds)".to_string(),
            Message::PromptCalmThreshold => "Enter the calm time before recovery starts (in milliseconds)".to_string(),
            Message::AttentionConfigInvalid(error) => format!("Ignoring attention settings ({}), using defaults", error),

            // === CHANNEL MESSAGES ===
            Message::ChannelsFetchFailed(error) => format!("Failed to fetch channels: {}", error),
            Message::ChannelsNotFound => "No channels available".to_string(),
            Message::ChannelNotFound(id) => format!("Channel '{}' not found", id),
            Message::ChannelsHeader(count) => format!("{} channels", count),
            Message::NoPlaylistForChannel(id) => format!("No playlist available for channel '{}'", id),
            Message::StreamResolveFailed(error) => format!("Failed to load stream: {}", error),
            Message::StreamUrl(url) => format!("Stream URL: {}", url),
            Message::StreamMirrors => "Mirrors:".to_string(),

            // === NOW PLAYING MESSAGES ===
            Message::NowPlaying { artist, title, since } => match since {
                Some(since) => format!("Now playing: {} - {} (since {})", artist, title, since),
                None => format!("Now playing: {} - {}", artist, title),
            },
            Message::NowPlayingUnknown => "Now playing: unknown".to_string(),

            // === VOLUME MESSAGES ===
            Message::VolumeSet(volume) => format!("Volume set to {}", percent(*volume)),
            Message::VolumeCurrent(volume) => format!("Volume is {}", percent(*volume)),

            // === WATCH MESSAGES ===
            Message::WatchStarted { channel, volume } => format!(
                "Tuned to '{}' at {} volume. Move the mouse and the train slows down. Press Ctrl+C to exit.",
                channel,
                percent(*volume)
            ),
            Message::WatchStatus {
                score,
                rate,
                volume,
                moving,
                focused,
                refused_rates,
            } => {
                let mut line = format!(
                    "distraction {:>5.1} | speed {:.2}x | volume {:>4} | {}{}",
                    score,
                    rate,
                    percent(*volume),
                    if *moving { "moving" } else { "still" },
                    if *focused { "" } else { ", unfocused" }
                );
                if *refused_rates > 0 {
                    line.push_str(&format!(" | {} speed changes refused", refused_rates));
                }
                line
            }
            Message::WatchShuttingDown => "Shutting down...".to_string(),
            Message::WatchStopped(score) => format!("Stopped with distraction score {:.1}", score),
            Message::WatchReceivedSigint => "Received SIGINT, stopping".to_string(),
            Message::WatchReceivedSigterm => "Received SIGTERM, stopping".to_string(),
            Message::WatchSignalHandlingNotSupported => "Signal handling is not supported on this platform".to_string(),
            Message::SessionError(error) => format!("Attention session error: {}", error),
        };
        write!(f, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_volume_rendered_as_percent() {
        assert_eq!(Message::VolumeSet(0.35).to_string(), "Volume set to 35%");
    }

    #[test]
    fn test_watch_status_line() {
        let line = Message::WatchStatus {
            score: 50.0,
            rate: 0.5,
            volume: 0.35,
            moving: true,
            focused: false,
            refused_rates: 0,
        }
        .to_string();
        assert_eq!(line, "distraction  50.0 | speed 0.50x | volume  35% | moving, unfocused");
    }

    #[test]
    fn test_watch_status_reports_refused_rates() {
        let line = Message::WatchStatus {
            score: 90.0,
            rate: 0.25,
            volume: 0.07,
            moving: false,
            focused: true,
            refused_rates: 3,
        }
        .to_string();
        assert_eq!(line, "distraction  90.0 | speed 0.25x | volume   7% | still | 3 speed changes refused");
    }
}
