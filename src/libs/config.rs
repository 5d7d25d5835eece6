//! Configuration management for soma-rail.
//!
//! Handles the player settings (where the channel catalogue lives, which relay
//! server to prefer, how often to refresh song metadata) and the tuning
//! constants of the attention monitor. Both sections are optional so a fresh
//! installation runs on built-in defaults.
//!
//! ## Storage
//!
//! The configuration is stored as pretty-printed JSON in the platform-specific
//! application data directory:
//! - **Windows**: `%LOCALAPPDATA%\soma-rail\config.json`
//! - **macOS**: `~/Library/Application Support/soma-rail/config.json`
//! - **Linux**: `~/.local/share/soma-rail/config.json`
//!
//! ## Usage Examples
//!
//! ```rust,no_run
//! use soma_rail::libs::config::Config;
//!
//! let config = Config::read()?;
//! let player = config.player.clone().unwrap_or_default();
//! println!("Catalogue: {}", player.api_url);
//! # Ok::<(), anyhow::Error>(())
//! ```

use super::attention::AttentionConfig;
use super::data_storage::DataStorage;
use super::playlist::IceServer;
use crate::libs::messages::Message;
use crate::{msg_print, msg_warning};
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, MultiSelect, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::Path;

/// Configuration file name used for storing application settings.
pub const CONFIG_FILE_NAME: &str = "config.json";

/// Represents a configurable module in the interactive setup.
#[derive(Debug, Clone)]
pub struct ConfigModule {
    /// Unique identifier for the module used in configuration routing
    pub key: String,
    /// Display name shown to users during interactive setup
    pub name: String,
}

/// Player configuration settings.
///
/// Controls where channel data comes from and how streams are resolved.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct PlayerConfig {
    /// Base URL of the channel catalogue API.
    ///
    /// The catalogue is fetched from `{api_url}/channels.json`.
    pub api_url: String,

    /// Base URL of the "now playing" endpoint.
    ///
    /// Song metadata is fetched from `{songs_url}/{channel_id}.json`.
    pub songs_url: String,

    /// Relay server used when resolving stream URLs from playlists.
    pub preferred_server: IceServer,

    /// Interval in seconds between song metadata refreshes.
    pub metadata_poll_interval: u64,

    /// Slowest non-zero speed the player accepts.
    ///
    /// Slower rates requested by the attention mapping are rejected by the
    /// player and logged; a rate of zero (stopped) is always accepted.
    pub min_rate: f64,
}

impl Default for PlayerConfig {
    /// Defaults point at the public SomaFM endpoints.
    ///
    /// - `https://api.somafm.com` catalogue
    /// - `https://somafm.com/songs` metadata
    /// - `ice6` relay
    /// - 45 seconds metadata refresh
    /// - 0.25x minimum speed
    fn default() -> Self {
        PlayerConfig {
            api_url: "https://api.somafm.com".to_string(),
            songs_url: "https://somafm.com/songs".to_string(),
            preferred_server: IceServer::default(),
            metadata_poll_interval: 45,
            min_rate: 0.25,
        }
    }
}

/// Main configuration container.
///
/// The `skip_serializing_if = "Option::is_none"` attribute keeps unconfigured
/// sections out of the JSON file.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Config {
    /// Player and catalogue settings.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerConfig>,

    /// Attention monitor tuning.
    ///
    /// Most listeners never need to touch these; the defaults reproduce the
    /// intended "slows down within a second and a half" feel.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attention: Option<AttentionConfig>,
}

impl Config {
    /// Reads configuration from the filesystem.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file exists but cannot be read or
    /// parsed. A missing file is not an error; defaults are returned instead.
    pub fn read() -> Result<Config> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        Self::read_from(&config_file_path)
    }

    /// Reads configuration from an explicit file path.
    pub fn read_from(path: &Path) -> Result<Config> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let config_str = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&config_str)?;
        Ok(config)
    }

    /// Saves the configuration as pretty-printed JSON, overwriting any existing file.
    pub fn save(&self) -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        self.save_to(&config_file_path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Removes the configuration file if present.
    pub fn delete() -> Result<()> {
        let config_file_path = DataStorage::new().get_path(CONFIG_FILE_NAME)?;
        if config_file_path.exists() {
            fs::remove_file(config_file_path)?;
        }
        Ok(())
    }

    pub fn player_or_default(&self) -> PlayerConfig {
        self.player.clone().unwrap_or_default()
    }

    /// Attention tuning, or the defaults when the stored values are unusable.
    pub fn attention_or_default(&self) -> AttentionConfig {
        let attention = self.attention.clone().unwrap_or_default();
        match attention.validate() {
            Ok(()) => attention,
            Err(e) => {
                msg_warning!(Message::AttentionConfigInvalid(e.to_string()));
                AttentionConfig::default()
            }
        }
    }

    /// Runs the interactive configuration wizard.
    ///
    /// Existing values are offered as defaults, so re-running the wizard only
    /// changes what the user edits.
    pub fn init() -> Result<Self> {
        let mut config = Self::read().unwrap_or_default();

        let modules = vec![
            ConfigModule {
                key: "player".to_string(),
                name: "Player".to_string(),
            },
            ConfigModule {
                key: "attention".to_string(),
                name: "Attention".to_string(),
            },
        ];

        let selected = MultiSelect::with_theme(&ColorfulTheme::default())
            .with_prompt(Message::PromptSelectModules.to_string())
            .items(&modules.iter().map(|module| &module.name).collect::<Vec<_>>())
            .interact()?;

        for &selection in &selected {
            match modules[selection].key.as_str() {
                "player" => config.player = Some(Self::init_player(config.player_or_default())?),
                "attention" => config.attention = Some(Self::init_attention(config.attention_or_default())?),
                _ => {}
            }
        }

        Ok(config)
    }

    fn init_player(default: PlayerConfig) -> Result<PlayerConfig> {
        msg_print!(Message::ConfigModulePlayer);

        let servers = [
            IceServer::Ice1,
            IceServer::Ice2,
            IceServer::Ice3,
            IceServer::Ice4,
            IceServer::Ice5,
            IceServer::Ice6,
            IceServer::Original,
        ];
        let current = servers.iter().position(|s| *s == default.preferred_server).unwrap_or(5);

        Ok(PlayerConfig {
            api_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptApiUrl.to_string())
                .default(default.api_url)
                .interact_text()?,
            songs_url: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptSongsUrl.to_string())
                .default(default.songs_url)
                .interact_text()?,
            preferred_server: servers[Select::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptPreferredServer.to_string())
                .items(&servers)
                .default(current)
                .interact()?],
            metadata_poll_interval: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptMetadataPollInterval.to_string())
                .default(default.metadata_poll_interval)
                .interact_text()?,
            min_rate: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptMinRate.to_string())
                .default(default.min_rate)
                .interact_text()?,
        })
    }

    fn init_attention(default: AttentionConfig) -> Result<AttentionConfig> {
        msg_print!(Message::ConfigModuleAttention);

        Ok(AttentionConfig {
            jitter_threshold: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptJitterThreshold.to_string())
                .default(default.jitter_threshold)
                .interact_text()?,
            distraction_increment: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptDistractionIncrement.to_string())
                .default(default.distraction_increment)
                .interact_text()?,
            recovery_duration: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptRecoveryDuration.to_string())
                .default(default.recovery_duration)
                .interact_text()?,
            calm_threshold: Input::with_theme(&ColorfulTheme::default())
                .with_prompt(Message::PromptCalmThreshold.to_string())
                .default(default.calm_threshold)
                .interact_text()?,
            ..default
        })
    }
}
