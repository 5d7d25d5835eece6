//! Small key-value store for listener preferences.
//!
//! Values are kept as JSON in `preferences.json` next to the configuration
//! file and written back on every change, so a crash never loses the last
//! volume the listener picked.

use super::data_storage::DataStorage;
use anyhow::Result;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::path::PathBuf;

pub const PREFERENCES_FILE_NAME: &str = "preferences.json";

pub const VOLUME_KEY: &str = "volume";
pub const CHANNEL_KEY: &str = "channel";

#[derive(Debug, Clone)]
pub struct Preferences {
    path: PathBuf,
    values: Map<String, Value>,
}

impl Preferences {
    /// Opens the store in the application data directory.
    ///
    /// A missing or unreadable file yields an empty store; it is recreated on
    /// the next write.
    pub fn open() -> Result<Self> {
        let path = DataStorage::new().get_path(PREFERENCES_FILE_NAME)?;
        Ok(Self::open_at(path))
    }

    pub fn open_at(path: PathBuf) -> Self {
        let values = fs::read_to_string(&path)
            .ok()
            .and_then(|text| match serde_json::from_str::<Map<String, Value>>(&text) {
                Ok(values) => Some(values),
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "ignoring corrupt preferences file");
                    None
                }
            })
            .unwrap_or_default();
        Self { path, values }
    }

    /// Reads `key`, or `None` when absent or of another shape.
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let value = self.values.get(key)?.clone();
        serde_json::from_value(value).ok()
    }

    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Stores `value` under `key` and persists the whole store.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<()> {
        let value = serde_json::to_value(value)?;
        if self.values.get(key) == Some(&value) {
            return Ok(());
        }
        self.values.insert(key.to_string(), value);
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = File::create(&self.path)?;
        serde_json::to_writer_pretty(&file, &self.values)?;
        Ok(())
    }
}
