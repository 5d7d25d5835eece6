//! Remote services used by the player.

pub mod somafm;

pub use somafm::{ApiError, Channel, Playlist, SomaFm, Song};
