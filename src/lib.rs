//! # Soma Rail - focus radio
//!
//! A terminal companion for SomaFM that treats fidgeting as distraction:
//! moving the mouse or looking away slows the music down and fades it out,
//! sitting still lets it recover.
//!
//! ## Features
//!
//! - **Attention Tracking**: Distraction score from pointer movement and focus
//! - **Playback Control**: Score mapped onto playback speed and volume
//! - **Channel Catalogue**: Browse SomaFM channels and resolve stream URLs
//! - **Now Playing**: Song metadata with periodic refresh
//! - **Preferences**: Base volume and last channel kept between runs
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soma_rail::commands::Cli;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     Cli::menu().await
//! }
//! ```

pub mod api;
pub mod commands;
pub mod libs;
