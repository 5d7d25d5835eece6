//! Core library modules for the soma-rail application.
//!
//! ## Features
//!
//! - **Attention Tracking**: Distraction score integrated from pointer and focus signals
//! - **Playback Control**: Score-driven playback rate and volume, pushed to bound sinks
//! - **Session Runtime**: Fixed-cadence tick and event queue on a single task
//! - **Playlists**: PLS parsing and relay server selection
//! - **Core Infrastructure**: Configuration, preferences, messaging
//!
//! ## Usage
//!
//! ```rust,no_run
//! use soma_rail::libs::attention::{AttentionConfig, AttentionMonitor};
//! use soma_rail::libs::playback::PlaybackMapper;
//! use soma_rail::libs::session::Session;
//! use tokio::time::Instant;
//!
//! # async fn run() {
//! let config = AttentionConfig::default();
//! let mapper = PlaybackMapper::new(config.distraction_max);
//! let session = Session::new(AttentionMonitor::new(config, Instant::now()), mapper);
//! let handle = session.start(true);
//! println!("{:?}", handle.reading());
//! # }
//! ```

pub mod attention;
pub mod config;
pub mod data_storage;
pub mod input;
pub mod messages;
pub mod playback;
pub mod playlist;
pub mod session;
pub mod sink;
pub mod store;
pub mod view;
