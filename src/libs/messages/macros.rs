//! Macros for user-facing output.
//!
//! Every macro prints plain console text in normal mode and routes through
//! `tracing` when debug mode is on, so log lines and messages interleave in
//! one stream.
//!
//! ## Debug Mode Detection
//!
//! - **`SOMA_RAIL_DEBUG`**: Explicit debug mode enablement
//! - **`RUST_LOG`**: Standard Rust logging configuration
//!
//! Passing `true` as a second argument pads the message with blank lines.
//!
//! ```rust
//! use soma_rail::{msg_info, msg_success};
//! use soma_rail::libs::messages::Message;
//!
//! msg_success!(Message::ConfigSaved);
//! msg_info!(Message::VolumeCurrent(0.7), true);
//! ```

use std::sync::OnceLock;

static DEBUG_MODE: OnceLock<bool> = OnceLock::new();

/// Cached check for `SOMA_RAIL_DEBUG` / `RUST_LOG`.
#[doc(hidden)]
pub fn is_debug_mode() -> bool {
    *DEBUG_MODE.get_or_init(|| std::env::var("SOMA_RAIL_DEBUG").is_ok() || std::env::var("RUST_LOG").is_ok())
}

/// Shared routing: `tracing` at `$level` in debug mode, `$console` otherwise.
#[doc(hidden)]
#[macro_export]
macro_rules! __msg_emit {
    ($level:ident, $console:ident, $prefix:expr, $msg:expr, padded) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("\n{}{}\n", $prefix, $msg);
        } else {
            $console!("\n{}{}\n", $prefix, $msg);
        }
    };
    ($level:ident, $console:ident, $prefix:expr, $msg:expr) => {
        if $crate::libs::messages::macros::is_debug_mode() {
            tracing::$level!("{}{}", $prefix, $msg);
        } else {
            $console!("{}{}", $prefix, $msg);
        }
    };
}

/// Displays a message without decoration.
#[macro_export]
macro_rules! msg_print {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "", $msg, padded)
    };
}

#[macro_export]
macro_rules! msg_success {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "✅ ", $msg, padded)
    };
}

/// Error output goes to stderr outside of debug mode.
#[macro_export]
macro_rules! msg_error {
    ($msg:expr) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(error, eprintln, "❌ ", $msg, padded)
    };
}

#[macro_export]
macro_rules! msg_warning {
    ($msg:expr) => {
        $crate::__msg_emit!(warn, println, "⚠️ ", $msg)
    };
}

#[macro_export]
macro_rules! msg_info {
    ($msg:expr) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg)
    };
    ($msg:expr, true) => {
        $crate::__msg_emit!(info, println, "ℹ️ ", $msg, padded)
    };
}

/// Builds an `anyhow::Error` from a message.
#[macro_export]
macro_rules! msg_error_anyhow {
    ($msg:expr) => {
        anyhow::anyhow!("❌ {}", $msg)
    };
}
