//! Console playback sinks.
//!
//! The terminal player has no decoder of its own, so these sinks record what
//! would be applied to the real outputs on a shared [`StatusBoard`] that the
//! `watch` command renders.

use super::playback::{RateSink, SinkError, VolumeSink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Last values applied to each output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerStatus {
    pub playback_rate: f64,
    pub volume: f64,
    pub rejected_rates: u64,
}

impl Default for PlayerStatus {
    fn default() -> Self {
        Self {
            playback_rate: 1.0,
            volume: 0.0,
            rejected_rates: 0,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct StatusBoard {
    inner: Arc<Mutex<PlayerStatus>>,
}

impl StatusBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PlayerStatus {
        *self.inner.lock()
    }

    pub fn rate_sink(&self, min_rate: f64) -> ConsoleRateSink {
        ConsoleRateSink {
            board: self.clone(),
            min_rate,
        }
    }

    pub fn volume_sink(&self) -> ConsoleVolumeSink {
        ConsoleVolumeSink { board: self.clone() }
    }
}

/// Rate sink that, like most players, refuses very slow but non-zero speeds.
#[derive(Debug)]
pub struct ConsoleRateSink {
    board: StatusBoard,
    min_rate: f64,
}

impl RateSink for ConsoleRateSink {
    fn set_playback_rate(&mut self, rate: f64) -> Result<(), SinkError> {
        let supported = rate == 0.0 || (rate >= self.min_rate && rate <= 1.0);
        if !supported {
            self.board.inner.lock().rejected_rates += 1;
            return Err(SinkError::UnsupportedRate(rate));
        }
        self.board.inner.lock().playback_rate = rate;
        Ok(())
    }
}

#[derive(Debug)]
pub struct ConsoleVolumeSink {
    board: StatusBoard,
}

impl VolumeSink for ConsoleVolumeSink {
    fn set_volume(&mut self, level: f64) -> Result<(), SinkError> {
        self.board.inner.lock().volume = level.clamp(0.0, 1.0);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_below_minimum_is_rejected() {
        let board = StatusBoard::new();
        let mut sink = board.rate_sink(0.25);

        assert_eq!(sink.set_playback_rate(0.1), Err(SinkError::UnsupportedRate(0.1)));
        assert!(sink.set_playback_rate(0.0).is_ok());
        assert!(sink.set_playback_rate(0.5).is_ok());

        let status = board.snapshot();
        assert_eq!(status.playback_rate, 0.5);
        assert_eq!(status.rejected_rates, 1);
    }

    #[test]
    fn test_volume_is_recorded() {
        let board = StatusBoard::new();
        let mut sink = board.volume_sink();
        sink.set_volume(0.35).unwrap();
        assert_eq!(board.snapshot().volume, 0.35);
    }
}
