//! Maps the distraction score onto playback speed and volume.
//!
//! The mapping is linear: a calm listener hears the stream at full speed and
//! the configured base volume, a fully distracted one hears nothing at all.
//! Outputs are pushed to whichever sinks are bound, as soon as an input
//! changes. Sinks are optional and their failures never escape the mapper.

use thiserror::Error;

/// Errors a playback sink may report when asked to change its output.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SinkError {
    #[error("Unsupported playback rate: {0}")]
    UnsupportedRate(f64),

    #[error("Sink unavailable: {0}")]
    Unavailable(String),
}

/// A player whose speed can be changed (e.g. an embedded video).
pub trait RateSink: Send {
    fn set_playback_rate(&mut self, rate: f64) -> Result<(), SinkError>;
}

/// A player whose output level can be changed (e.g. the audio stream).
pub trait VolumeSink: Send {
    fn set_volume(&mut self, level: f64) -> Result<(), SinkError>;
}

pub const DEFAULT_BASE_VOLUME: f64 = 0.7;

fn normalize(score: f64, max: f64) -> f64 {
    if max <= 0.0 || score.is_nan() {
        return 0.0;
    }
    score / max
}

/// Playback speed for a score: 1.0 when calm, 0.0 at maximum distraction.
pub fn playback_rate(score: f64, max: f64) -> f64 {
    (1.0 - normalize(score, max)).clamp(0.0, 1.0)
}

/// Volume multiplier for a score, same curve as [`playback_rate`].
pub fn volume_multiplier(score: f64, max: f64) -> f64 {
    (1.0 - normalize(score, max)).clamp(0.0, 1.0)
}

pub struct PlaybackMapper {
    distraction_max: f64,
    distraction_score: f64,
    base_volume: f64,
    playback_rate: f64,
    volume_multiplier: f64,
    rate_sink: Option<Box<dyn RateSink>>,
    volume_sink: Option<Box<dyn VolumeSink>>,
}

impl std::fmt::Debug for PlaybackMapper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PlaybackMapper")
            .field("distraction_score", &self.distraction_score)
            .field("base_volume", &self.base_volume)
            .field("playback_rate", &self.playback_rate)
            .field("volume_multiplier", &self.volume_multiplier)
            .field("rate_sink", &self.rate_sink.is_some())
            .field("volume_sink", &self.volume_sink.is_some())
            .finish()
    }
}

impl PlaybackMapper {
    pub fn new(distraction_max: f64) -> Self {
        Self {
            distraction_max,
            distraction_score: 0.0,
            base_volume: DEFAULT_BASE_VOLUME,
            playback_rate: 1.0,
            volume_multiplier: 1.0,
            rate_sink: None,
            volume_sink: None,
        }
    }

    pub fn distraction_score(&self) -> f64 {
        self.distraction_score
    }

    pub fn playback_rate(&self) -> f64 {
        self.playback_rate
    }

    pub fn volume_multiplier(&self) -> f64 {
        self.volume_multiplier
    }

    pub fn base_volume(&self) -> f64 {
        self.base_volume
    }

    /// Level currently expected at the volume sink.
    pub fn effective_volume(&self) -> f64 {
        self.base_volume * self.volume_multiplier
    }

    /// Binds the rate sink and brings it up to date.
    pub fn bind_rate_sink(&mut self, sink: Box<dyn RateSink>) {
        self.rate_sink = Some(sink);
        self.apply_rate(self.playback_rate);
    }

    /// Binds the volume sink and brings it up to date.
    pub fn bind_volume_sink(&mut self, sink: Box<dyn VolumeSink>) {
        self.volume_sink = Some(sink);
        self.apply_volume(self.volume_multiplier);
    }

    pub fn unbind_rate_sink(&mut self) -> Option<Box<dyn RateSink>> {
        self.rate_sink.take()
    }

    pub fn unbind_volume_sink(&mut self) -> Option<Box<dyn VolumeSink>> {
        self.volume_sink.take()
    }

    /// Stores the listener's preferred volume, clamped to `[0, 1]`.
    ///
    /// NaN leaves the current preference untouched.
    pub fn set_base_volume(&mut self, volume: f64) {
        if volume.is_nan() {
            tracing::warn!("ignoring NaN base volume");
            return;
        }
        let volume = volume.clamp(0.0, 1.0);
        if volume == self.base_volume {
            return;
        }
        self.base_volume = volume;
        self.apply_volume(self.volume_multiplier);
    }

    /// Feeds a new score and re-pushes every output that changed.
    pub fn set_distraction_score(&mut self, score: f64) {
        if score.is_nan() || score == self.distraction_score {
            return;
        }
        self.distraction_score = score;

        let rate = playback_rate(score, self.distraction_max);
        if rate != self.playback_rate {
            self.playback_rate = rate;
            self.apply_rate(rate);
        }

        let multiplier = volume_multiplier(score, self.distraction_max);
        if multiplier != self.volume_multiplier {
            self.volume_multiplier = multiplier;
            self.apply_volume(multiplier);
        }
    }

    fn apply_rate(&mut self, rate: f64) {
        if let Some(sink) = self.rate_sink.as_mut() {
            if let Err(e) = sink.set_playback_rate(rate) {
                tracing::warn!(rate, error = %e, "failed to set playback rate");
            }
        }
    }

    fn apply_volume(&mut self, multiplier: f64) {
        let level = self.base_volume * multiplier;
        if let Some(sink) = self.volume_sink.as_mut() {
            if let Err(e) = sink.set_volume(level) {
                tracing::warn!(level, error = %e, "failed to set volume");
            }
        }
    }
}
