//! Attention tracking for the focus radio.
//!
//! Integrates raw pointer and focus signals into a bounded distraction score.
//! The score rises by a fixed amount on every tick while the listener is
//! moving the pointer or looking away, and decays linearly back to zero once
//! they have stayed calm long enough.
//!
//! ## Dynamics
//!
//! ```text
//!  pointer / focus events          periodic tick (~60 Hz)
//!          │                                │
//!          ▼                                ▼
//!  ┌───────────────┐   is_moving    ┌───────────────────┐
//!  │ grace period  │───────────────▶│ moving || !focus? │──yes──▶ score += increment
//!  │ throttle      │   is_focused   │                   │
//!  │ jitter filter │───────────────▶│                   │──no───▶ calm > 2s? score -= decay
//!  └───────────────┘                └───────────────────┘
//! ```
//!
//! All operations take the current instant explicitly, so the state machine is
//! fully deterministic and the caller decides where time comes from.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::time::{Duration, Instant};

/// A tuning value outside the range the monitor can work with.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum AttentionConfigError {
    #[error("distraction_max must be a positive number, got {0}")]
    DistractionMax(f64),

    #[error("{name} must be a non-negative number, got {value}")]
    Negative { name: &'static str, value: f64 },

    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

/// Tuning constants of the attention monitor.
///
/// Durations are expressed in milliseconds so the structure can be stored in
/// the JSON configuration file as plain numbers.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct AttentionConfig {
    /// Minimum pointer travel in pixels that counts as intentional movement.
    pub jitter_threshold: f64,
    /// Score added on every tick while distracted.
    pub distraction_increment: f64,
    /// Upper bound of the distraction score.
    pub distraction_max: f64,
    /// Time in milliseconds for a full score to drain back to zero.
    pub recovery_duration: u64,
    /// Tick cadence in milliseconds.
    pub tick_interval: u64,
    /// Minimum spacing between accepted pointer samples in milliseconds.
    pub sample_interval: u64,
    /// How long a qualifying movement keeps the listener "moving", in milliseconds.
    pub stillness_window: u64,
    /// Calm time in milliseconds required before recovery starts.
    pub calm_threshold: u64,
    /// Window in milliseconds after start/reset during which pointer input is ignored.
    pub grace_period: u64,
    /// How far in the past the last movement is placed on start/reset, in milliseconds.
    pub startup_backdate: u64,
}

impl Default for AttentionConfig {
    fn default() -> Self {
        AttentionConfig {
            jitter_threshold: 5.0,
            distraction_increment: 1.1,
            distraction_max: 100.0,
            recovery_duration: 5000,
            tick_interval: 16,
            sample_interval: 16,
            stillness_window: 100,
            calm_threshold: 2000,
            grace_period: 2000,
            startup_backdate: 10_000,
        }
    }
}

impl AttentionConfig {
    /// Score removed per calm tick, so that a full score drains in `recovery_duration`.
    pub fn decay_per_tick(&self) -> f64 {
        let ticks = self.recovery_duration as f64 / self.tick_interval.max(1) as f64;
        if ticks <= 0.0 {
            return self.distraction_max;
        }
        self.distraction_max / ticks
    }

    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_interval.max(1))
    }

    /// Checks the values a hand-edited config file could get wrong.
    pub fn validate(&self) -> Result<(), AttentionConfigError> {
        if !self.distraction_max.is_finite() || self.distraction_max <= 0.0 {
            return Err(AttentionConfigError::DistractionMax(self.distraction_max));
        }
        for (name, value) in [
            ("jitter_threshold", self.jitter_threshold),
            ("distraction_increment", self.distraction_increment),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AttentionConfigError::Negative { name, value });
            }
        }
        if self.tick_interval == 0 {
            return Err(AttentionConfigError::Zero("tick_interval"));
        }
        if self.recovery_duration == 0 {
            return Err(AttentionConfigError::Zero("recovery_duration"));
        }
        Ok(())
    }
}

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        ((other.x - self.x).powi(2) + (other.y - self.y).powi(2)).sqrt()
    }
}

/// Raw interaction signals delivered by the host environment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InteractionEvent {
    PointerMove { x: f64, y: f64 },
    /// Window focus/visibility transition; `true` when focused and visible.
    Focus(bool),
}

/// Mutable state of the monitor.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionState {
    /// Last position that cleared the jitter threshold.
    pub last_pointer_position: Position,
    /// Most recent accepted sample, whether or not it cleared the jitter threshold.
    pub pointer_position: Position,
    pub last_pointer_sample: Option<Instant>,
    pub is_focused: bool,
    pub distraction_score: f64,
    pub last_movement: Instant,
    pub is_moving: bool,
    pub last_score_increase: Instant,
    pub grace_period_end: Instant,
}

impl InteractionState {
    fn new(now: Instant, config: &AttentionConfig) -> Self {
        Self {
            last_pointer_position: Position::default(),
            pointer_position: Position::default(),
            last_pointer_sample: None,
            is_focused: true,
            distraction_score: 0.0,
            last_movement: backdate(now, config.startup_backdate),
            is_moving: false,
            last_score_increase: now,
            grace_period_end: now + Duration::from_millis(config.grace_period),
        }
    }
}

// Falls back to `now` on platforms whose monotonic clock starts too recently.
fn backdate(now: Instant, millis: u64) -> Instant {
    now.checked_sub(Duration::from_millis(millis)).unwrap_or(now)
}

/// Stateful integrator turning interaction events into a distraction score.
#[derive(Debug, Clone)]
pub struct AttentionMonitor {
    config: AttentionConfig,
    state: InteractionState,
}

impl AttentionMonitor {
    pub fn new(config: AttentionConfig, now: Instant) -> Self {
        let state = InteractionState::new(now, &config);
        Self { config, state }
    }

    pub fn config(&self) -> &AttentionConfig {
        &self.config
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn distraction_score(&self) -> f64 {
        self.state.distraction_score
    }

    /// Score scaled into `[0, 1]`.
    pub fn normalized_score(&self) -> f64 {
        if self.config.distraction_max <= 0.0 {
            return 0.0;
        }
        (self.state.distraction_score / self.config.distraction_max).clamp(0.0, 1.0)
    }

    /// Dispatches a raw event to the matching handler.
    pub fn handle(&mut self, event: InteractionEvent, now: Instant) {
        match event {
            InteractionEvent::PointerMove { x, y } => self.on_pointer_move(Position::new(x, y), now),
            InteractionEvent::Focus(focused) => self.on_focus_change(focused),
        }
    }

    /// Handles a pointer sample.
    ///
    /// Samples inside the grace period or the throttle window are dropped
    /// without touching state. Accepted samples only count as movement when
    /// they travel further than the jitter threshold from the last qualifying
    /// position.
    pub fn on_pointer_move(&mut self, position: Position, now: Instant) {
        if now < self.state.grace_period_end {
            return;
        }

        if let Some(last_sample) = self.state.last_pointer_sample {
            if now.saturating_duration_since(last_sample) < Duration::from_millis(self.config.sample_interval) {
                return;
            }
        }

        let position = self.sanitize(position);
        self.state.last_pointer_sample = Some(now);
        self.state.pointer_position = position;

        let distance = position.distance(&self.state.last_pointer_position);
        if distance > self.config.jitter_threshold {
            self.state.is_moving = true;
            self.state.last_movement = now;
            self.state.last_pointer_position = position;
        }
    }

    pub fn on_focus_change(&mut self, focused: bool) {
        if self.state.is_focused != focused {
            tracing::debug!(focused, "focus changed");
        }
        self.state.is_focused = focused;
    }

    /// Advances the integrator by one tick.
    pub fn tick(&mut self, now: Instant) {
        let since_movement = now.saturating_duration_since(self.state.last_movement);
        if since_movement > Duration::from_millis(self.config.stillness_window) {
            self.state.is_moving = false;
        }

        if self.state.is_moving || !self.state.is_focused {
            let raised = self.state.distraction_score + self.config.distraction_increment;
            // `clamp` would panic on a negative maximum.
            self.state.distraction_score = raised.min(self.config.distraction_max).max(0.0);
            self.state.last_score_increase = now;
            return;
        }

        // Hysteresis: stay put until the listener has been calm for a while.
        let calm_for = now.saturating_duration_since(self.state.last_score_increase);
        if calm_for > Duration::from_millis(self.config.calm_threshold) {
            let lowered = self.state.distraction_score - self.config.decay_per_tick();
            self.state.distraction_score = lowered.max(0.0);
        }
    }

    /// Re-arms the grace period and makes the listener look calm.
    pub fn reset_grace_period(&mut self, now: Instant) {
        self.state.grace_period_end = now + Duration::from_millis(self.config.grace_period);
        self.state.last_movement = backdate(now, self.config.startup_backdate);
    }

    // NaN or infinite coordinates collapse onto the last qualifying position.
    fn sanitize(&self, position: Position) -> Position {
        let fallback = self.state.last_pointer_position;
        Position {
            x: if position.x.is_finite() { position.x } else { fallback.x },
            y: if position.y.is_finite() { position.y } else { fallback.y },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(millis: u64) -> Duration {
        Duration::from_millis(millis)
    }

    /// Monitor whose grace period has already elapsed at `start + 2000ms`.
    fn monitor_at(start: Instant) -> AttentionMonitor {
        AttentionMonitor::new(AttentionConfig::default(), start)
    }

    #[test]
    fn test_decay_per_tick_matches_recovery_duration() {
        let config = AttentionConfig::default();
        assert!((config.decay_per_tick() - 0.32).abs() < 1e-9);
    }

    #[test]
    fn test_validate_rejects_unusable_values() {
        assert_eq!(AttentionConfig::default().validate(), Ok(()));

        let config = AttentionConfig {
            distraction_max: -1.0,
            ..AttentionConfig::default()
        };
        assert_eq!(config.validate(), Err(AttentionConfigError::DistractionMax(-1.0)));

        let config = AttentionConfig {
            jitter_threshold: -3.0,
            ..AttentionConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(AttentionConfigError::Negative { name: "jitter_threshold", .. })
        ));

        let config = AttentionConfig {
            tick_interval: 0,
            ..AttentionConfig::default()
        };
        assert_eq!(config.validate(), Err(AttentionConfigError::Zero("tick_interval")));
    }

    #[test]
    fn test_negative_maximum_does_not_panic() {
        let start = Instant::now();
        let config = AttentionConfig {
            distraction_max: -1.0,
            ..AttentionConfig::default()
        };
        let mut monitor = AttentionMonitor::new(config, start);
        monitor.on_focus_change(false);
        monitor.tick(start + ms(16));
        assert_eq!(monitor.distraction_score(), 0.0);
        assert_eq!(monitor.normalized_score(), 0.0);
    }

    #[test]
    fn test_initial_state_is_calm() {
        let start = Instant::now();
        let monitor = monitor_at(start);
        let state = monitor.state();
        assert_eq!(state.distraction_score, 0.0);
        assert!(state.is_focused);
        assert!(!state.is_moving);
        assert_eq!(state.grace_period_end, start + ms(2000));
        assert!(state.last_movement <= start);
    }

    #[test]
    fn test_non_finite_position_is_noise() {
        let start = Instant::now();
        let mut monitor = monitor_at(start);
        monitor.on_pointer_move(Position::new(f64::NAN, f64::INFINITY), start + ms(2500));

        let state = monitor.state();
        assert!(!state.is_moving);
        assert_eq!(state.pointer_position, Position::default());
        assert!(state.pointer_position.x.is_finite());
    }

    #[test]
    fn test_focus_loss_raises_score() {
        let start = Instant::now();
        let mut monitor = monitor_at(start);
        monitor.on_focus_change(false);
        monitor.tick(start + ms(16));
        assert!((monitor.distraction_score() - 1.1).abs() < 1e-9);
        assert_eq!(monitor.state().last_score_increase, start + ms(16));
    }

    #[test]
    fn test_normalized_score() {
        let start = Instant::now();
        let mut monitor = monitor_at(start);
        monitor.on_focus_change(false);
        for i in 1..=10 {
            monitor.tick(start + ms(16 * i));
        }
        assert!((monitor.normalized_score() - 0.11).abs() < 1e-9);
    }
}
