//! Runtime wiring of the attention monitor and the playback mapper.
//!
//! A [`Session`] is plain synchronous state. [`Session::start`] moves it onto a
//! single tokio task which interleaves queued commands with a fixed-cadence
//! tick, so the monitor never sees concurrent mutation. After every step the
//! new score is pushed into the mapper and published to observers.

use super::attention::{AttentionMonitor, InteractionEvent};
use super::playback::PlaybackMapper;
use thiserror::Error;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SessionCommand {
    Interaction(InteractionEvent),
    ResetGracePeriod,
    SetBaseVolume(f64),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session is not running")]
    Closed,

    #[error("Session task failed: {0}")]
    TaskFailed(String),
}

/// Observable outputs after the most recent step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreReading {
    pub distraction_score: f64,
    pub playback_rate: f64,
    pub volume_multiplier: f64,
    pub effective_volume: f64,
    pub is_moving: bool,
    pub is_focused: bool,
}

#[derive(Debug)]
pub struct Session {
    monitor: AttentionMonitor,
    mapper: PlaybackMapper,
}

impl Session {
    pub fn new(monitor: AttentionMonitor, mapper: PlaybackMapper) -> Self {
        let mut session = Self { monitor, mapper };
        session.sync();
        session
    }

    pub fn monitor(&self) -> &AttentionMonitor {
        &self.monitor
    }

    pub fn mapper(&self) -> &PlaybackMapper {
        &self.mapper
    }

    /// Applies one command and pushes the resulting score downstream.
    pub fn apply(&mut self, command: SessionCommand, now: Instant) {
        match command {
            SessionCommand::Interaction(event) => self.monitor.handle(event, now),
            SessionCommand::ResetGracePeriod => self.monitor.reset_grace_period(now),
            SessionCommand::SetBaseVolume(volume) => self.mapper.set_base_volume(volume),
        }
        self.sync();
    }

    pub fn tick(&mut self, now: Instant) {
        self.monitor.tick(now);
        self.sync();
    }

    pub fn reading(&self) -> ScoreReading {
        let state = self.monitor.state();
        ScoreReading {
            distraction_score: state.distraction_score,
            playback_rate: self.mapper.playback_rate(),
            volume_multiplier: self.mapper.volume_multiplier(),
            effective_volume: self.mapper.effective_volume(),
            is_moving: state.is_moving,
            is_focused: state.is_focused,
        }
    }

    fn sync(&mut self) {
        self.mapper.set_distraction_score(self.monitor.distraction_score());
    }

    /// Starts ticking and accepting commands on the current tokio runtime.
    ///
    /// `initial_focus` should reflect "has focus and is visible" at the moment
    /// monitoring begins.
    pub fn start(mut self, initial_focus: bool) -> SessionHandle {
        self.monitor.on_focus_change(initial_focus);
        self.sync();

        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (readings_tx, readings_rx) = watch::channel(self.reading());
        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tracing::info!(
            tick_interval = self.monitor.config().tick_interval,
            focused = initial_focus,
            "attention session started"
        );
        let task = tokio::spawn(run(self, commands_rx, shutdown_rx, readings_tx));

        SessionHandle {
            commands: commands_tx,
            readings: readings_rx,
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

async fn run(
    mut session: Session,
    mut commands: mpsc::UnboundedReceiver<SessionCommand>,
    mut shutdown: oneshot::Receiver<()>,
    readings: watch::Sender<ScoreReading>,
) -> Session {
    let period = session.monitor.config().tick_period();
    let mut interval = time::interval_at(Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = &mut shutdown => break,
            Some(command) = commands.recv() => session.apply(command, Instant::now()),
            now = interval.tick() => session.tick(now),
        }
        readings.send_replace(session.reading());
    }

    commands.close();
    tracing::info!(score = session.monitor.distraction_score(), "attention session stopped");
    session
}

/// Control surface of a running session.
///
/// Dropping the handle stops the task as well, but only [`SessionHandle::stop`]
/// waits for it to finish.
#[derive(Debug)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<SessionCommand>,
    readings: watch::Receiver<ScoreReading>,
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<Session>,
}

impl SessionHandle {
    pub fn send(&self, command: SessionCommand) -> Result<(), SessionError> {
        self.commands.send(command).map_err(|_| SessionError::Closed)
    }

    /// Sender for event sources running elsewhere (e.g. an input thread).
    pub fn commands(&self) -> mpsc::UnboundedSender<SessionCommand> {
        self.commands.clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<ScoreReading> {
        self.readings.clone()
    }

    pub fn reading(&self) -> ScoreReading {
        *self.readings.borrow()
    }

    /// Stops the session and hands its state back.
    ///
    /// Once this returns, neither ticks nor commands touch the state anymore.
    pub async fn stop(mut self) -> Result<Session, SessionError> {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        self.task.await.map_err(|e| SessionError::TaskFailed(e.to_string()))
    }
}
