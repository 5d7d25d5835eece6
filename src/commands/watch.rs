//! Foreground player loop.
//!
//! Starts the attention session, feeds it global pointer movement and renders
//! the resulting speed and volume until interrupted.

use crate::api::somafm::SomaFm;
use crate::commands::tune::{fetch_channel, print_song, DEFAULT_CHANNEL};
use crate::libs::attention::AttentionMonitor;
use crate::libs::config::Config;
use crate::libs::input::spawn_pointer_listener;
use crate::libs::messages::Message;
use crate::libs::playback::{PlaybackMapper, DEFAULT_BASE_VOLUME};
use crate::libs::session::{ScoreReading, Session, SessionCommand};
use crate::libs::sink::StatusBoard;
use crate::libs::store::{Preferences, CHANNEL_KEY, VOLUME_KEY};
use crate::{msg_error, msg_info, msg_print, msg_success, msg_warning};
use anyhow::Result;
use clap::Args;
use tokio::sync::oneshot;
use tokio::time::{self, Duration, Instant};

const STATUS_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Debug, Args)]
pub struct WatchArgs {
    /// Channel ID; defaults to the last tuned channel
    #[arg(long, short)]
    channel: Option<String>,

    /// Skip the catalogue lookup and only run the attention loop
    #[arg(long)]
    offline: bool,
}

/// Resolves to `()` on SIGINT/SIGTERM (Ctrl+C elsewhere).
fn shutdown_signal() -> oneshot::Receiver<()> {
    let (shutdown_tx, shutdown_rx) = oneshot::channel();

    #[cfg(unix)]
    {
        tokio::spawn(async move {
            use tokio::signal::unix::{signal, SignalKind};

            let (mut sigterm, mut sigint) = match (signal(SignalKind::terminate()), signal(SignalKind::interrupt())) {
                (Ok(sigterm), Ok(sigint)) => (sigterm, sigint),
                _ => {
                    msg_warning!(Message::WatchSignalHandlingNotSupported);
                    let _ = tokio::signal::ctrl_c().await;
                    let _ = shutdown_tx.send(());
                    return;
                }
            };

            tokio::select! {
                _ = sigterm.recv() => msg_info!(Message::WatchReceivedSigterm),
                _ = sigint.recv() => msg_info!(Message::WatchReceivedSigint),
            }

            let _ = shutdown_tx.send(());
        });
    }

    #[cfg(not(unix))]
    {
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                msg_info!(Message::WatchReceivedSigint);
            }
            let _ = shutdown_tx.send(());
        });
    }

    shutdown_rx
}

// Speed and volume come from the sinks, which may have refused a change.
fn render(reading: &ScoreReading, board: &StatusBoard) {
    let applied = board.snapshot();
    msg_print!(Message::WatchStatus {
        score: reading.distraction_score,
        rate: applied.playback_rate,
        volume: applied.volume,
        moving: reading.is_moving,
        focused: reading.is_focused,
        refused_rates: applied.rejected_rates,
    });
}

pub async fn cmd(args: WatchArgs) -> Result<()> {
    let config = Config::read()?;
    let player = config.player_or_default();
    let attention = config.attention_or_default();
    let preferences = Preferences::open()?;

    let channel_id = args
        .channel
        .clone()
        .unwrap_or_else(|| preferences.get_or(CHANNEL_KEY, DEFAULT_CHANNEL.to_string()));
    let base_volume = preferences.get_or(VOLUME_KEY, DEFAULT_BASE_VOLUME);

    if !args.offline {
        let client = SomaFm::new(&player);
        match fetch_channel(&client, &channel_id).await {
            Ok(channel) => {
                match client.resolve_stream(&channel).await {
                    Ok(Some(url)) => msg_print!(Message::StreamUrl(url)),
                    Ok(None) => msg_warning!(Message::NoPlaylistForChannel(channel.id.clone())),
                    Err(e) => msg_warning!(Message::StreamResolveFailed(e.to_string())),
                }
                print_song(client.fetch_now_playing(&channel.id).await);
            }
            Err(e) => msg_warning!(e),
        }
    }

    let board = StatusBoard::new();
    let mut mapper = PlaybackMapper::new(attention.distraction_max);
    mapper.set_base_volume(base_volume);
    mapper.bind_rate_sink(Box::new(board.rate_sink(player.min_rate)));
    mapper.bind_volume_sink(Box::new(board.volume_sink()));

    let monitor = AttentionMonitor::new(attention, Instant::now());
    // A terminal reports no window focus; only pointer movement drives the score here.
    let handle = Session::new(monitor, mapper).start(true);
    handle.send(SessionCommand::ResetGracePeriod)?;
    spawn_pointer_listener(handle.commands());

    msg_success!(Message::WatchStarted {
        channel: channel_id,
        volume: base_volume,
    });

    let mut shutdown = shutdown_signal();
    let mut status = time::interval(STATUS_INTERVAL);
    let mut last_shown: Option<ScoreReading> = None;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = status.tick() => {
                let reading = handle.reading();
                if last_shown != Some(reading) {
                    render(&reading, &board);
                    last_shown = Some(reading);
                }
            }
        }
    }

    msg_info!(Message::WatchShuttingDown);
    match handle.stop().await {
        Ok(session) => msg_info!(Message::WatchStopped(session.monitor().distraction_score())),
        Err(e) => msg_error!(Message::SessionError(e.to_string())),
    }
    Ok(())
}
