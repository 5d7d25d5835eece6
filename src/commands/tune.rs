//! Tune into a channel: resolve its stream and show what is on air.

use crate::api::somafm::{find_channel, Channel, SomaFm, Song};
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::playlist::IceServer;
use crate::libs::store::{Preferences, CHANNEL_KEY};
use crate::{msg_error_anyhow, msg_info, msg_print};
use anyhow::Result;
use clap::Args;
use std::future::Future;
use tokio::time::{self, Duration, MissedTickBehavior};

pub const DEFAULT_CHANNEL: &str = "groovesalad";

#[derive(Debug, Args)]
pub struct TuneArgs {
    /// Channel ID; defaults to the last tuned channel
    channel: Option<String>,

    /// Relay server to use (ice1..ice6 or original)
    #[arg(long, short)]
    server: Option<IceServer>,

    /// List every mirror of the stream
    #[arg(long, short)]
    mirrors: bool,

    /// Keep refreshing the song on air until interrupted
    #[arg(long, short)]
    follow: bool,
}

/// Looks up `id` in the catalogue.
pub(crate) async fn fetch_channel(client: &SomaFm, id: &str) -> Result<Channel> {
    let channels = client
        .fetch_channels()
        .await
        .map_err(|e| msg_error_anyhow!(Message::ChannelsFetchFailed(e.to_string())))?;
    find_channel(&channels, id)
        .cloned()
        .ok_or_else(|| msg_error_anyhow!(Message::ChannelNotFound(id.to_string())))
}

pub(crate) fn print_song(song: Option<Song>) {
    match song {
        Some(song) => msg_info!(Message::NowPlaying {
            artist: song.artist,
            title: song.title,
            since: song.played_at.map(|at| at.format("%H:%M").to_string()),
        }),
        None => msg_info!(Message::NowPlayingUnknown),
    }
}

pub async fn cmd(args: TuneArgs) -> Result<()> {
    let config = Config::read()?;
    let player = config.player_or_default();
    let mut preferences = Preferences::open()?;

    let channel_id = args
        .channel
        .clone()
        .unwrap_or_else(|| preferences.get_or(CHANNEL_KEY, DEFAULT_CHANNEL.to_string()));

    let client = SomaFm::new(&player).with_server(args.server.unwrap_or(player.preferred_server));
    let channel = fetch_channel(&client, &channel_id).await?;

    let url = client
        .resolve_stream(&channel)
        .await
        .map_err(|e| msg_error_anyhow!(Message::StreamResolveFailed(e.to_string())))?
        .ok_or_else(|| msg_error_anyhow!(Message::NoPlaylistForChannel(channel.id.clone())))?;
    preferences.set(CHANNEL_KEY, &channel.id)?;

    msg_print!(Message::StreamUrl(url));

    if args.mirrors {
        let mirrors = client
            .stream_mirrors(&channel)
            .await
            .map_err(|e| msg_error_anyhow!(Message::StreamResolveFailed(e.to_string())))?;
        msg_print!(Message::StreamMirrors);
        for mirror in mirrors {
            println!("  {}", mirror);
        }
    }

    print_song(client.fetch_now_playing(&channel.id).await);
    if !args.follow {
        return Ok(());
    }

    let period = Duration::from_secs(player.metadata_poll_interval.max(1));
    let shutdown = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    let (client, channel_id) = (&client, channel.id.as_str());
    follow(shutdown, period, move || async move {
        print_song(client.fetch_now_playing(channel_id).await)
    })
    .await;
    Ok(())
}

/// Runs `on_tick` every `period` until `shutdown` resolves; returns the number of ticks.
///
/// `shutdown` is polled across iterations, so a signal that arrives while a
/// tick is still running ends the loop right after it.
pub(crate) async fn follow<S, F, Fut>(shutdown: S, period: Duration, mut on_tick: F) -> usize
where
    S: Future<Output = ()>,
    F: FnMut() -> Fut,
    Fut: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut interval = time::interval_at(time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut ticks = 0;
    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            _ = interval.tick() => {
                on_tick().await;
                ticks += 1;
            }
        }
    }
    ticks
}
