use crate::api::somafm::SomaFm;
use crate::libs::{config::Config, messages::Message, view::View};
use crate::{msg_error_anyhow, msg_print, msg_warning};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct ChannelsArgs {
    /// Only list channels whose genre contains this text
    #[arg(long, short)]
    genre: Option<String>,
}

pub async fn cmd(args: ChannelsArgs) -> Result<()> {
    let player = Config::read()?.player_or_default();
    let mut channels = SomaFm::new(&player)
        .fetch_channels()
        .await
        .map_err(|e| msg_error_anyhow!(Message::ChannelsFetchFailed(e.to_string())))?;

    if let Some(genre) = &args.genre {
        let genre = genre.to_lowercase();
        channels.retain(|channel| channel.genre.to_lowercase().contains(&genre));
    }

    if channels.is_empty() {
        msg_warning!(Message::ChannelsNotFound);
        return Ok(());
    }

    msg_print!(Message::ChannelsHeader(channels.len()), true);
    View::channels(&channels);
    Ok(())
}
