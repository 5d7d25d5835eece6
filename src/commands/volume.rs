use crate::libs::messages::Message;
use crate::libs::playback::DEFAULT_BASE_VOLUME;
use crate::libs::store::{Preferences, VOLUME_KEY};
use crate::{msg_info, msg_success};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct VolumeArgs {
    /// New base volume between 0 and 1; prints the current one when omitted
    level: Option<f64>,
}

pub fn cmd(args: VolumeArgs) -> Result<()> {
    let mut preferences = Preferences::open()?;

    match args.level {
        Some(level) if !level.is_nan() => {
            let level = level.clamp(0.0, 1.0);
            preferences.set(VOLUME_KEY, level)?;
            msg_success!(Message::VolumeSet(level));
        }
        _ => msg_info!(Message::VolumeCurrent(preferences.get_or(VOLUME_KEY, DEFAULT_BASE_VOLUME))),
    }
    Ok(())
}
