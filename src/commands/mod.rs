pub mod channels;
pub mod init;
pub mod tune;
pub mod volume;
pub mod watch;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Configuration initialization")]
    Init(init::InitArgs),
    #[command(about = "List available channels")]
    Channels(channels::ChannelsArgs),
    #[command(about = "Resolve a channel's stream and show what is playing")]
    Tune(tune::TuneArgs),
    #[command(about = "Show or set the base volume")]
    Volume(volume::VolumeArgs),
    #[command(about = "Play with attention-driven speed and volume")]
    Watch(watch::WatchArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub async fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init(args) => init::cmd(args),
            Commands::Channels(args) => channels::cmd(args).await,
            Commands::Tune(args) => tune::cmd(args).await,
            Commands::Volume(args) => volume::cmd(args),
            Commands::Watch(args) => watch::cmd(args).await,
        }
    }
}
