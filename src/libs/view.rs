use crate::api::somafm::{select_playlist, Channel};
use prettytable::{row, Table};

pub struct View {}

impl View {
    pub fn channels(channels: &[Channel]) {
        let mut table = Table::new();

        table.add_row(row!["ID", "TITLE", "GENRE", "LISTENERS", "STREAM"]);
        for channel in channels {
            let stream = select_playlist(channel)
                .map(|p| format!("{} {}", p.format, p.quality))
                .unwrap_or_else(|| "-".to_string());
            table.add_row(row![channel.id, channel.title, channel.genre.replace('|', ", "), channel.listeners, stream]);
        }
        table.printstd();
    }
}
