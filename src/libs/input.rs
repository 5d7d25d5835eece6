use super::attention::InteractionEvent;
use super::session::SessionCommand;
use rdev::{listen, Event, EventType};
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;

// Maps a raw device event onto a monitor event; only pointer movement matters.
pub fn interaction_from(event: &Event) -> Option<InteractionEvent> {
    match event.event_type {
        EventType::MouseMove { x, y } => Some(InteractionEvent::PointerMove { x, y }),
        _ => None,
    }
}

// Forwards global pointer movement into a session.
//
// rdev::listen blocks its thread for good, so the listener lives on a
// dedicated OS thread. Once the session queue is closed, events are dropped
// and no restart is attempted.
pub fn spawn_pointer_listener(commands: UnboundedSender<SessionCommand>) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || loop {
        if commands.is_closed() {
            break;
        }

        let sender = commands.clone();
        let result = listen(move |event: Event| {
            if let Some(interaction) = interaction_from(&event) {
                let _ = sender.send(SessionCommand::Interaction(interaction));
            }
        });

        match result {
            Err(e) => {
                tracing::warn!(error = ?e, "failed to listen for pointer events, retrying in 1 second");
                std::thread::sleep(Duration::from_secs(1));
            }
            Ok(()) => break,
        }
    })
}
