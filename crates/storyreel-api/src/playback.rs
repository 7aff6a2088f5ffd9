//! Background driver for branch playback.
//!
//! Sleeps until the reader's next step is due, or until a handler signals a
//! new sequence, then applies whatever has come due.

use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::state::AppState;

/// Spawns the driver on the current Tokio runtime.
#[must_use]
pub fn spawn_playback_driver(state: AppState) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!("playback driver started");
        loop {
            let next_due = state.reader.lock().await.next_due_at();
            match next_due {
                None => state.playback_wake.notified().await,
                Some(due_at) => {
                    let wait = (due_at - state.clock.now())
                        .to_std()
                        .unwrap_or(Duration::ZERO);
                    tokio::select! {
                        () = tokio::time::sleep(wait) => {}
                        () = state.playback_wake.notified() => {}
                    }
                }
            }

            let commands = state.reader.lock().await.tick();
            for command in commands {
                debug!(page = %command.page, x = command.x, y = command.y, "playback scrolled");
            }
        }
    })
}
