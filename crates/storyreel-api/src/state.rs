//! Shared application state.

use std::sync::Arc;

use storyreel_core::audio::AudioPlayer;
use storyreel_core::clock::Clock;
use storyreel_graph::domain::graph::PageGraph;
use storyreel_narrative::application::reader::Reader;
use tokio::sync::{Mutex, Notify};

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// The single reader this server drives.
    pub reader: Arc<Mutex<Reader>>,
    pub graph: Arc<PageGraph>,
    pub audio: Arc<dyn AudioPlayer>,
    pub clock: Arc<dyn Clock>,
    /// Wakes the playback driver when a new sequence is scheduled.
    pub playback_wake: Arc<Notify>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("pages", &self.graph.len())
            .finish_non_exhaustive()
    }
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(reader: Reader, audio: Arc<dyn AudioPlayer>, clock: Arc<dyn Clock>) -> Self {
        let graph = Arc::clone(reader.graph());
        Self {
            reader: Arc::new(Mutex::new(reader)),
            graph,
            audio,
            clock,
            playback_wake: Arc::new(Notify::new()),
        }
    }

    /// Tells the playback driver to re-read the schedule.
    pub fn wake_playback(&self) {
        self.playback_wake.notify_one();
    }
}
