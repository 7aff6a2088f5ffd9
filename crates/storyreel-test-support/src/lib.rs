//! Shared test doubles for the storyreel reader.

mod audio;
mod clock;
mod store;

pub use audio::RecordingAudioPlayer;
pub use clock::{FixedClock, ManualClock};
pub use store::{FailingKeyValueStore, InMemoryKeyValueStore};
