//! Test audio player: records the calls the reader makes.

use std::sync::Mutex;

use async_trait::async_trait;
use storyreel_core::audio::AudioPlayer;
use storyreel_core::error::DomainError;

/// An audio player that records calls. Optionally fails every call.
#[derive(Debug, Default)]
pub struct RecordingAudioPlayer {
    calls: Mutex<Vec<String>>,
    fail: bool,
}

impl RecordingAudioPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A player whose every call returns an infrastructure error.
    #[must_use]
    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Returns the recorded calls, e.g. `["play", "set_volume(0.4)"]`.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) -> Result<(), DomainError> {
        self.calls.lock().unwrap().push(call);
        if self.fail {
            Err(DomainError::Infrastructure("audio device unavailable".into()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl AudioPlayer for RecordingAudioPlayer {
    async fn play(&self) -> Result<(), DomainError> {
        self.record("play".to_owned())
    }

    async fn set_volume(&self, volume: f32) -> Result<(), DomainError> {
        self.record(format!("set_volume({volume})"))
    }
}
