//! Server-side audio player.
//!
//! The server has no sound device. Playback calls are recorded in the log so
//! a client can mirror them.

use async_trait::async_trait;
use storyreel_core::audio::AudioPlayer;
use storyreel_core::error::DomainError;
use tracing::info;

/// An `AudioPlayer` that logs every call.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingAudioPlayer;

#[async_trait]
impl AudioPlayer for TracingAudioPlayer {
    async fn play(&self) -> Result<(), DomainError> {
        info!(audio = "play", "ambient music started");
        Ok(())
    }

    async fn set_volume(&self, volume: f32) -> Result<(), DomainError> {
        info!(audio = "set_volume", volume, "music volume applied");
        Ok(())
    }
}
