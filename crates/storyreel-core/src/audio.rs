//! Audio collaborator.
//!
//! The reader only starts ambient playback once when it is mounted and
//! forwards the volume preference. Playback state is owned by the
//! implementation.

use async_trait::async_trait;

use crate::error::DomainError;

/// Platform audio player for the ambient soundtrack.
#[async_trait]
pub trait AudioPlayer: Send + Sync {
    /// Starts (or resumes) ambient playback.
    async fn play(&self) -> Result<(), DomainError>;

    /// Sets the output volume in `[0.0, 1.0]`.
    async fn set_volume(&self, volume: f32) -> Result<(), DomainError>;
}
