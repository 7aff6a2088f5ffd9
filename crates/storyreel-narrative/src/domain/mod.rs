//! Narrative domain logic.

pub mod commands;
pub mod playback;
pub mod resolver;
