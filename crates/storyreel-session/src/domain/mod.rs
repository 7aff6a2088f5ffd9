//! Narrative state domain types.

pub mod keys;
pub mod state;
