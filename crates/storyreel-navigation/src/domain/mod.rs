//! Navigation domain types.

pub mod navigator;
pub mod viewport;
