//! storyreel core: shared reader abstractions.
//!
//! This crate defines the identifiers, error type and collaborator traits
//! that every other storyreel crate depends on. It contains no
//! infrastructure code.

pub mod audio;
pub mod clock;
pub mod command;
pub mod error;
pub mod ids;
pub mod store;
