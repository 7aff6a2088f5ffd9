//! storyreel: Page Graph Model.
//!
//! Immutable in-memory representation of every page, choice and branch
//! sequence of a story, plus the catalog loaders that build it.

pub mod application;
pub mod domain;
