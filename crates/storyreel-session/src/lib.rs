//! storyreel: Narrative State Store.
//!
//! Owns the reader's position, orientation and narrative counters, and
//! writes every change through to the persistent key-value store.

pub mod application;
pub mod domain;
