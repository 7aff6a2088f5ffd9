//! storyreel: Narrative Orchestration.
//!
//! Resolves choices into timed page sequences, plays those sequences with a
//! cancellable scheduler, and drives the state store and navigator from one
//! `Reader` controller.

pub mod application;
pub mod domain;
