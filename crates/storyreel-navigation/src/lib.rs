//! storyreel: Navigation Synchronizer.
//!
//! Keeps the physical scroll offset and the logical current page in step,
//! and holds forward scrolling on choice pages until a choice is made.

pub mod domain;
