//! Page graph domain types.

pub mod graph;
pub mod integrity;
pub mod page;
