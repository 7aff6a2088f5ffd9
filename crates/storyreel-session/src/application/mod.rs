//! State store and its persistence writer.

pub mod store;
pub mod writer;
