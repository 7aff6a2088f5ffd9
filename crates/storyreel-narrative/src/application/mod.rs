//! The reader controller and its read-only view.

pub mod reader;
pub mod view;
