//! Route modules.

pub mod health;
pub mod pages;
pub mod reader;
