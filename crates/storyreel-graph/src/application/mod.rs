//! Catalog providers and graph loading.

pub mod builtin;
pub mod catalog;
