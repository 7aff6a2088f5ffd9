//! storyreel: durable reader state.
//!
//! A `KeyValueStore` over a single SQLite table. Values are stored as the
//! strings the state store hands over; this crate never interprets them.

pub mod schema;
pub mod sqlite_store;
