//! Persistent key-value store abstraction.
//!
//! Values are opaque strings. Each key is an independent entry; nothing
//! spans more than one key atomically.

use async_trait::async_trait;

use crate::error::DomainError;

/// String-keyed persistent store used to save and restore reader progress.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>, DomainError>;

    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, key: &str, value: &str) -> Result<(), DomainError>;

    /// Deletes `key`. Removing an absent key is not an error.
    async fn remove(&self, key: &str) -> Result<(), DomainError>;
}
