//! Write-behind persistence.
//!
//! Setters never wait on storage. Writes go through one channel to one
//! writer task, so they land in the order they were issued and the last
//! write to a key wins. Failures are logged and dropped.

use std::sync::Arc;

use storyreel_core::store::KeyValueStore;
use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

#[derive(Debug)]
enum WriteOp {
    Set { key: &'static str, value: String },
    Remove { key: &'static str },
    Flush(oneshot::Sender<()>),
}

/// Handle to the persistence writer task.
#[derive(Debug, Clone)]
pub struct PersistenceWriter {
    sender: mpsc::UnboundedSender<WriteOp>,
}

impl PersistenceWriter {
    /// Spawns the writer task on the current Tokio runtime.
    ///
    /// The task exits once every handle has been dropped.
    #[must_use]
    pub fn spawn(store: Arc<dyn KeyValueStore>) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(run_writer(store, receiver));
        Self { sender }
    }

    /// Queues `key = value`.
    pub fn set(&self, key: &'static str, value: impl Into<String>) {
        self.enqueue(WriteOp::Set {
            key,
            value: value.into(),
        });
    }

    /// Queues removal of `key`.
    pub fn remove(&self, key: &'static str) {
        self.enqueue(WriteOp::Remove { key });
    }

    /// Waits until every write queued before this call has been attempted.
    pub async fn flush(&self) {
        let (ack, done) = oneshot::channel();
        if self.sender.send(WriteOp::Flush(ack)).is_ok() {
            let _ = done.await;
        }
    }

    fn enqueue(&self, op: WriteOp) {
        if let Err(rejected) = self.sender.send(op) {
            warn!(op = ?rejected.0, "persistence writer has stopped; write dropped");
        }
    }
}

async fn run_writer(store: Arc<dyn KeyValueStore>, mut receiver: mpsc::UnboundedReceiver<WriteOp>) {
    while let Some(op) = receiver.recv().await {
        match op {
            WriteOp::Set { key, value } => match store.set(key, &value).await {
                Ok(()) => debug!(key, value = %value, "persisted"),
                Err(e) => warn!(key, error = %e, "persisting reader state failed"),
            },
            WriteOp::Remove { key } => match store.remove(key).await {
                Ok(()) => debug!(key, "removed"),
                Err(e) => warn!(key, error = %e, "removing reader state failed"),
            },
            WriteOp::Flush(ack) => {
                let _ = ack.send(());
            }
        }
    }
    debug!("persistence writer stopped");
}
