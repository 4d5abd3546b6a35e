use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use tokio::time::timeout;
use tracing::warn;

use crate::errors::AuditStoreError;
use crate::model::AuditEntry;

/// Best-effort, non-blocking audit writer. `append` never errors and
/// never blocks beyond submitting the entry; a failed or timed-out write
/// is logged and dropped (at-most-once).
pub trait AuditSink: Send + Sync {
    fn append(&self, entry: AuditEntry);
}

/// Persistence seam for the audit trail. Insert-only: this subsystem never
/// invokes update or delete. Kept separate from the billing backend so a
/// slow audit store cannot degrade billing reads.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn insert(&self, entry: AuditEntry) -> Result<(), AuditStoreError>;
}

/// In-memory insert-only store, mostly useful in tests and wiring demos.
#[derive(Debug, Default)]
pub struct MemoryAuditStore {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, entry: AuditEntry) -> Result<(), AuditStoreError> {
        self.entries.lock().push(entry);
        Ok(())
    }
}

#[derive(Clone, Debug)]
pub struct AuditSinkConfig {
    pub queue_capacity: usize,
    pub write_timeout: Duration,
}

impl Default for AuditSinkConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1_024,
            write_timeout: Duration::from_secs(2),
        }
    }
}

/// Channel-backed sink: producers submit through a bounded queue and a
/// spawned worker performs the writes with a bounded timeout each.
#[derive(Clone)]
pub struct ChannelAuditSink {
    tx: mpsc::Sender<AuditEntry>,
}

impl ChannelAuditSink {
    /// Spawns the writer task on the current tokio runtime.
    pub fn spawn(store: Arc<dyn AuditStore>, config: AuditSinkConfig) -> Self {
        let (tx, mut rx) = mpsc::channel::<AuditEntry>(config.queue_capacity);
        let write_timeout = config.write_timeout;
        tokio::spawn(async move {
            while let Some(entry) = rx.recv().await {
                let entry_id = entry.id.clone();
                match timeout(write_timeout, store.insert(entry)).await {
                    Ok(Ok(())) => {}
                    Ok(Err(err)) => {
                        warn!(entry = %entry_id, error = %err, "audit write failed; entry dropped");
                    }
                    Err(_) => {
                        warn!(
                            entry = %entry_id,
                            timeout_ms = write_timeout.as_millis() as u64,
                            "audit write timed out; entry dropped"
                        );
                    }
                }
            }
        });
        Self { tx }
    }
}

impl AuditSink for ChannelAuditSink {
    fn append(&self, entry: AuditEntry) {
        if let Err(err) = self.tx.try_send(entry) {
            warn!(error = %err, "audit queue rejected entry; dropped");
        }
    }
}

/// Sink that discards everything; for wiring contexts audited elsewhere.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn append(&self, _entry: AuditEntry) {}
}
