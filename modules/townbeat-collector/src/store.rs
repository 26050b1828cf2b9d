//! Storage seam for collected events. The collector only knows the trait;
//! production wires a real backend, tests and the CLI default use the
//! in-memory store.

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{info, warn};

use townbeat_common::EventRecord;

#[async_trait]
pub trait EventStore: Send + Sync {
    async fn create_event(&self, event: &EventRecord) -> Result<()>;
}

/// Trait-backed buffer for tests and local runs.
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<EventRecord>>,
}

impl MemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn events(&self) -> Vec<EventRecord> {
        self.events.lock().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.events.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.lock().await.is_empty()
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn create_event(&self, event: &EventRecord) -> Result<()> {
        self.events.lock().await.push(event.clone());
        Ok(())
    }
}

/// Write a batch of events to the store, one at a time. A failed write is
/// logged and skipped; the rest of the batch still goes through. Returns
/// the number of events actually stored.
pub async fn sync_to_storage(store: &dyn EventStore, events: &[EventRecord]) -> usize {
    let mut stored = 0;
    for event in events {
        match store.create_event(event).await {
            Ok(()) => stored += 1,
            Err(e) => {
                warn!(
                    title = event.title.as_str(),
                    source_id = event.source_id.as_str(),
                    error = %e,
                    "Failed to store event, skipping"
                );
            }
        }
    }
    info!(stored, total = events.len(), "Synced events to storage");
    stored
}
