//! TTL cache around the loaded dataset.

use crate::snapshot::Snapshot;
use khf_db::DatasetSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

/// Holds at most one [`Snapshot`] of `source`, reloading it once it is older
/// than `ttl`.
///
/// Concurrent callers that find the slot stale wait on the same lock, so a
/// reload happens once. A failed load leaves the slot empty and is retried by
/// the next caller.
pub struct DatasetCache {
    source: DatasetSource,
    ttl: Duration,
    slot: Mutex<Option<Arc<Snapshot>>>,
}

impl DatasetCache {
    pub fn new(source: DatasetSource, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            slot: Mutex::new(None),
        }
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Current snapshot, loading or reloading the dataset when needed.
    pub async fn get(&self) -> anyhow::Result<Arc<Snapshot>> {
        let mut slot = self.slot.lock().await;
        if let Some(snapshot) = slot.as_ref() {
            if !snapshot.is_stale(self.ttl) {
                return Ok(Arc::clone(snapshot));
            }
            log::info!("cache: Snapshot of {} expired, reloading", self.source);
        }
        *slot = None;

        let snapshot = Arc::new(Snapshot::load(&self.source).await?);
        *slot = Some(Arc::clone(&snapshot));
        Ok(snapshot)
    }

    /// Drop the cached snapshot; the next [`DatasetCache::get`] reloads.
    pub async fn invalidate(&self) {
        let mut slot = self.slot.lock().await;
        if slot.take().is_some() {
            log::info!("cache: Invalidated snapshot of {}", self.source);
        }
    }
}
