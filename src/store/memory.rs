use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{LinkStore, StoreError};
use crate::models::link::LinkRecord;

#[derive(Debug, Clone)]
struct Slot {
    record: LinkRecord,
    // Insertion order, breaks ties between equal timestamps.
    seq: u64,
}

/// In-memory [`LinkStore`] backed by a sharded map.
///
/// Insert and increment happen under the shard lock for the key, so both
/// the uniqueness check and the click counter are race-free.
#[derive(Debug, Default)]
pub struct InMemoryLinkStore {
    links: DashMap<String, Slot>,
    next_seq: AtomicU64,
}

impl InMemoryLinkStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn insert(&self, record: &LinkRecord) -> Result<(), StoreError> {
        match self.links.entry(record.short_code.clone()) {
            Entry::Occupied(_) => Err(StoreError::Duplicate(record.short_code.clone())),
            Entry::Vacant(slot) => {
                let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
                slot.insert(Slot {
                    record: record.clone(),
                    seq,
                });
                Ok(())
            }
        }
    }

    async fn find(&self, short_code: &str) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.links.get(short_code).map(|slot| slot.record.clone()))
    }

    async fn exists(&self, short_code: &str) -> Result<bool, StoreError> {
        Ok(self.links.contains_key(short_code))
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<Option<LinkRecord>, StoreError> {
        Ok(self.links.get_mut(short_code).map(|mut slot| {
            slot.record.clicks += 1;
            slot.record.clone()
        }))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        let mut slots: Vec<Slot> = self.links.iter().map(|e| e.value().clone()).collect();
        slots.sort_by(|a, b| {
            b.record
                .created_at
                .cmp(&a.record.created_at)
                .then(b.seq.cmp(&a.seq))
        });
        Ok(slots.into_iter().take(limit).map(|s| s.record).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}
