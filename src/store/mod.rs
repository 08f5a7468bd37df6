pub mod memory;
pub mod mongo;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::link::LinkRecord;

pub use memory::InMemoryLinkStore;
pub use mongo::MongoLinkStore;

#[derive(Debug, Error)]
pub enum StoreError {
    /// The short code is already taken by another record.
    #[error("short code already exists: {0}")]
    Duplicate(String),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Persistent mapping from short code to [`LinkRecord`].
///
/// The short code is unique at the storage layer: `insert` must fail with
/// [`StoreError::Duplicate`] instead of overwriting.
#[async_trait]
pub trait LinkStore: Send + Sync + 'static {
    async fn insert(&self, record: &LinkRecord) -> Result<(), StoreError>;

    async fn find(&self, short_code: &str) -> Result<Option<LinkRecord>, StoreError>;

    async fn exists(&self, short_code: &str) -> Result<bool, StoreError>;

    /// Atomically add one click and return the updated record.
    async fn increment_clicks(&self, short_code: &str) -> Result<Option<LinkRecord>, StoreError>;

    /// Up to `limit` records, newest first.
    async fn recent(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;
}
