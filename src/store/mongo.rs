use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::TryStreamExt;
use mongodb::bson::{self, doc, oid::ObjectId};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};

use super::{LinkStore, StoreError};
use crate::db::mongodb::get_database;
use crate::models::link::LinkRecord;

const COLLECTION: &str = "urls";
const DUPLICATE_KEY: i32 = 11000;

/// On-disk shape of a link. Field names are camelCase so documents written by
/// earlier deployments of the service remain readable.
#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
struct LinkDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    original_url: String,
    short_code: String,
    created_at: bson::DateTime,
    #[serde(default)]
    clicks: i64,
}

impl From<&LinkRecord> for LinkDocument {
    fn from(record: &LinkRecord) -> Self {
        Self {
            id: None,
            original_url: record.original_url.clone(),
            short_code: record.short_code.clone(),
            created_at: bson::DateTime::from_millis(record.created_at.timestamp_millis()),
            clicks: record.clicks,
        }
    }
}

impl From<LinkDocument> for LinkRecord {
    fn from(doc: LinkDocument) -> Self {
        let created_at = DateTime::<Utc>::from_timestamp_millis(doc.created_at.timestamp_millis())
            .unwrap_or_default();
        Self {
            original_url: doc.original_url,
            short_code: doc.short_code,
            created_at,
            clicks: doc.clicks,
        }
    }
}

impl From<MongoError> for StoreError {
    fn from(err: MongoError) -> Self {
        StoreError::Unavailable(err.to_string())
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

/// [`LinkStore`] over a MongoDB collection with a unique index on `shortCode`.
#[derive(Clone, Debug)]
pub struct MongoLinkStore {
    client: Client,
    db: Database,
    links: Collection<LinkDocument>,
}

impl MongoLinkStore {
    /// Connect, verify the server is reachable and ensure the unique index exists.
    pub async fn connect(uri: &str, db_name: &str) -> Result<Self, StoreError> {
        let (client, db) = get_database(uri, db_name).await?;
        let store = Self {
            client,
            links: db.collection::<LinkDocument>(COLLECTION),
            db,
        };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        let unique_code = IndexModel::builder()
            .keys(doc! { "shortCode": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();
        let by_age = IndexModel::builder()
            .keys(doc! { "createdAt": -1 })
            .build();

        self.links.create_index(unique_code).await?;
        self.links.create_index(by_age).await?;
        Ok(())
    }

    /// Close pooled connections. Call once the HTTP server has stopped.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
        log::info!("MongoDB connection closed");
    }
}

#[async_trait]
impl LinkStore for MongoLinkStore {
    async fn insert(&self, record: &LinkRecord) -> Result<(), StoreError> {
        match self.links.insert_one(LinkDocument::from(record)).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::Duplicate(record.short_code.clone())),
            Err(e) => Err(e.into()),
        }
    }

    async fn find(&self, short_code: &str) -> Result<Option<LinkRecord>, StoreError> {
        let found = self
            .links
            .find_one(doc! { "shortCode": short_code })
            .await?;
        Ok(found.map(LinkRecord::from))
    }

    async fn exists(&self, short_code: &str) -> Result<bool, StoreError> {
        let count = self
            .links
            .count_documents(doc! { "shortCode": short_code })
            .limit(1)
            .await?;
        Ok(count > 0)
    }

    async fn increment_clicks(&self, short_code: &str) -> Result<Option<LinkRecord>, StoreError> {
        let updated = self
            .links
            .find_one_and_update(
                doc! { "shortCode": short_code },
                doc! { "$inc": { "clicks": 1 } },
            )
            .return_document(ReturnDocument::After)
            .await?;
        Ok(updated.map(LinkRecord::from))
    }

    async fn recent(&self, limit: usize) -> Result<Vec<LinkRecord>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let docs: Vec<LinkDocument> = self
            .links
            .find(doc! {})
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .limit(limit)
            .await?
            .try_collect()
            .await?;
        Ok(docs.into_iter().map(LinkRecord::from).collect())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_round_trips_record_fields() {
        let record = LinkRecord::new("https://example.com".into(), "abcd".into());
        let back = LinkRecord::from(LinkDocument::from(&record));
        assert_eq!(back, record);
    }

    #[test]
    fn document_uses_camel_case_keys() {
        let record = LinkRecord::new("https://example.com".into(), "abcd".into());
        let doc = bson::to_document(&LinkDocument::from(&record)).unwrap();
        assert!(doc.contains_key("originalUrl"));
        assert!(doc.contains_key("shortCode"));
        assert!(doc.get_datetime("createdAt").is_ok());
        assert_eq!(doc.get_i64("clicks").unwrap(), 0);
        assert!(!doc.contains_key("_id"));
    }

    #[test]
    fn reads_documents_without_clicks() {
        let raw = doc! {
            "_id": ObjectId::new(),
            "originalUrl": "https://example.com",
            "shortCode": "abcd",
            "createdAt": bson::DateTime::now(),
            "__v": 0,
        };
        let parsed: LinkDocument = bson::from_document(raw).unwrap();
        assert_eq!(parsed.clicks, 0);
        assert_eq!(parsed.short_code, "abcd");
    }
}
