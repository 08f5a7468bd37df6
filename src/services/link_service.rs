use std::sync::Arc;

use thiserror::Error;
use validator::Validate;

use crate::models::link::{LinkRecord, NewLink};
use crate::store::{LinkStore, StoreError};
use crate::utils::short_code::generate_code;

pub const RECENT_LIMIT: usize = 10;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

#[derive(Debug, Error)]
pub enum LinkError {
    #[error("Invalid URL provided")]
    InvalidUrl,

    #[error("Custom code must be between 4 and 10 characters")]
    InvalidLength,

    #[error("This custom code is already in use")]
    CodeTaken,

    #[error("URL not found")]
    NotFound,

    /// Every generated code collided with an existing one.
    #[error("no free short code after {0} attempts")]
    CodeSpaceExhausted(u32),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Create, resolve and list short links on top of a [`LinkStore`].
#[derive(Clone)]
pub struct LinkService {
    store: Arc<dyn LinkStore>,
    base_url: String,
    max_attempts: u32,
}

impl LinkService {
    pub fn new(store: Arc<dyn LinkStore>, base_url: impl Into<String>) -> Self {
        Self {
            store,
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn short_url(&self, record: &LinkRecord) -> String {
        record.short_url(&self.base_url)
    }

    pub fn store(&self) -> &dyn LinkStore {
        self.store.as_ref()
    }

    /// Validate the request and persist a new link.
    ///
    /// A custom code is checked for existence first, but the store's unique
    /// constraint is what decides: a duplicate on insert also yields
    /// [`LinkError::CodeTaken`]. Generated codes are retried on collision.
    pub async fn create(&self, new_link: NewLink) -> Result<LinkRecord, LinkError> {
        let new_link = new_link.normalized();
        if let Err(errors) = new_link.validate() {
            let fields = errors.field_errors();
            return Err(if fields.contains_key("original_url") {
                LinkError::InvalidUrl
            } else {
                LinkError::InvalidLength
            });
        }

        match new_link.custom_code {
            Some(code) => {
                if self.store.exists(&code).await? {
                    return Err(LinkError::CodeTaken);
                }
                let record = LinkRecord::new(new_link.original_url, code);
                match self.store.insert(&record).await {
                    Ok(()) => Ok(record),
                    Err(StoreError::Duplicate(_)) => Err(LinkError::CodeTaken),
                    Err(e) => Err(e.into()),
                }
            }
            None => self.insert_generated(new_link.original_url).await,
        }
    }

    async fn insert_generated(&self, original_url: String) -> Result<LinkRecord, LinkError> {
        for attempt in 1..=self.max_attempts {
            let record = LinkRecord::new(original_url.clone(), generate_code());
            match self.store.insert(&record).await {
                Ok(()) => return Ok(record),
                Err(StoreError::Duplicate(code)) => {
                    log::warn!("Generated code '{}' collided (attempt {})", code, attempt);
                }
                Err(e) => return Err(e.into()),
            }
        }
        Err(LinkError::CodeSpaceExhausted(self.max_attempts))
    }

    /// Count a click and return the record with the new click count.
    pub async fn resolve(&self, short_code: &str) -> Result<LinkRecord, LinkError> {
        self.store
            .increment_clicks(short_code)
            .await?
            .ok_or(LinkError::NotFound)
    }

    /// Read-only lookup, does not count a click.
    pub async fn get_analytics(&self, short_code: &str) -> Result<LinkRecord, LinkError> {
        self.store.find(short_code).await?.ok_or(LinkError::NotFound)
    }

    pub async fn list_recent(&self) -> Result<Vec<LinkRecord>, LinkError> {
        Ok(self.store.recent(RECENT_LIMIT).await?)
    }
}
