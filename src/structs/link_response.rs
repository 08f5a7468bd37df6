use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::link::LinkRecord;

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub original_url: String,
    pub short_code: String,
    pub short_url: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct RecentUrlResponse {
    pub short_url: String,
    pub short_code: String,
    pub original_url: String,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

impl ShortenResponse {
    pub fn new(record: LinkRecord, short_url: String) -> Self {
        Self {
            short_url,
            short_code: record.short_code,
            original_url: record.original_url,
        }
    }
}

impl AnalyticsResponse {
    pub fn new(record: LinkRecord, short_url: String) -> Self {
        Self {
            original_url: record.original_url,
            short_code: record.short_code,
            short_url,
            created_at: record.created_at,
            clicks: record.clicks,
        }
    }
}

impl RecentUrlResponse {
    pub fn new(record: LinkRecord, short_url: String) -> Self {
        Self {
            short_url,
            short_code: record.short_code,
            original_url: record.original_url,
            clicks: record.clicks,
            created_at: record.created_at,
        }
    }
}
