use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::utils::short_code::{validate_custom_code, validate_url};

/// A stored short link.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LinkRecord {
    pub original_url: String,
    pub short_code: String,
    pub created_at: DateTime<Utc>,
    pub clicks: i64,
}

impl LinkRecord {
    /// A fresh record with zero clicks, stamped at millisecond precision.
    pub fn new(original_url: String, short_code: String) -> Self {
        let now = Utc::now();
        let created_at = DateTime::from_timestamp_millis(now.timestamp_millis()).unwrap_or(now);

        Self {
            original_url,
            short_code,
            created_at,
            clicks: 0,
        }
    }

    /// Fully-qualified short URL under `base_url`.
    pub fn short_url(&self, base_url: &str) -> String {
        format!("{}/{}", base_url.trim_end_matches('/'), self.short_code)
    }
}

/// Input for creating a link, as posted by clients.
#[derive(Deserialize, Debug, Clone, Default, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NewLink {
    #[serde(default, deserialize_with = "null_as_empty")]
    #[validate(custom(function = "validate_url"))]
    pub original_url: String,
    #[validate(custom(function = "validate_custom_code"))]
    pub custom_code: Option<String>,
}

/// `null` reads like a missing field, so it fails URL validation instead of parsing.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl NewLink {
    pub fn new(original_url: impl Into<String>, custom_code: Option<&str>) -> Self {
        Self {
            original_url: original_url.into(),
            custom_code: custom_code.map(String::from),
        }
    }

    /// An empty custom code means "generate one for me".
    pub fn normalized(mut self) -> Self {
        if self.custom_code.as_deref().is_some_and(str::is_empty) {
            self.custom_code = None;
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_url_joins_base_and_code() {
        let record = LinkRecord::new("https://example.com".into(), "abcd".into());
        assert_eq!(record.short_url("https://sn.ip"), "https://sn.ip/abcd");
        assert_eq!(record.short_url("https://sn.ip/"), "https://sn.ip/abcd");
    }

    #[test]
    fn new_record_starts_without_clicks() {
        let record = LinkRecord::new("https://example.com".into(), "abcd".into());
        assert_eq!(record.clicks, 0);
        assert_eq!(record.created_at.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let record = LinkRecord::new("https://example.com".into(), "abcd".into());
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["originalUrl"], "https://example.com");
        assert_eq!(json["shortCode"], "abcd");
        assert_eq!(json["clicks"], 0);
        assert!(json["createdAt"].is_string());
    }

    #[test]
    fn empty_custom_code_is_dropped() {
        let link = NewLink::new("https://example.com", Some("")).normalized();
        assert!(link.custom_code.is_none());

        let link = NewLink::new("https://example.com", Some("abcd")).normalized();
        assert_eq!(link.custom_code.as_deref(), Some("abcd"));
    }

    #[test]
    fn validation_flags_each_field() {
        let errors = NewLink::new("not-a-url", Some("ab")).validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("original_url"));
        assert!(fields.contains_key("custom_code"));

        assert!(NewLink::new("https://example.com", None).validate().is_ok());
    }

    #[test]
    fn missing_original_url_deserializes_empty() {
        let link: NewLink = serde_json::from_str(r#"{"customCode":"abcd"}"#).unwrap();
        assert!(link.original_url.is_empty());
        assert!(link.validate().is_err());
    }

    #[test]
    fn null_original_url_deserializes_empty() {
        let link: NewLink = serde_json::from_str(r#"{"originalUrl":null}"#).unwrap();
        assert!(link.original_url.is_empty());
        assert!(link.validate().is_err());
    }
}
