use std::env;

use anyhow::{Context, Result};

use crate::services::link_service::DEFAULT_MAX_ATTEMPTS;

const DEFAULT_CLIENT_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Prefix of every short link, without a trailing slash.
    pub base_url: String,
    pub mongodb_uri: String,
    pub mongodb_db: String,
    /// Origins allowed to call the API from a browser.
    pub allowed_origins: Vec<String>,
    /// How many generated codes to try before giving up on a collision streak.
    pub max_generate_attempts: u32,
}

impl AppConfig {
    /// Load configuration from environment variables (populated by dotenv before this is called).
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let port = lookup("PORT")
            .unwrap_or_else(|| "5000".into())
            .parse::<u16>()
            .context("PORT must be a valid port number (1-65535)")?;

        let base_url = lookup("BASE_URL")
            .unwrap_or_else(|| format!("http://localhost:{port}"))
            .trim_end_matches('/')
            .to_owned();

        let mongodb_uri = lookup("MONGODB_URI")
            .filter(|v| !v.trim().is_empty())
            .context("MONGODB_URI must be set in the environment or .env file")?;

        let max_generate_attempts = match lookup("SHORTEN_MAX_ATTEMPTS") {
            Some(v) => v
                .parse::<u32>()
                .context("SHORTEN_MAX_ATTEMPTS must be a positive integer")?
                .max(1),
            None => DEFAULT_MAX_ATTEMPTS,
        };

        let mut allowed_origins = vec![
            lookup("CLIENT_URL")
                .unwrap_or_else(|| DEFAULT_CLIENT_URL.into())
                .trim_end_matches('/')
                .to_owned(),
        ];
        if let Some(extra) = lookup("CORS_ALLOWED_ORIGINS") {
            for origin in extra.split(',').map(str::trim).filter(|o| !o.is_empty()) {
                let origin = origin.trim_end_matches('/').to_owned();
                if !allowed_origins.contains(&origin) {
                    allowed_origins.push(origin);
                }
            }
        }

        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port,
            base_url,
            mongodb_uri,
            mongodb_db: lookup("MONGODB_DB").unwrap_or_else(|| "urlshortener".into()),
            allowed_origins,
            max_generate_attempts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply() {
        let cfg = load(&[("MONGODB_URI", "mongodb://localhost:27017")]).unwrap();
        assert_eq!(cfg.port, 5000);
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.base_url, "http://localhost:5000");
        assert_eq!(cfg.mongodb_db, "urlshortener");
        assert_eq!(cfg.allowed_origins, vec![DEFAULT_CLIENT_URL.to_string()]);
        assert_eq!(cfg.max_generate_attempts, DEFAULT_MAX_ATTEMPTS);
    }

    #[test]
    fn reads_overrides() {
        let cfg = load(&[
            ("MONGODB_URI", "mongodb://db:27017"),
            ("PORT", "8080"),
            ("BASE_URL", "https://sn.ip/"),
            ("CLIENT_URL", "https://app.sn.ip"),
            ("CORS_ALLOWED_ORIGINS", "https://a.example, https://app.sn.ip/ ,,"),
            ("SHORTEN_MAX_ATTEMPTS", "0"),
        ])
        .unwrap();
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.base_url, "https://sn.ip");
        assert_eq!(
            cfg.allowed_origins,
            vec!["https://app.sn.ip".to_string(), "https://a.example".to_string()]
        );
        assert_eq!(cfg.max_generate_attempts, 1);
    }

    #[test]
    fn missing_mongodb_uri_is_an_error() {
        assert!(load(&[]).is_err());
        assert!(load(&[("MONGODB_URI", "  ")]).is_err());
    }

    #[test]
    fn bad_port_is_an_error() {
        let err = load(&[("MONGODB_URI", "mongodb://x"), ("PORT", "99999")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
