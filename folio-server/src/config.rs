//! Environment configuration
//!
//! Every setting comes from an environment variable. Unset optional
//! services fall back to local stand-ins (log-only mailer, no media host).

use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::db::DEFAULT_MAX_CONNECTIONS;
use crate::maintenance::DEFAULT_CACHE_TTL;
use crate::media::MediaCredentials;
use crate::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

/// Origins allowed by CORS when `CORS_ORIGINS` is unset
pub const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3030",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:3030",
];

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: Option<String>,
    pub database_max_connections: u32,

    /// Identity provider verification endpoint
    pub auth_verify_url: Option<String>,
    pub auth_api_key: Option<String>,
    /// Development-only admin token, used when no verification endpoint is set
    pub admin_dev_token: Option<String>,

    pub mail_relay_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub mail_from: String,
    /// Recipient of contact-form notifications
    pub site_owner_email: Option<String>,

    pub media: Option<MediaCredentials>,

    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub maintenance_ttl: Duration,

    pub static_dir: Option<PathBuf>,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    /// Load from process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_owned())
                .filter(|v| !v.is_empty())
        };

        let media = match (
            get("MEDIA_CLOUD_NAME"),
            get("MEDIA_API_KEY"),
            get("MEDIA_API_SECRET"),
        ) {
            (Some(cloud_name), Some(api_key), Some(api_secret)) => Some(MediaCredentials {
                cloud_name,
                api_key,
                api_secret,
                default_folder: get("MEDIA_FOLDER").unwrap_or_else(|| "portfolio".to_owned()),
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!(
                    "MEDIA_CLOUD_NAME, MEDIA_API_KEY and MEDIA_API_SECRET must all be set; media routes disabled"
                );
                None
            }
        };

        let cors_origins = get("CORS_ORIGINS")
            .map(|v| {
                v.split(',')
                    .map(|o| o.trim().to_owned())
                    .filter(|o| !o.is_empty())
                    .collect()
            })
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.iter().map(|o| o.to_string()).collect());

        Self {
            database_url: get("DATABASE_URL"),
            database_max_connections: parse_or(
                "DATABASE_MAX_CONNECTIONS",
                get("DATABASE_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            ),
            auth_verify_url: get("AUTH_VERIFY_URL"),
            auth_api_key: get("AUTH_API_KEY"),
            admin_dev_token: get("ADMIN_DEV_TOKEN"),
            mail_relay_url: get("MAIL_RELAY_URL"),
            mail_api_key: get("MAIL_API_KEY"),
            mail_from: get("MAIL_FROM").unwrap_or_else(|| "no-reply@localhost".to_owned()),
            site_owner_email: get("SITE_OWNER_EMAIL"),
            media,
            rate_limit_max: parse_or("RATE_LIMIT_MAX", get("RATE_LIMIT_MAX"), DEFAULT_MAX_REQUESTS),
            rate_limit_window: Duration::from_secs(parse_or(
                "RATE_LIMIT_WINDOW_SECS",
                get("RATE_LIMIT_WINDOW_SECS"),
                DEFAULT_WINDOW.as_secs(),
            )),
            maintenance_ttl: Duration::from_secs(parse_or(
                "MAINTENANCE_CACHE_SECS",
                get("MAINTENANCE_CACHE_SECS"),
                DEFAULT_CACHE_TTL.as_secs(),
            )),
            static_dir: get("STATIC_DIR").map(PathBuf::from),
            cors_origins,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

fn parse_or<T>(key: &str, raw: Option<String>, default: T) -> T
where
    T: FromStr + Display,
    T::Err: Display,
{
    match raw {
        None => default,
        Some(v) => v.parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {key} value '{v}': {e}, using default {default}");
            default
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> AppConfig {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults() {
        let c = AppConfig::default();
        assert_eq!(c.database_url, None);
        assert_eq!(c.database_max_connections, 5);
        assert_eq!(c.rate_limit_max, 5);
        assert_eq!(c.rate_limit_window, Duration::from_secs(600));
        assert_eq!(c.maintenance_ttl, Duration::from_secs(60));
        assert_eq!(c.mail_from, "no-reply@localhost");
        assert!(c.media.is_none());
        assert_eq!(c.cors_origins.len(), 4);
    }

    #[test]
    fn invalid_numbers_fall_back() {
        let c = config(&[("RATE_LIMIT_MAX", "lots"), ("MAINTENANCE_CACHE_SECS", "5")]);
        assert_eq!(c.rate_limit_max, 5);
        assert_eq!(c.maintenance_ttl, Duration::from_secs(5));
    }

    #[test]
    fn media_needs_all_credentials() {
        let partial = config(&[("MEDIA_CLOUD_NAME", "demo"), ("MEDIA_API_KEY", "k")]);
        assert!(partial.media.is_none());

        let full = config(&[
            ("MEDIA_CLOUD_NAME", "demo"),
            ("MEDIA_API_KEY", "k"),
            ("MEDIA_API_SECRET", "s"),
        ]);
        let media = full.media.unwrap();
        assert_eq!(media.cloud_name, "demo");
        assert_eq!(media.default_folder, "portfolio");
    }

    #[test]
    fn blank_values_count_as_unset() {
        let c = config(&[
            ("DATABASE_URL", "  "),
            ("CORS_ORIGINS", "https://a.dev, https://b.dev,"),
        ]);
        assert_eq!(c.database_url, None);
        assert_eq!(c.cors_origins, vec!["https://a.dev", "https://b.dev"]);
    }
}
