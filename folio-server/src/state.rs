//! Application state shared across handlers

use std::path::PathBuf;
use std::sync::Arc;

use crate::auth::{Claims, HttpTokenVerifier, StaticTokenVerifier, TokenVerifier};
use crate::config::AppConfig;
use crate::db::DocumentStore;
use crate::error::Result;
use crate::mail::{HttpMailer, LogMailer, Mailer};
use crate::maintenance::{MaintenanceGate, DEFAULT_CACHE_TTL};
use crate::media::{CloudMediaHost, MediaHost};
use crate::rate_limit::RateLimiter;

/// Shared application state
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub verifier: Arc<dyn TokenVerifier>,
    pub mailer: Arc<dyn Mailer>,
    /// `None` when media host credentials are not configured
    pub media: Option<Arc<dyn MediaHost>>,
    pub limiter: RateLimiter,
    pub maintenance: MaintenanceGate,
    /// Recipient of contact-form notifications
    pub site_owner_email: Option<String>,
    /// Static site root, also searched for `maintenance.html`
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Minimal state: log-only mail, no media host, default limiter and cache.
    pub fn new(store: Arc<dyn DocumentStore>, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            maintenance: MaintenanceGate::new(store.clone(), DEFAULT_CACHE_TTL),
            store,
            verifier,
            mailer: Arc::new(LogMailer),
            media: None,
            limiter: RateLimiter::default(),
            site_owner_email: None,
            static_dir: None,
        }
    }

    /// Wire every collaborator from configuration.
    pub fn from_config(config: &AppConfig, store: Arc<dyn DocumentStore>) -> Result<Self> {
        let provider = (&config.auth_verify_url, &config.admin_dev_token);
        let verifier: Arc<dyn TokenVerifier> = match provider {
            (Some(url), _) => {
                tracing::info!(verify_url = %url, "Using identity provider for admin tokens");
                Arc::new(HttpTokenVerifier::new(url.clone(), config.auth_api_key.clone())?)
            }
            (None, Some(token)) => {
                tracing::warn!("AUTH_VERIFY_URL not set - accepting ADMIN_DEV_TOKEN for admin routes (development only)");
                Arc::new(
                    StaticTokenVerifier::new()
                        .with_token(token.clone(), Claims::admin("dev-admin")),
                )
            }
            (None, None) => {
                tracing::warn!("No identity provider configured - admin routes will reject every token");
                Arc::new(StaticTokenVerifier::new())
            }
        };

        let mailer: Arc<dyn Mailer> = match &config.mail_relay_url {
            Some(url) => Arc::new(HttpMailer::new(
                url.clone(),
                config.mail_api_key.clone(),
                config.mail_from.clone(),
            )?),
            None => {
                tracing::info!("MAIL_RELAY_URL not set - outgoing mail will only be logged");
                Arc::new(LogMailer)
            }
        };

        let media = match &config.media {
            Some(credentials) => {
                Some(Arc::new(CloudMediaHost::new(credentials.clone())?) as Arc<dyn MediaHost>)
            }
            None => None,
        };

        Ok(Self {
            maintenance: MaintenanceGate::new(store.clone(), config.maintenance_ttl),
            store,
            verifier,
            mailer,
            media,
            limiter: RateLimiter::new(config.rate_limit_max, config.rate_limit_window),
            site_owner_email: config.site_owner_email.clone(),
            static_dir: config.static_dir.clone(),
        })
    }

    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn with_media(mut self, media: Arc<dyn MediaHost>) -> Self {
        self.media = Some(media);
        self
    }

    pub fn with_limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_site_owner(mut self, email: impl Into<String>) -> Self {
        self.site_owner_email = Some(email.into());
        self
    }

    pub fn with_static_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.static_dir = Some(dir.into());
        self
    }
}
