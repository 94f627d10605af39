//! Maintenance-mode flag with a short-lived local cache
//!
//! The flag lives in the settings document. Reads go through a TTL cache so
//! the request middleware does not hit the database on every page view.
//! Other instances pick up a change once their cache expires.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::db::{ContentRepo, DbError, DocumentStore};
use crate::models::SiteSettings;

/// Default cache lifetime
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy)]
struct Cached {
    enabled: bool,
    fetched_at: Instant,
}

/// Cached view of the maintenance flag
pub struct MaintenanceGate {
    store: Arc<dyn DocumentStore>,
    ttl: Duration,
    cache: Mutex<Option<Cached>>,
}

impl MaintenanceGate {
    pub fn new(store: Arc<dyn DocumentStore>, ttl: Duration) -> Self {
        Self {
            store,
            ttl,
            cache: Mutex::new(None),
        }
    }

    /// Current flag, served from cache while fresh.
    ///
    /// A failed read keeps the last known value (or `false`) until the next
    /// refresh is due.
    pub async fn is_enabled(&self) -> bool {
        self.is_enabled_at(Instant::now()).await
    }

    async fn is_enabled_at(&self, now: Instant) -> bool {
        let previous = *self.lock();
        if let Some(cached) = previous {
            if now.saturating_duration_since(cached.fetched_at) < self.ttl {
                return cached.enabled;
            }
        }

        let enabled = match ContentRepo::<SiteSettings>::new(self.store.as_ref())
            .get_singleton()
            .await
        {
            Ok(settings) => settings.is_some_and(|r| r.content.maintenance_mode),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read maintenance flag, keeping last value");
                previous.is_some_and(|c| c.enabled)
            }
        };

        *self.lock() = Some(Cached {
            enabled,
            fetched_at: now,
        });
        enabled
    }

    /// Persist the flag and refresh this instance's cache.
    #[tracing::instrument(skip(self))]
    pub async fn set(&self, enabled: bool) -> Result<SiteSettings, DbError> {
        let repo = ContentRepo::<SiteSettings>::new(self.store.as_ref());
        let mut settings = repo
            .get_singleton()
            .await?
            .map(|r| r.content)
            .unwrap_or_default();
        settings.maintenance_mode = enabled;

        let record = repo.put_singleton(settings).await?;
        *self.lock() = Some(Cached {
            enabled,
            fetched_at: Instant::now(),
        });

        tracing::info!(enabled, "maintenance mode updated");
        Ok(record.content)
    }

    fn lock(&self) -> MutexGuard<'_, Option<Cached>> {
        self.cache.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
