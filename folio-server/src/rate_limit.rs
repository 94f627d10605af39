//! Fixed-window request limiter keyed by action and client IP
//!
//! State is process-local: with several server instances each one counts
//! separately.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

/// Default requests allowed per key per window
pub const DEFAULT_MAX_REQUESTS: u32 = 5;

/// Default window length (10 minutes)
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(600);

/// Outcome of a limiter check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateDecision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

#[derive(Debug)]
struct LimiterInner {
    windows: HashMap<String, Window>,
    last_prune: Instant,
}

/// Per-key fixed-window counter
#[derive(Debug)]
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    inner: Mutex<LimiterInner>,
}

impl RateLimiter {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
            inner: Mutex::new(LimiterInner {
                windows: HashMap::new(),
                last_prune: Instant::now(),
            }),
        }
    }

    /// Count one request for `action` from `ip`.
    pub fn check(&self, action: &str, ip: &str) -> RateDecision {
        self.check_at(&format!("{}:{}", action, ip), Instant::now())
    }

    /// Count one request for `key` as of `now`.
    pub fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let mut inner = self.lock();
        self.prune(&mut inner, now);

        let window = inner
            .windows
            .entry(key.to_owned())
            .or_insert(Window { started: now, count: 0 });

        if now.saturating_duration_since(window.started) >= self.window {
            *window = Window { started: now, count: 0 };
        }

        window.count = window.count.saturating_add(1);
        if window.count > self.max_requests {
            let elapsed = now.saturating_duration_since(window.started);
            let retry_after = self.window.saturating_sub(elapsed);
            tracing::debug!(key, count = window.count, ?retry_after, "rate limit exceeded");
            return RateDecision::Limited { retry_after };
        }

        RateDecision::Allowed {
            remaining: self.max_requests - window.count,
        }
    }

    /// Number of keys currently tracked.
    pub fn tracked_keys(&self) -> usize {
        self.lock().windows.len()
    }

    /// Drop expired windows, at most once per window length.
    fn prune(&self, inner: &mut LimiterInner, now: Instant) {
        if now.saturating_duration_since(inner.last_prune) < self.window {
            return;
        }
        let window = self.window;
        inner
            .windows
            .retain(|_, w| now.saturating_duration_since(w.started) < window);
        inner.last_prune = now;
    }

    fn lock(&self) -> MutexGuard<'_, LimiterInner> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW)
    }
}
