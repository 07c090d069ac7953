//! Fixed-window admission control keyed by identity.
//!
//! Each identity gets a counter that resets when its window expires. Because
//! windows are fixed rather than sliding, a caller can land up to twice the
//! limit in a short span straddling a window boundary.
//!
//! State is an LRU map bounded by `max_identities`. An identity evicted from
//! the map starts a fresh window the next time it is seen.

use std::num::NonZeroUsize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use lru::LruCache;

use crate::types::settings::RateLimitSettings;

/// Trait defining admission control operations.
pub trait RateLimiterTrait {
    /// Admits or rejects one operation for `identity` at the current instant.
    fn admit(&self, identity: &str) -> bool;
    /// Admits or rejects one operation for `identity` at `now`.
    fn admit_at(&self, identity: &str, now: Instant) -> bool;
}

#[derive(Debug, Clone, Copy)]
struct Window {
    count: u32,
    reset_at: Instant,
}

/// In-process fixed-window rate limiter.
pub struct RateLimiter {
    max_requests: u32,
    window: Duration,
    windows: Mutex<LruCache<String, Window>>,
}

impl RateLimiter {
    /// Creates a limiter from configuration.
    ///
    /// A zero `max_identities` is treated as one.
    pub fn new(settings: &RateLimitSettings) -> Self {
        let capacity = NonZeroUsize::new(settings.max_identities).unwrap_or(NonZeroUsize::MIN);
        Self {
            max_requests: settings.max_requests,
            window: Duration::from_millis(settings.window_ms),
            windows: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Number of identities currently holding a window.
    pub fn tracked_identities(&self) -> usize {
        self.windows.lock().map(|w| w.len()).unwrap_or(0)
    }
}

impl RateLimiterTrait for RateLimiter {
    fn admit(&self, identity: &str) -> bool {
        self.admit_at(identity, Instant::now())
    }

    fn admit_at(&self, identity: &str, now: Instant) -> bool {
        // Read, check and increment happen under one lock.
        let mut windows = match self.windows.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };

        if let Some(window) = windows.get_mut(identity) {
            if now <= window.reset_at {
                if window.count >= self.max_requests {
                    tracing::debug!(identity, count = window.count, "rate limit exceeded");
                    return false;
                }
                window.count += 1;
                return true;
            }
        }

        windows.put(
            identity.to_string(),
            Window {
                count: 1,
                reset_at: now + self.window,
            },
        );
        true
    }
}
