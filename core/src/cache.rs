//! Time-bounded response cache.
//!
//! Entries are keyed by `CacheKey` and expire according to
//! `Cache-Control: max-age=<seconds>`. A response without `Cache-Control`
//! is stored with no expiry at all; any other directive value disables
//! caching for that response. Expired entries are only removed when a lookup
//! finds them: there is no sweep and no capacity bound.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::address::CacheKey;

/// Time source for expiry checks.
pub trait Clock {
    fn now(&self) -> Instant;
}

/// Wall-clock `Instant::now()`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

struct CacheEntry {
    body: String,
    expires_at: Option<Instant>,
}

pub struct ResponseCache<C = SystemClock> {
    entries: HashMap<CacheKey, CacheEntry>,
    clock: C,
}

impl ResponseCache<SystemClock> {
    pub fn new() -> Self {
        ResponseCache::with_clock(SystemClock)
    }
}

impl Default for ResponseCache<SystemClock> {
    fn default() -> Self {
        ResponseCache::new()
    }
}

impl<C: Clock> ResponseCache<C> {
    pub fn with_clock(clock: C) -> Self {
        ResponseCache {
            entries: HashMap::new(),
            clock,
        }
    }

    /// Fresh body for `key`. An expired entry is evicted here.
    pub fn lookup(&mut self, key: &CacheKey) -> Option<String> {
        let now = self.clock.now();
        let expired = self.entries.get(key)?.expires_at.is_some_and(|at| now >= at);
        if expired {
            debug!(origin = %key.origin, path = %key.path, "cache entry expired");
            self.entries.remove(key);
            return None;
        }
        self.entries.get(key).map(|entry| entry.body.clone())
    }

    /// Store `body` under `key` as directed by `cache_control`.
    ///
    /// Returns whether the body was stored.
    pub fn store(&mut self, key: CacheKey, body: &str, cache_control: Option<&str>) -> bool {
        let expires_at = match cache_control {
            None => None,
            Some(directive) => match parse_max_age(directive) {
                // A max-age past what `Instant` can represent never expires.
                Some(max_age) => self.clock.now().checked_add(max_age),
                None => {
                    trace!(directive, "not caching");
                    return false;
                }
            },
        };
        debug!(origin = %key.origin, path = %key.path, ?expires_at, "cached response");
        self.entries.insert(
            key,
            CacheEntry {
                body: body.to_string(),
                expires_at,
            },
        );
        true
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// `max-age=<seconds>` as a duration. Anything else is `None`.
fn parse_max_age(directive: &str) -> Option<Duration> {
    let secs = directive.strip_prefix("max-age=")?;
    secs.trim().parse::<u64>().ok().map(Duration::from_secs)
}
