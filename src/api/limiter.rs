//! Fixed-window request rate limiting.
//!
//! One factory, two instances: a loose global limiter covering every route
//! and a strict limiter stacked on the auth endpoints. State is an in-memory
//! hit table keyed by client address — per process, not shared, so each
//! instance of the service counts independently and horizontal scaling
//! loosens the effective limit. Key growth under address spoofing is bounded
//! only by the lazy full-table eviction sweep.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// One client's current window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowEntry {
    pub count: u32,
    pub resets_at: Instant,
}

/// Storage for the hit table.
///
/// The limiter itself is pure window arithmetic; where the table lives is an
/// injection point so multi-instance deployments can back it with a shared
/// external cache instead of process memory.
pub trait RateStore: Send + Sync {
    fn get(&self, key: &str) -> Option<WindowEntry>;
    fn put(&self, key: &str, entry: WindowEntry);
    /// Drop every entry whose window has passed. Called lazily on each hit.
    fn evict_expired(&self, now: Instant);
}

/// Default in-process backend: a mutex-guarded map.
///
/// The original runtime serialized access incidentally through its
/// single-threaded event loop; under a multi-threaded server the mutex makes
/// that serialization explicit.
#[derive(Debug, Default)]
pub struct MemoryStore {
    hits: Mutex<HashMap<String, WindowEntry>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RateStore for MemoryStore {
    fn get(&self, key: &str) -> Option<WindowEntry> {
        self.table().get(key).copied()
    }

    fn put(&self, key: &str, entry: WindowEntry) {
        self.table().insert(key.to_string(), entry);
    }

    fn evict_expired(&self, now: Instant) {
        // Full-table scan, O(distinct keys seen this window).
        self.table().retain(|_, entry| entry.resets_at > now);
    }
}

impl MemoryStore {
    /// Window counts stay usable after a panic in another hit, so a
    /// poisoned lock is recovered rather than propagated.
    fn table(&self) -> std::sync::MutexGuard<'_, HashMap<String, WindowEntry>> {
        self.hits.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Limiter tuning: window length, request budget, and the message returned
/// with 429 responses.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
    pub message: &'static str,
}

impl RateLimitConfig {
    /// Loose process-wide limit applied to every route.
    pub fn global() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 300,
            message: "Too many requests, please try again later.",
        }
    }

    /// Strict limit stacked on the auth endpoints.
    pub fn auth() -> Self {
        Self {
            window: Duration::from_secs(15 * 60),
            max_requests: 20,
            message: "Too many authentication attempts, please try again later.",
        }
    }
}

/// Verdict for a single hit, with everything the HTTP layer needs for the
/// `RateLimit-*` headers — emitted on allowed and rejected responses alike.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    pub limit: u32,
    pub remaining: u32,
    pub reset_after: Duration,
}

/// Fixed-window counter over an injected [`RateStore`].
pub struct RateLimiter {
    config: RateLimitConfig,
    store: Box<dyn RateStore>,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig, store: impl RateStore + 'static) -> Self {
        Self {
            config,
            store: Box::new(store),
        }
    }

    pub fn in_memory(config: RateLimitConfig) -> Self {
        Self::new(config, MemoryStore::new())
    }

    pub fn message(&self) -> &'static str {
        self.config.message
    }

    /// Record a hit for `key` and decide whether it is within budget.
    ///
    /// Expired entries across the whole table are evicted first; an absent or
    /// expired entry seeds a fresh window at count 1. The count keeps
    /// incrementing past the maximum so repeat offenders stay rejected until
    /// the window rolls over.
    pub fn check(&self, key: &str) -> RateDecision {
        let now = Instant::now();
        self.store.evict_expired(now);

        let entry = match self.store.get(key) {
            Some(entry) if entry.resets_at > now => WindowEntry {
                count: entry.count.saturating_add(1),
                resets_at: entry.resets_at,
            },
            _ => WindowEntry {
                count: 1,
                resets_at: now + self.config.window,
            },
        };
        self.store.put(key, entry);

        RateDecision {
            allowed: entry.count <= self.config.max_requests,
            limit: self.config.max_requests,
            remaining: self.config.max_requests.saturating_sub(entry.count),
            reset_after: entry.resets_at.saturating_duration_since(now),
        }
    }
}
