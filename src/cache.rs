//! In-memory cache with fixed time-to-live entries.
//!
//! Expiry is measured from insertion (no sliding window) on the tokio clock,
//! so tests can drive it with `tokio::time::pause`/`advance`.

use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now < self.expires_at
    }
}

/// Keyed cache of cheaply clonable values (typically `Arc<_>`).
#[derive(Debug)]
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> TtlCache<V> {
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Live value for `key`, or `None` on miss or expiry.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.is_live(now))
            .map(|entry| entry.value.clone())
    }

    /// Insert or replace `key`, expiring `ttl` from now. Expired entries are
    /// dropped on the way.
    pub async fn set(&self, key: &str, value: V, ttl: Duration) {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.is_live(now));
        entries.insert(
            key.to_string(),
            CacheEntry {
                value,
                expires_at: now + ttl,
            },
        );
    }

    /// Drop every entry regardless of expiry.
    pub async fn invalidate_all(&self) {
        self.entries.write().await.clear();
    }

    /// Number of live entries.
    pub async fn live_entries(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| entry.is_live(now))
            .count()
    }
}

impl<V: Clone> Default for TtlCache<V> {
    fn default() -> Self {
        Self::new()
    }
}
