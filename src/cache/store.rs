use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::trace;

use crate::config::{ConfigError, ResultCacheConfig};
use crate::types::identifiers::CacheKey;
use crate::types::ladder::LadderResult;

/// Memo store for assembled ladders.
///
/// Implementations synchronize internally; the engine issues at most one
/// `get` and one `set` per request and never read-modify-writes.
pub trait ResultCache: Send + Sync {
    fn get(&self, key: &CacheKey) -> Option<LadderResult>;
    fn set(&self, key: CacheKey, value: LadderResult);
}

impl<C: ResultCache + ?Sized> ResultCache for &C {
    fn get(&self, key: &CacheKey) -> Option<LadderResult> {
        (**self).get(key)
    }

    fn set(&self, key: CacheKey, value: LadderResult) {
        (**self).set(key, value)
    }
}

impl<C: ResultCache + ?Sized> ResultCache for Arc<C> {
    fn get(&self, key: &CacheKey) -> Option<LadderResult> {
        (**self).get(key)
    }

    fn set(&self, key: CacheKey, value: LadderResult) {
        (**self).set(key, value)
    }
}

/// A stored ladder and when it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct StoredLadder {
    pub ladder: LadderResult,
    pub stored_at: DateTime<Utc>,
}

/// Process-local result cache with optional TTL and a capacity bound.
/// At capacity the oldest entry is evicted.
#[derive(Debug)]
pub struct InMemoryResultCache {
    entries: RwLock<HashMap<CacheKey, StoredLadder>>,
    ttl_seconds: Option<u64>,
    max_entries: usize,
}

impl InMemoryResultCache {
    pub fn new() -> Self {
        Self::from_valid(&ResultCacheConfig::default())
    }

    pub fn with_config(config: &ResultCacheConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self::from_valid(config))
    }

    fn from_valid(config: &ResultCacheConfig) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl_seconds: config.ttl_seconds,
            max_entries: config.max_entries,
        }
    }

    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    pub fn clear(&self) {
        self.entries.write().clear();
    }

    /// Drop expired entries.
    pub fn purge_expired(&self) {
        let now = Utc::now();
        self.entries.write().retain(|_, stored| !self.is_expired(stored, now));
    }

    /// Live entries sorted by key.
    pub fn entries(&self) -> Vec<(CacheKey, StoredLadder)> {
        let now = Utc::now();
        let mut live: Vec<(CacheKey, StoredLadder)> = self
            .entries
            .read()
            .iter()
            .filter(|(_, stored)| !self.is_expired(stored, now))
            .map(|(key, stored)| (key.clone(), stored.clone()))
            .collect();
        live.sort_by(|a, b| a.0.cmp(&b.0));
        live
    }

    /// Re-insert previously exported entries, keeping their timestamps.
    pub fn restore(&self, entries: impl IntoIterator<Item = (CacheKey, StoredLadder)>) {
        let mut map = self.entries.write();
        for (key, stored) in entries {
            if !map.contains_key(&key) && map.len() >= self.max_entries {
                evict_oldest(&mut map);
            }
            map.insert(key, stored);
        }
    }

    fn is_expired(&self, stored: &StoredLadder, now: DateTime<Utc>) -> bool {
        let Some(ttl) = self.ttl_seconds else {
            return false;
        };
        let age_ms = now.signed_duration_since(stored.stored_at).num_milliseconds();
        age_ms > 0 && age_ms as u64 > ttl.saturating_mul(1_000)
    }
}

impl Default for InMemoryResultCache {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultCache for InMemoryResultCache {
    fn get(&self, key: &CacheKey) -> Option<LadderResult> {
        let map = self.entries.read();
        let stored = map.get(key)?;
        if self.is_expired(stored, Utc::now()) {
            trace!(%key, "cache entry expired");
            return None;
        }
        Some(stored.ladder.clone())
    }

    fn set(&self, key: CacheKey, value: LadderResult) {
        let mut map = self.entries.write();
        if !map.contains_key(&key) && map.len() >= self.max_entries {
            evict_oldest(&mut map);
        }
        map.insert(
            key,
            StoredLadder {
                ladder: value,
                stored_at: Utc::now(),
            },
        );
    }
}

fn evict_oldest(map: &mut HashMap<CacheKey, StoredLadder>) {
    let oldest = map
        .iter()
        .min_by(|a, b| a.1.stored_at.cmp(&b.1.stored_at).then_with(|| a.0.cmp(b.0)))
        .map(|(key, _)| key.clone());
    if let Some(key) = oldest {
        trace!(%key, "evicting oldest cache entry");
        map.remove(&key);
    }
}
