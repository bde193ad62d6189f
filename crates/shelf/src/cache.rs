//! Bounded in-memory cache of shelf fetch state, keyed by `"<kind>:<id>"`.

use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};

use ivx_catalog::Product;

use crate::types::FetchState;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of keys kept. Loading entries are never evicted, so the
    /// cache can briefly exceed this while many fetches are in flight.
    pub capacity: usize,
    /// Age after which a successful entry counts as absent. `None` keeps
    /// entries until they are evicted or invalidated.
    pub ttl: Option<Duration>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 64,
            ttl: Some(Duration::minutes(5)),
        }
    }
}

#[derive(Debug, Clone)]
struct Slot {
    state: FetchState,
    /// Ticket of the request currently allowed to complete this slot.
    ticket: Option<u64>,
    updated_at: DateTime<Utc>,
    last_used: u64,
}

/// LRU + TTL cache of per-key fetch state.
///
/// The cache is a plain data structure; callers pass `now` explicitly and
/// provide their own synchronization.
#[derive(Debug, Clone)]
pub struct ProductCache {
    config: CacheConfig,
    slots: HashMap<String, Slot>,
    tick: u64,
}

impl ProductCache {
    pub fn new(mut config: CacheConfig) -> Self {
        config.capacity = config.capacity.max(1);
        Self {
            config,
            slots: HashMap::new(),
            tick: 0,
        }
    }

    pub fn config(&self) -> &CacheConfig {
        &self.config
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// State of `key` as seen at `now`, marking it recently used.
    ///
    /// Expired successes are dropped and reported as `Idle`.
    pub fn state(&mut self, key: &str, now: DateTime<Utc>) -> FetchState {
        if self.drop_if_expired(key, now) {
            return FetchState::Idle;
        }
        self.tick += 1;
        let tick = self.tick;
        match self.slots.get_mut(key) {
            Some(slot) => {
                slot.last_used = tick;
                slot.state.clone()
            }
            None => FetchState::Idle,
        }
    }

    /// Like `state`, without touching recency or dropping expired entries.
    pub fn peek(&self, key: &str, now: DateTime<Utc>) -> FetchState {
        match self.slots.get(key) {
            Some(slot) if !self.is_expired(slot, now) => slot.state.clone(),
            _ => FetchState::Idle,
        }
    }

    /// Move `key` to `loading` under `ticket`, evicting old keys if over capacity.
    ///
    /// Any earlier ticket for the same key stops being able to complete it.
    pub fn begin(&mut self, key: &str, ticket: u64, now: DateTime<Utc>) {
        self.tick += 1;
        self.slots.insert(
            key.to_string(),
            Slot {
                state: FetchState::Loading,
                ticket: Some(ticket),
                updated_at: now,
                last_used: self.tick,
            },
        );
        self.evict_over_capacity(key);
    }

    /// Finish the fetch identified by `ticket`.
    ///
    /// Returns `false` (and changes nothing) when the slot is gone or now
    /// belongs to a different request.
    pub fn complete(
        &mut self,
        key: &str,
        ticket: u64,
        result: Result<Vec<Product>, String>,
        now: DateTime<Utc>,
    ) -> bool {
        let Some(slot) = self.slots.get_mut(key) else {
            return false;
        };
        if slot.ticket != Some(ticket) {
            return false;
        }
        slot.state = match result {
            Ok(items) => FetchState::Success(items),
            Err(message) => FetchState::Error(message),
        };
        slot.ticket = None;
        slot.updated_at = now;
        true
    }

    /// Release a `loading` slot whose request was cancelled before completing.
    ///
    /// Only the slot's current ticket can abandon it; returns whether it did.
    pub fn abandon(&mut self, key: &str, ticket: u64) -> bool {
        let owned = self
            .slots
            .get(key)
            .is_some_and(|slot| slot.ticket == Some(ticket));
        if owned {
            self.slots.remove(key);
        }
        owned
    }

    /// Forget `key`. An in-flight request for it will be discarded on completion.
    pub fn invalidate(&mut self, key: &str) -> bool {
        self.slots.remove(key).is_some()
    }

    pub fn clear(&mut self) {
        self.slots.clear();
    }

    fn is_expired(&self, slot: &Slot, now: DateTime<Utc>) -> bool {
        match (&slot.state, self.config.ttl) {
            (FetchState::Success(_), Some(ttl)) => now.signed_duration_since(slot.updated_at) > ttl,
            _ => false,
        }
    }

    fn drop_if_expired(&mut self, key: &str, now: DateTime<Utc>) -> bool {
        let expired = self
            .slots
            .get(key)
            .is_some_and(|slot| self.is_expired(slot, now));
        if expired {
            self.slots.remove(key);
            tracing::debug!(key, "cache entry expired");
        }
        expired
    }

    fn evict_over_capacity(&mut self, keep: &str) {
        while self.slots.len() > self.config.capacity {
            let victim = self
                .slots
                .iter()
                .filter(|(k, s)| k.as_str() != keep && s.state != FetchState::Loading)
                .min_by_key(|(_, s)| s.last_used)
                .map(|(k, _)| k.clone());

            match victim {
                Some(k) => {
                    self.slots.remove(&k);
                    tracing::debug!(key = %k, "evicted least recently used shelf");
                }
                None => break,
            }
        }
    }
}

impl Default for ProductCache {
    fn default() -> Self {
        Self::new(CacheConfig::default())
    }
}
