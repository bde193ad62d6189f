//! Selection + per-key fetch lifecycle for product shelves.

use std::sync::{Mutex, MutexGuard};

use chrono::Utc;

use ivx_catalog::{Product, ProductSource};
use ivx_core::ContentRef;

use crate::cache::{CacheConfig, ProductCache};
use crate::types::{CacheEntry, FetchState, SelectOutcome, ShelfView};

#[derive(Debug)]
struct ShelfState {
    selection: Option<ContentRef>,
    cache: ProductCache,
    next_ticket: u64,
}

fn lock(state: &Mutex<ShelfState>) -> MutexGuard<'_, ShelfState> {
    // Every critical section leaves the cache consistent, so a poisoned lock is still usable.
    state.lock().unwrap_or_else(|e| e.into_inner())
}

/// A started fetch that has not been applied to the cache yet.
///
/// Dropping it unsettled (the caller's future was cancelled) releases the
/// `loading` slot so the key can be fetched again.
struct PendingFetch<'a> {
    state: &'a Mutex<ShelfState>,
    key: String,
    ticket: u64,
    settled: bool,
}

impl Drop for PendingFetch<'_> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        if lock(self.state).cache.abandon(&self.key, self.ticket) {
            tracing::debug!(key = %self.key, ticket = self.ticket, "shelf fetch cancelled");
        }
    }
}

/// Tracks the selected content item and caches each item's shelf.
///
/// The state lock is never held while a fetch is in flight. Every fetch gets
/// a ticket, and a response is applied only if its ticket still owns the key.
/// `select` and `retry` are cancel-safe: dropping them mid-fetch leaves the
/// key `idle`.
pub struct ShelfStore<S> {
    source: S,
    state: Mutex<ShelfState>,
}

impl<S: ProductSource> ShelfStore<S> {
    pub fn new(source: S) -> Self {
        Self::with_cache(source, CacheConfig::default())
    }

    pub fn with_cache(source: S, config: CacheConfig) -> Self {
        Self {
            source,
            state: Mutex::new(ShelfState {
                selection: None,
                cache: ProductCache::new(config),
                next_ticket: 0,
            }),
        }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Make `target` the current selection and load its shelf if needed.
    ///
    /// A key that is already `success` (and fresh) or `loading` does not
    /// trigger another fetch.
    pub async fn select(&self, target: ContentRef) -> SelectOutcome {
        let pending = {
            let mut state = lock(&self.state);
            state.selection = Some(target.clone());
            let key = target.cache_key();
            match state.cache.state(&key, Utc::now()) {
                FetchState::Success(items) => return SelectOutcome::Cached(items),
                FetchState::Loading => return SelectOutcome::InFlight,
                FetchState::Idle | FetchState::Error(_) => {}
            }
            self.begin(&mut state, key)
        };

        self.run_fetch(target, pending).await
    }

    /// Re-fetch the current selection if it is in `error`.
    ///
    /// Returns `None` when there is no selection or it is not in `error`.
    pub async fn retry(&self) -> Option<SelectOutcome> {
        let (target, pending) = {
            let mut state = lock(&self.state);
            let target = state.selection.clone()?;
            let key = target.cache_key();
            if !matches!(state.cache.state(&key, Utc::now()), FetchState::Error(_)) {
                return None;
            }
            let pending = self.begin(&mut state, key);
            (target, pending)
        };

        tracing::info!(content = %target, "retrying shelf fetch");
        Some(self.run_fetch(target, pending).await)
    }

    pub async fn selection(&self) -> Option<ContentRef> {
        lock(&self.state).selection.clone()
    }

    /// Snapshot of `target`'s cache entry (`idle` when unknown).
    pub async fn entry(&self, target: &ContentRef) -> CacheEntry {
        lock(&self.state)
            .cache
            .peek(&target.cache_key(), Utc::now())
            .into()
    }

    /// The current selection and its entry.
    pub async fn current(&self) -> Option<ShelfView> {
        let state = lock(&self.state);
        let selection = state.selection.clone()?;
        let entry = state.cache.peek(&selection.cache_key(), Utc::now()).into();
        Some(ShelfView { selection, entry })
    }

    /// Drop `target`'s entry so the next selection fetches again.
    pub async fn invalidate(&self, target: &ContentRef) -> bool {
        lock(&self.state).cache.invalidate(&target.cache_key())
    }

    /// Drop every entry and the selection.
    pub async fn clear(&self) {
        let mut state = lock(&self.state);
        state.cache.clear();
        state.selection = None;
    }

    fn begin(&self, state: &mut ShelfState, key: String) -> PendingFetch<'_> {
        state.next_ticket += 1;
        let ticket = state.next_ticket;
        state.cache.begin(&key, ticket, Utc::now());
        PendingFetch {
            state: &self.state,
            key,
            ticket,
            settled: false,
        }
    }

    async fn run_fetch(&self, target: ContentRef, mut pending: PendingFetch<'_>) -> SelectOutcome {
        tracing::debug!(content = %target, ticket = pending.ticket, "fetching shelf");
        let result = self.source.fetch(&target).await;

        let stored: Result<Vec<Product>, String> = match &result {
            Ok(items) => Ok(items.clone()),
            Err(e) => Err(e.to_string()),
        };
        let mut state = lock(&self.state);
        pending.settled = true;
        if !state.cache.complete(&pending.key, pending.ticket, stored, Utc::now()) {
            tracing::debug!(content = %target, ticket = pending.ticket, "discarding stale shelf response");
            return SelectOutcome::Stale;
        }

        if state.selection.as_ref() != Some(&target) {
            tracing::debug!(content = %target, "shelf loaded after selection changed");
            return SelectOutcome::Superseded;
        }

        match result {
            Ok(items) => SelectOutcome::Loaded(items),
            Err(e) => {
                tracing::warn!(content = %target, error = %e, "shelf fetch failed");
                SelectOutcome::Failed(e.to_string())
            }
        }
    }
}
