//! Shared shelf types: fetch status, cache snapshots and selection outcomes.

use serde::{Deserialize, Serialize};

use ivx_catalog::Product;
use ivx_core::ContentRef;

/// Lifecycle status of one cache key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FetchStatus {
    Idle,
    Loading,
    Success,
    Error,
}

impl FetchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStatus::Idle => "idle",
            FetchStatus::Loading => "loading",
            FetchStatus::Success => "success",
            FetchStatus::Error => "error",
        }
    }
}

/// Per-key fetch state.
///
/// Items exist only in `Success` and a message only in `Error`, so an entry
/// can never carry both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchState {
    Idle,
    Loading,
    Success(Vec<Product>),
    Error(String),
}

impl FetchState {
    pub fn status(&self) -> FetchStatus {
        match self {
            FetchState::Idle => FetchStatus::Idle,
            FetchState::Loading => FetchStatus::Loading,
            FetchState::Success(_) => FetchStatus::Success,
            FetchState::Error(_) => FetchStatus::Error,
        }
    }
}

/// Flat, serializable view of a cache entry: `{ status, items, error? }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheEntry {
    pub status: FetchStatus,
    #[serde(default)]
    pub items: Vec<Product>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl From<FetchState> for CacheEntry {
    fn from(state: FetchState) -> Self {
        match state {
            FetchState::Idle => CacheEntry::bare(FetchStatus::Idle),
            FetchState::Loading => CacheEntry::bare(FetchStatus::Loading),
            FetchState::Success(items) => CacheEntry {
                status: FetchStatus::Success,
                items,
                error: None,
            },
            FetchState::Error(message) => CacheEntry {
                status: FetchStatus::Error,
                items: Vec::new(),
                error: Some(message),
            },
        }
    }
}

impl CacheEntry {
    fn bare(status: FetchStatus) -> Self {
        Self {
            status,
            items: Vec::new(),
            error: None,
        }
    }
}

/// What `ShelfStore::select` did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Served from cache; no fetch.
    Cached(Vec<Product>),
    /// Fetched now and still the current selection.
    Loaded(Vec<Product>),
    /// Fetch failed; the key is now in `error`.
    Failed(String),
    /// A fetch for this key was already running; nothing new was started.
    InFlight,
    /// The fetch finished and was cached, but the selection moved on meanwhile.
    Superseded,
    /// The response belonged to an older request for this key and was dropped.
    Stale,
}

/// The current selection together with its cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShelfView {
    pub selection: ContentRef,
    pub entry: CacheEntry,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_snapshot_keeps_items_and_error_exclusive() {
        let entry = CacheEntry::from(FetchState::Error("boom".to_string()));
        assert_eq!(entry.status, FetchStatus::Error);
        assert!(entry.items.is_empty());
        assert_eq!(entry.error.as_deref(), Some("boom"));

        let entry = CacheEntry::from(FetchState::Success(Vec::new()));
        assert_eq!(entry.status, FetchStatus::Success);
        assert_eq!(entry.error, None);
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_value(CacheEntry::from(FetchState::Loading)).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "loading", "items": [] }));
        assert_eq!(FetchStatus::Success.as_str(), "success");
    }
}
