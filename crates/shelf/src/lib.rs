//! `ivx-shelf`
//!
//! **Responsibility:** Client side of the IVX product shelf.
//!
//! This crate provides:
//! - An HTTP wrapper over the IVX API (`ShelfClient`)
//! - A bounded, TTL-aware cache of per-content fetch state (`ProductCache`)
//! - Selection tracking with stale-response protection (`ShelfStore`)
//!
//! The API remains the authority; nothing here is persisted.

pub mod cache;
pub mod client;
pub mod config;
pub mod store;
pub mod types;

pub use cache::{CacheConfig, ProductCache};
pub use client::ShelfClient;
pub use config::{ShelfConfig, ShelfConfigError};
pub use store::ShelfStore;
pub use types::{CacheEntry, FetchState, FetchStatus, SelectOutcome, ShelfView};
