use thiserror::Error;

use crate::cache::CacheConfig;
use crate::client::ShelfClient;
use crate::store::ShelfStore;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ShelfConfigError {
    #[error("base url is empty")]
    EmptyBaseUrl,

    #[error("base url must start with http:// or https://: {0}")]
    UnsupportedScheme(String),
}

/// Client-side settings: where the API lives and how shelves are cached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfConfig {
    pub base_url: String,
    pub cache: CacheConfig,
}

impl ShelfConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            cache: CacheConfig::default(),
        }
    }

    pub fn with_cache(mut self, cache: CacheConfig) -> Self {
        self.cache = cache;
        self
    }

    pub fn validate(&self) -> Result<(), ShelfConfigError> {
        let url = self.base_url.trim();
        if url.is_empty() {
            return Err(ShelfConfigError::EmptyBaseUrl);
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ShelfConfigError::UnsupportedScheme(url.to_string()));
        }
        Ok(())
    }

    /// Build a store backed by the HTTP client.
    pub fn build(&self) -> Result<ShelfStore<ShelfClient>, ShelfConfigError> {
        self.validate()?;
        let client = ShelfClient::new(self.base_url.trim());
        tracing::info!(base_url = client.base_url(), capacity = self.cache.capacity, "shelf store configured");
        Ok(ShelfStore::with_cache(client, self.cache.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_and_schemeless_urls() {
        assert_eq!(
            ShelfConfig::new("  ").validate(),
            Err(ShelfConfigError::EmptyBaseUrl)
        );
        assert_eq!(
            ShelfConfig::new("localhost:8080").validate(),
            Err(ShelfConfigError::UnsupportedScheme("localhost:8080".to_string()))
        );
    }

    #[tokio::test]
    async fn builds_store_with_cache_settings() {
        let cache = CacheConfig {
            capacity: 3,
            ttl: None,
        };
        let store = ShelfConfig::new("http://127.0.0.1:8080/")
            .with_cache(cache)
            .build()
            .unwrap();

        assert_eq!(store.source().base_url(), "http://127.0.0.1:8080");
        assert_eq!(store.selection().await, None);
    }
}
