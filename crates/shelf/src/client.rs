//! HTTP client for the IVX API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use ivx_catalog::{FetchError, Product, ProductFilter, ProductSource};
use ivx_core::{ContentRef, ProductId};

/// Thin wrapper over `GET /api/ivx-products` and the catalog endpoints.
///
/// No caching, retries or request deduplication happen here; that is the
/// `ShelfStore`'s job.
#[derive(Debug, Clone)]
pub struct ShelfClient {
    base_url: String,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

impl ShelfClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_http(base_url, reqwest::Client::new())
    }

    pub fn with_http(base_url: impl Into<String>, http: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Check connectivity by hitting the health endpoint.
    pub async fn health(&self) -> bool {
        let url = format!("{}/health", self.base_url);
        matches!(self.http.get(&url).send().await, Ok(resp) if resp.status().is_success())
    }

    /// Products on the shelf of `target`.
    pub async fn fetch_products(&self, target: &ContentRef) -> Result<Vec<Product>, FetchError> {
        let url = format!("{}/api/ivx-products", self.base_url);
        let req = self
            .http
            .get(&url)
            .query(&[("kind", target.kind.as_str()), ("id", target.id.as_str())]);
        self.send_json(req).await
    }

    /// Whole-catalog listing, optionally filtered.
    pub async fn list_products(&self, filter: &ProductFilter) -> Result<Vec<Product>, FetchError> {
        let url = format!("{}/api/products", self.base_url);
        let mut params: Vec<(&str, &str)> = Vec::new();
        if let Some(kind) = filter.kind {
            params.push(("type", kind.as_str()));
        }
        if let Some(q) = filter.query.as_deref() {
            params.push(("q", q));
        }
        self.send_json(self.http.get(&url).query(&params)).await
    }

    pub async fn get_product(&self, id: &ProductId) -> Result<Product, FetchError> {
        let url = format!("{}/api/products/{}", self.base_url, id);
        self.send_json(self.http.get(&url)).await
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, FetchError> {
        let resp = req
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            // A missing or malformed error body falls back to the generic message.
            let body = resp.json::<ErrorBody>().await.ok();
            let message = body
                .and_then(|b| b.error)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("failed to fetch products ({})", status.as_u16()));
            return Err(FetchError::Api {
                status: status.as_u16(),
                message,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

#[async_trait]
impl ProductSource for ShelfClient {
    async fn fetch(&self, target: &ContentRef) -> Result<Vec<Product>, FetchError> {
        self.fetch_products(target).await
    }
}
