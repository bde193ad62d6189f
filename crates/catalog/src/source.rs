//! Where shelf products come from.
//!
//! `ProductSource` is the seam between the shelf (cache/selection state) and
//! whatever answers "which products belong to this content item": the
//! in-process catalog, the latency/failure simulator, or the HTTP client.

use std::sync::Arc;

use async_trait::async_trait;
use thiserror::Error;

use ivx_core::ContentRef;

use crate::catalog::Catalog;
use crate::product::Product;

/// Failure while fetching a product shelf.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Injected transient failure (simulator).
    #[error("network error")]
    Network,

    /// The request never produced an HTTP response.
    #[error("network error: {0}")]
    Transport(String),

    /// Non-2xx response. Displays exactly the server-provided (or synthesized) message.
    #[error("{message}")]
    Api { status: u16, message: String },

    /// A 2xx response whose body was not a product list.
    #[error("invalid response body: {0}")]
    Decode(String),
}

impl FetchError {
    /// True for failures a user-driven retry may resolve.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Network | FetchError::Transport(_) => true,
            FetchError::Api { status, .. } => *status >= 500,
            FetchError::Decode(_) => false,
        }
    }
}

/// Async lookup of the products associated with one content item.
#[async_trait]
pub trait ProductSource: Send + Sync {
    async fn fetch(&self, target: &ContentRef) -> Result<Vec<Product>, FetchError>;
}

#[async_trait]
impl<S> ProductSource for Arc<S>
where
    S: ProductSource + ?Sized,
{
    async fn fetch(&self, target: &ContentRef) -> Result<Vec<Product>, FetchError> {
        (**self).fetch(target).await
    }
}

/// Direct, infallible lookup against an in-memory catalog.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    catalog: Arc<Catalog>,
}

impl CatalogSource {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self { catalog }
    }

    pub fn builtin() -> Self {
        Self::new(Catalog::builtin())
    }
}

#[async_trait]
impl ProductSource for CatalogSource {
    async fn fetch(&self, target: &ContentRef) -> Result<Vec<Product>, FetchError> {
        Ok(self.catalog.for_content(target))
    }
}
