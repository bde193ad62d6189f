//! The static product catalog.

use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use once_cell::sync::Lazy;
use thiserror::Error;

use ivx_core::{ContentRef, DomainError, ProductId};

use crate::product::Product;

const SEED: &str = include_str!("../data/seed.json");

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| {
    // The seed ships with the crate and is covered by `builtin_seed_is_valid`.
    Arc::new(Catalog::from_json_str(SEED).expect("built-in seed catalog must be valid"))
});

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("duplicate product id: {0}")]
    DuplicateId(ProductId),
    #[error(transparent)]
    Invalid(#[from] DomainError),
}

/// Immutable, load-once list of purchasable products.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Build a catalog, enforcing unique ids and per-product invariants.
    pub fn new(products: Vec<Product>) -> Result<Self, CatalogError> {
        let mut seen = HashSet::with_capacity(products.len());
        for product in &products {
            product.validate()?;
            if !seen.insert(product.id_typed().clone()) {
                return Err(CatalogError::DuplicateId(product.id_typed().clone()));
            }
        }
        Ok(Self { products })
    }

    /// The catalog compiled into the binary.
    pub fn builtin() -> Arc<Catalog> {
        BUILTIN.clone()
    }

    pub fn from_json_str(json: &str) -> Result<Self, CatalogError> {
        let products: Vec<Product> = serde_json::from_str(json)?;
        Self::new(products)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let catalog = Self::from_json_str(&raw)?;
        tracing::info!(
            path = %path.display(),
            products = catalog.len(),
            "loaded catalog from file"
        );
        Ok(catalog)
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| p.id_typed() == id)
    }

    /// Products whose `for` association matches `target` exactly, in catalog order.
    pub fn for_content(&self, target: &ContentRef) -> Vec<Product> {
        self.products
            .iter()
            .filter(|p| p.is_for(target))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id_typed().as_str()).collect()
    }

    #[test]
    fn builtin_seed_is_valid() {
        let catalog = Catalog::from_json_str(SEED).unwrap();
        assert_eq!(catalog.len(), 16);
        assert_eq!(Catalog::builtin().len(), 16);
    }

    #[test]
    fn for_content_returns_exact_matches() {
        let catalog = Catalog::builtin();
        let shelf = catalog.for_content(&ContentRef::video("v1").unwrap());
        assert_eq!(ids(&shelf), vec!["p1", "p2", "p3", "p15"]);

        let shelf = catalog.for_content(&ContentRef::event("e2").unwrap());
        assert_eq!(ids(&shelf), vec!["p10", "p11", "p12"]);
    }

    #[test]
    fn for_content_of_unknown_pair_is_empty() {
        let catalog = Catalog::builtin();
        assert!(catalog.for_content(&ContentRef::video("v3").unwrap()).is_empty());
        // Same id, other kind.
        assert!(catalog.for_content(&ContentRef::event("v1").unwrap()).is_empty());
    }

    #[test]
    fn every_associated_product_is_found_by_its_pair() {
        let catalog = Catalog::builtin();
        for product in catalog.products() {
            let Some(target) = product.target() else { continue };
            let shelf = catalog.for_content(target);
            assert!(shelf.contains(product));
            assert!(shelf.iter().all(|p| p.target() == Some(target)));
        }
    }

    #[test]
    fn get_finds_by_id() {
        let catalog = Catalog::builtin();
        let id = ProductId::parse("p4").unwrap();
        assert_eq!(catalog.get(&id).unwrap().title(), "Exclusive Hoodie");
        assert!(catalog.get(&ProductId::parse("p99").unwrap()).is_none());
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let json = r#"[
            { "id": "a", "title": "One", "price": 1, "type": "digital" },
            { "id": "a", "title": "Two", "price": 2, "type": "digital" }
        ]"#;
        assert!(matches!(
            Catalog::from_json_str(json),
            Err(CatalogError::DuplicateId(_))
        ));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{ "id": "x1", "title": "Pin", "price": 3.5, "type": "physical",
                  "for": {{ "kind": "event", "id": "e9" }} }}]"#
        )
        .unwrap();

        let catalog = Catalog::from_json_file(file.path()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog.for_content(&ContentRef::event("e9").unwrap()).len(), 1);
    }

    #[test]
    fn missing_file_reports_path() {
        let err = Catalog::from_json_file("/definitely/not/here.json").unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.json"));
    }
}
