//! Pure search/filter helpers over product slices.
//!
//! Linear scans only; the catalog is small and static.

use crate::product::{Product, ProductType};

/// Keep only products of the given type.
pub fn filter_products_by_type(products: &[Product], kind: ProductType) -> Vec<Product> {
    products
        .iter()
        .filter(|p| p.kind() == kind)
        .cloned()
        .collect()
}

/// Case-insensitive substring search over title and tags.
///
/// An empty (or whitespace-only) query returns the input unchanged.
pub fn search_products(products: &[Product], query: &str) -> Vec<Product> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return products.to_vec();
    }
    products
        .iter()
        .filter(|p| p.matches_lowercase(&needle))
        .cloned()
        .collect()
}

/// Combined listing filter (type + free-text query).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    pub kind: Option<ProductType>,
    pub query: Option<String>,
}

impl ProductFilter {
    pub fn apply(&self, products: &[Product]) -> Vec<Product> {
        let typed = match self.kind {
            Some(kind) => filter_products_by_type(products, kind),
            None => products.to_vec(),
        };
        match self.query.as_deref() {
            Some(q) => search_products(&typed, q),
            None => typed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn ids(products: &[Product]) -> Vec<&str> {
        products.iter().map(|p| p.id_typed().as_str()).collect()
    }

    #[test]
    fn empty_query_is_identity() {
        let catalog = Catalog::builtin();
        assert_eq!(search_products(catalog.products(), ""), catalog.products());
        assert_eq!(search_products(catalog.products(), "   "), catalog.products());
    }

    #[test]
    fn search_is_case_insensitive_over_tags() {
        let catalog = Catalog::builtin();
        let hits = search_products(catalog.products(), "LIMITED");
        assert_eq!(ids(&hits), vec!["p1", "p4"]);
    }

    #[test]
    fn search_matches_title_substrings() {
        let catalog = Catalog::builtin();
        assert_eq!(ids(&search_products(catalog.products(), "neon")), vec!["p1"]);
        assert_eq!(
            ids(&search_products(catalog.products(), "bundle")),
            vec!["p2", "p9"]
        );
        assert!(search_products(catalog.products(), "nothing-like-this").is_empty());
    }

    #[test]
    fn filter_by_type_keeps_only_that_type() {
        let catalog = Catalog::builtin();
        let digital = filter_products_by_type(catalog.products(), ProductType::Digital);
        assert!(!digital.is_empty());
        assert!(digital.iter().all(|p| p.kind() == ProductType::Digital));

        let physical = filter_products_by_type(catalog.products(), ProductType::Physical);
        assert_eq!(digital.len() + physical.len(), catalog.len());
    }

    #[test]
    fn product_filter_combines_type_and_query() {
        let catalog = Catalog::builtin();
        let filter = ProductFilter {
            kind: Some(ProductType::Physical),
            query: Some("apparel".to_string()),
        };
        assert_eq!(ids(&filter.apply(catalog.products())), vec!["p1", "p4", "p8", "p13"]);
        assert_eq!(ProductFilter::default().apply(catalog.products()), catalog.products());
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every search hit actually contains the query, and no
            /// matching product is dropped.
            #[test]
            fn search_is_sound_and_complete(query in "[A-Za-z ]{0,8}") {
                let catalog = Catalog::builtin();
                let hits = search_products(catalog.products(), &query);
                let needle = query.trim().to_lowercase();

                for p in catalog.products() {
                    let matches = needle.is_empty()
                        || p.title().to_lowercase().contains(&needle)
                        || p.tags().iter().any(|t| t.to_lowercase().contains(&needle));
                    prop_assert_eq!(hits.contains(p), matches);
                }
            }

            /// Property: search never reorders products.
            #[test]
            fn search_preserves_catalog_order(query in "[a-z]{1,3}") {
                let catalog = Catalog::builtin();
                let hits = search_products(catalog.products(), &query);
                let positions: Vec<usize> = hits
                    .iter()
                    .map(|h| catalog.products().iter().position(|p| p == h).unwrap())
                    .collect();
                prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
            }

            /// Property: filtering is idempotent.
            #[test]
            fn filter_is_idempotent(digital in any::<bool>()) {
                let kind = if digital { ProductType::Digital } else { ProductType::Physical };
                let catalog = Catalog::builtin();
                let once = filter_products_by_type(catalog.products(), kind);
                let twice = filter_products_by_type(&once, kind);
                prop_assert_eq!(once, twice);
            }
        }
    }
}
