//! IVX catalog: products, the static seed catalog, search helpers and the
//! sources that answer "which products belong on this shelf".
//!
//! Everything except `SimulatedSource` is deterministic domain logic.

pub mod catalog;
pub mod product;
pub mod search;
pub mod simulator;
pub mod source;

pub use catalog::{Catalog, CatalogError};
pub use product::{Price, Product, ProductType};
pub use search::{filter_products_by_type, search_products, ProductFilter};
pub use simulator::{SimulatedSource, SimulationConfig, SimulationConfigError, Trial};
pub use source::{CatalogSource, FetchError, ProductSource};
