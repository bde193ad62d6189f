//! `ivx-core`: domain building blocks shared by the catalog, API and shelf client.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns).

pub mod content;
pub mod error;
pub mod id;

pub use content::{ContentKind, ContentRef};
pub use error::DomainError;
pub use id::{ContentId, ProductId};
