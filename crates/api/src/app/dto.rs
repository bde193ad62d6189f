use axum::http::StatusCode;
use serde::Deserialize;

use ivx_catalog::{ProductFilter, ProductType};
use ivx_core::{ContentId, ContentKind, ContentRef};

use crate::app::errors;

/// `GET /api/ivx-products?kind=...&id=...`
#[derive(Debug, Default, Deserialize)]
pub struct ShelfQuery {
    pub kind: Option<String>,
    pub id: Option<String>,
}

impl ShelfQuery {
    pub fn target(&self) -> Result<ContentRef, axum::response::Response> {
        let (Some(kind), Some(id)) = (non_blank(&self.kind), non_blank(&self.id)) else {
            return Err(errors::json_error(StatusCode::BAD_REQUEST, "missing kind or id"));
        };

        let kind: ContentKind = kind.parse().map_err(|_| {
            errors::json_error(StatusCode::BAD_REQUEST, format!("invalid kind: {kind}"))
        })?;
        let id = ContentId::parse(id)
            .map_err(|e| errors::json_error(StatusCode::BAD_REQUEST, e.to_string()))?;

        Ok(ContentRef::new(kind, id))
    }
}

/// `GET /api/products?type=...&q=...`
#[derive(Debug, Default, Deserialize)]
pub struct ProductListQuery {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub q: Option<String>,
}

impl ProductListQuery {
    pub fn filter(&self) -> Result<ProductFilter, axum::response::Response> {
        let kind = match non_blank(&self.kind) {
            Some(raw) => Some(raw.parse::<ProductType>().map_err(|_| {
                errors::json_error(
                    StatusCode::BAD_REQUEST,
                    "type must be one of: physical, digital",
                )
            })?),
            None => None,
        };
        Ok(ProductFilter {
            kind,
            query: self.q.clone(),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}
