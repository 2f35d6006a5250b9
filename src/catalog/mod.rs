//! Catalog
//!
//! The product model and the storage layer that resolves the active
//! product list from a prioritised chain of data sources: user-saved
//! data, a promoted-upload staging slot, a cached demo dataset, a remote
//! JSON fetch and a built-in fallback.

use thiserror::Error;

pub mod demo;
pub mod fetch;
pub mod import;
pub mod models;
pub mod sources;
pub mod store;

pub use demo::demo_products;
pub use fetch::{CatalogFetcher, FetchError, HttpCatalogFetcher};
pub use models::{CatalogData, Dimensions, GallerySlot, ImageRef, Product, StockStatus};
pub use sources::{Disposition, ProductSource, Resolution};
pub use store::Catalog;

use crate::storage::StoreError;

/// Errors surfaced by catalog operations.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The persistence layer failed even after the quota retry.
    #[error("products could not be saved")]
    Store(#[from] StoreError),

    /// Imported JSON did not contain a `products` array.
    #[error("invalid JSON format: missing \"products\" array")]
    MissingProductsArray,

    /// Imported text was not JSON at all.
    #[error("invalid JSON: {0}")]
    MalformedJson(#[from] serde_json::Error),
}
