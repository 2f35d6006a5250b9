//! Catalog import/export
//!
//! Serializes the full product list for download and accepts uploaded
//! JSON back, promoting a valid import straight to the user-saved slot.

use super::{Catalog, CatalogError, models::CatalogData};

/// Serialize a catalog the way the export download produces it.
///
/// # Errors
///
/// Returns a [`CatalogError`] if serialization fails.
pub fn export_json(data: &CatalogData) -> Result<String, CatalogError> {
    Ok(serde_json::to_string_pretty(data)?)
}

impl Catalog {
    /// Import a catalog from JSON text and save it as the user catalog.
    ///
    /// The text must be a JSON object with a `products` array; anything
    /// else is rejected before the user slot is touched.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] for malformed JSON, a missing products
    /// array, or a failed save.
    pub fn import_json(&self, text: &str) -> Result<CatalogData, CatalogError> {
        let value: serde_json::Value = serde_json::from_str(text)?;

        if !value.get("products").is_some_and(serde_json::Value::is_array) {
            return Err(CatalogError::MissingProductsArray);
        }

        let data: CatalogData = serde_json::from_value(value)?;
        self.save_products(&data)?;

        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use testresult::TestResult;

    use super::*;
    use crate::{
        catalog::{
            demo::demo_products,
            fetch::{CatalogFetcher, FetchError, MockCatalogFetcher},
        },
        storage::MemoryStore,
    };

    fn offline_fetcher() -> Arc<dyn CatalogFetcher> {
        let mut fetcher = MockCatalogFetcher::new();
        fetcher
            .expect_fetch()
            .returning(|| Err(FetchError::Status(reqwest::StatusCode::NOT_FOUND)));
        Arc::new(fetcher)
    }

    #[tokio::test]
    async fn export_import_round_trip() -> TestResult {
        let original = demo_products();
        let text = export_json(&original)?;

        let catalog = Catalog::new(Arc::new(MemoryStore::new()), offline_fetcher());
        let imported = catalog.import_json(&text)?;

        assert_eq!(imported.products.len(), original.products.len());
        for (a, b) in original.products.iter().zip(&imported.products) {
            assert_eq!(a.id, b.id);
            assert_eq!(a.title, b.title);
            assert_eq!(a.effective_price(), b.effective_price());
        }

        // The import was promoted to the user slot.
        assert!(catalog.has_user_products());
        let resolved = catalog.products().await;
        assert_eq!(resolved.products.len(), original.products.len());

        Ok(())
    }

    #[test]
    fn import_rejects_missing_products_array() {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()), offline_fetcher());

        let result = catalog.import_json(r#"{"items": []}"#);
        assert!(
            matches!(result, Err(CatalogError::MissingProductsArray)),
            "expected MissingProductsArray, got {result:?}"
        );

        let result = catalog.import_json(r#"{"products": "nope"}"#);
        assert!(
            matches!(result, Err(CatalogError::MissingProductsArray)),
            "expected MissingProductsArray for non-array, got {result:?}"
        );

        assert!(!catalog.has_user_products(), "user slot untouched");
    }

    #[test]
    fn import_rejects_malformed_json() {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()), offline_fetcher());

        let result = catalog.import_json("{broken");
        assert!(
            matches!(result, Err(CatalogError::MalformedJson(_))),
            "expected MalformedJson, got {result:?}"
        );
    }

    #[test]
    fn import_accepts_an_empty_products_array() -> TestResult {
        let catalog = Catalog::new(Arc::new(MemoryStore::new()), offline_fetcher());

        let imported = catalog.import_json(r#"{"products": []}"#)?;

        assert!(imported.products.is_empty());

        Ok(())
    }
}
