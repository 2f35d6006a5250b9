//! Display preferences
//!
//! Persisted visibility toggles for the editor table columns and the
//! shop card elements. Corrupt or missing blobs fall back to the
//! defaults rather than erroring.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    config::keys,
    storage::{KeyValueStore, StoreError, get_json, set_json},
};

/// Editor table column visibility. SKU starts hidden.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnPrefs {
    pub image: bool,
    pub sku: bool,
    pub price: bool,
    pub categories: bool,
    pub tags: bool,
}

impl Default for ColumnPrefs {
    fn default() -> Self {
        Self {
            image: true,
            sku: false,
            price: true,
            categories: true,
            tags: true,
        }
    }
}

/// Shop card element visibility. Everything starts shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShopPrefs {
    pub title: bool,
    pub price: bool,
    pub description: bool,
    pub stock: bool,

    /// The add-to-cart control.
    pub add: bool,
}

impl Default for ShopPrefs {
    fn default() -> Self {
        Self {
            title: true,
            price: true,
            description: true,
            stock: true,
            add: true,
        }
    }
}

/// Storage-backed access to both preference blobs.
#[derive(Clone)]
pub struct Preferences {
    store: Arc<dyn KeyValueStore>,
}

impl Preferences {
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    /// Load the column preferences, defaulting on a missing or corrupt blob.
    #[must_use]
    pub fn columns(&self) -> ColumnPrefs {
        get_json(self.store.as_ref(), keys::COLUMN_PREFS).unwrap_or_default()
    }

    /// Persist the column preferences.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_columns(&self, prefs: &ColumnPrefs) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), keys::COLUMN_PREFS, prefs)
    }

    /// Load the shop preferences, defaulting on a missing or corrupt blob.
    #[must_use]
    pub fn shop(&self) -> ShopPrefs {
        get_json(self.store.as_ref(), keys::SHOP_PREFS).unwrap_or_default()
    }

    /// Persist the shop preferences.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write fails.
    pub fn save_shop(&self, prefs: &ShopPrefs) -> Result<(), StoreError> {
        set_json(self.store.as_ref(), keys::SHOP_PREFS, prefs)
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn sku_column_is_hidden_by_default() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));

        let columns = prefs.columns();
        assert!(!columns.sku);
        assert!(columns.image && columns.price && columns.categories && columns.tags);
    }

    #[test]
    fn shop_prefs_all_shown_by_default() {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));

        assert_eq!(prefs.shop(), ShopPrefs::default());
        assert!(prefs.shop().add);
    }

    #[test]
    fn saved_prefs_round_trip() -> TestResult {
        let prefs = Preferences::new(Arc::new(MemoryStore::new()));

        let columns = ColumnPrefs {
            sku: true,
            tags: false,
            ..ColumnPrefs::default()
        };
        prefs.save_columns(&columns)?;
        assert_eq!(prefs.columns(), columns);

        let shop = ShopPrefs {
            description: false,
            ..ShopPrefs::default()
        };
        prefs.save_shop(&shop)?;
        assert_eq!(prefs.shop(), shop);

        Ok(())
    }

    #[test]
    fn corrupt_blob_falls_back_to_defaults() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::COLUMN_PREFS, "{broken")?;
        store.set(keys::SHOP_PREFS, "[1,2,3]")?;

        let prefs = Preferences::new(store);
        assert_eq!(prefs.columns(), ColumnPrefs::default());
        assert_eq!(prefs.shop(), ShopPrefs::default());

        Ok(())
    }

    #[test]
    fn partial_blob_fills_missing_fields_with_defaults() -> TestResult {
        let store = Arc::new(MemoryStore::new());
        store.set(keys::COLUMN_PREFS, r#"{"sku":true}"#)?;

        let prefs = Preferences::new(store);
        let columns = prefs.columns();
        assert!(columns.sku);
        assert!(columns.image, "unspecified fields keep their defaults");

        Ok(())
    }
}
