//! Catalog store
//!
//! Resolves the active product list through the source chain and persists
//! edits back to the user slot. A user edit "graduates" to the highest
//! priority slot and is never silently overwritten by demo refreshes.

use std::sync::Arc;

use super::{
    CatalogError,
    demo::demo_products,
    fetch::CatalogFetcher,
    models::{CatalogData, Product},
    sources::{
        BuiltinSource, CachedDemoSource, Disposition, ProductSource, PromotedUploadSource,
        RemoteSource, UserSlotSource,
    },
};
use crate::{
    config::keys,
    storage::{KeyValueStore, StoreError, get_json, set_json},
};

/// The catalog store.
pub struct Catalog {
    store: Arc<dyn KeyValueStore>,
    fetcher: Arc<dyn CatalogFetcher>,
    sources: Vec<Box<dyn ProductSource>>,
}

impl std::fmt::Debug for Catalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Catalog")
            .field("sources", &self.sources.len())
            .finish_non_exhaustive()
    }
}

impl Catalog {
    /// A catalog with the standard five-step priority chain.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, fetcher: Arc<dyn CatalogFetcher>) -> Self {
        let sources: Vec<Box<dyn ProductSource>> = vec![
            Box::new(UserSlotSource::new(Arc::clone(&store))),
            Box::new(PromotedUploadSource::new(Arc::clone(&store))),
            Box::new(CachedDemoSource::new(Arc::clone(&store))),
            Box::new(RemoteSource::new(Arc::clone(&fetcher))),
            Box::new(BuiltinSource),
        ];

        Self {
            store,
            fetcher,
            sources,
        }
    }

    /// A catalog with a custom resolver chain.
    #[must_use]
    pub fn with_sources(
        store: Arc<dyn KeyValueStore>,
        fetcher: Arc<dyn CatalogFetcher>,
        sources: Vec<Box<dyn ProductSource>>,
    ) -> Self {
        Self {
            store,
            fetcher,
            sources,
        }
    }

    /// Resolve the active product list.
    ///
    /// Sources are tried in order; the first usable result wins and its
    /// follow-up side effect (promotion or demo caching) is applied.
    /// Side-effect failures are logged, not surfaced: the caller still
    /// gets the resolved catalog.
    pub async fn products(&self) -> CatalogData {
        for source in &self.sources {
            let Some(resolution) = source.resolve().await else {
                continue;
            };

            tracing::debug!(
                source = source.name(),
                count = resolution.data.products.len(),
                "resolved catalog"
            );

            match resolution.disposition {
                Disposition::None => {}
                Disposition::PromoteToUser => {
                    if let Err(error) = self.save_products(&resolution.data) {
                        tracing::warn!(%error, "could not promote staged catalog");
                    }
                }
                Disposition::CacheDemo => {
                    if let Err(error) =
                        set_json(self.store.as_ref(), keys::DEMO_PRODUCTS, &resolution.data)
                    {
                        tracing::warn!(%error, "could not cache demo catalog");
                    }
                }
            }

            return resolution.data;
        }

        // Only reachable with a custom chain that has no terminal source.
        CatalogData::default()
    }

    /// Find a product by id, falling back to slug lookup.
    pub async fn find(&self, reference: &str) -> Option<Product> {
        let reference = reference.trim();
        let data = self.products().await;

        data.products
            .iter()
            .find(|product| product.id.to_string() == reference)
            .or_else(|| {
                data.products
                    .iter()
                    .find(|product| !product.slug.is_empty() && product.slug == reference)
            })
            .cloned()
    }

    /// Overwrite the user-saved slot.
    ///
    /// On a quota failure the demo caches are cleared and the write is
    /// retried once before the failure is reported.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the store rejects the write even
    /// after the retry.
    pub fn save_products(&self, data: &CatalogData) -> Result<(), CatalogError> {
        match set_json(self.store.as_ref(), keys::USER_PRODUCTS, data) {
            Ok(()) => Ok(()),
            Err(StoreError::QuotaExceeded) => {
                tracing::warn!("storage quota exceeded, clearing demo caches and retrying");
                self.clear_demo_data()?;
                set_json(self.store.as_ref(), keys::USER_PRODUCTS, data)?;
                Ok(())
            }
            Err(error) => Err(error.into()),
        }
    }

    /// `true` when the user slot holds at least one product.
    pub fn has_user_products(&self) -> bool {
        get_json::<CatalogData>(self.store.as_ref(), keys::USER_PRODUCTS)
            .is_some_and(|data| data.is_usable())
    }

    /// Load the demo catalog without touching the user slot: the cached
    /// copy, else the remote fetch, else the built-in fallback. Whatever
    /// was loaded ends up cached in the demo slot.
    pub async fn load_demo_products(&self) -> CatalogData {
        if let Some(cached) = get_json::<CatalogData>(self.store.as_ref(), keys::DEMO_PRODUCTS)
            .filter(CatalogData::is_usable)
        {
            return cached;
        }

        let remote = RemoteSource::new(Arc::clone(&self.fetcher));
        let data = match remote.resolve().await {
            Some(resolution) => resolution.data,
            None => demo_products(),
        };

        if let Err(error) = set_json(self.store.as_ref(), keys::DEMO_PRODUCTS, &data) {
            tracing::warn!(%error, "could not cache demo catalog");
        }

        data
    }

    /// Replace the user slot with the demo catalog (the explicit "reload
    /// demo data" action).
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when the save fails.
    pub async fn use_demo_products(&self) -> Result<CatalogData, CatalogError> {
        let data = self.load_demo_products().await;
        self.save_products(&data)?;

        Ok(data)
    }

    /// Drop the demo caches and the legacy backup, keeping user products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when a removal fails.
    pub fn clear_demo_data(&self) -> Result<(), CatalogError> {
        for key in [keys::DEMO_PRODUCTS, keys::UPLOADED_DEMO, keys::LEGACY] {
            self.store.remove(key)?;
        }

        Ok(())
    }

    /// Drop every catalog slot, including user products.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] when a removal fails.
    pub fn clear_all(&self) -> Result<(), CatalogError> {
        self.store.remove(keys::USER_PRODUCTS)?;
        self.clear_demo_data()
    }

}
