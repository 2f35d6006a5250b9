//! Catalog sources
//!
//! The priority chain as an explicit ordered list of resolver strategies.
//! Each source either produces a catalog with at least one product or
//! yields to the next one; parse and fetch failures count as "nothing
//! here". A source may ask the store to run a follow-up side effect
//! (promotion or caching) on its result.

use std::sync::Arc;

use async_trait::async_trait;

use super::{
    demo::demo_products,
    fetch::CatalogFetcher,
    models::CatalogData,
};
use crate::{
    config::keys,
    storage::{KeyValueStore, get_json},
};

/// Follow-up the catalog store performs after a source resolves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Nothing further.
    None,

    /// Copy the result into the user-saved slot (staging promotion).
    PromoteToUser,

    /// Cache the result in the demo slot.
    CacheDemo,
}

/// A successfully resolved catalog plus its follow-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved catalog; always has at least one product.
    pub data: CatalogData,

    /// Side effect the store should apply.
    pub disposition: Disposition,
}

/// One strategy in the priority chain.
#[async_trait]
pub trait ProductSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Try to produce a usable catalog.
    async fn resolve(&self) -> Option<Resolution>;
}

fn slot(store: &dyn KeyValueStore, key: &str) -> Option<CatalogData> {
    get_json::<CatalogData>(store, key).filter(CatalogData::is_usable)
}

/// Priority 1: products the user saved or edited.
pub struct UserSlotSource {
    store: Arc<dyn KeyValueStore>,
}

impl UserSlotSource {
    /// Read from the user-saved slot of `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProductSource for UserSlotSource {
    fn name(&self) -> &'static str {
        "user"
    }

    async fn resolve(&self) -> Option<Resolution> {
        Some(Resolution {
            data: slot(self.store.as_ref(), keys::USER_PRODUCTS)?,
            disposition: Disposition::None,
        })
    }
}

/// Priority 2: the staging slot filled by the image-upload flow. A hit is
/// promoted into the user slot so it persists.
pub struct PromotedUploadSource {
    store: Arc<dyn KeyValueStore>,
}

impl PromotedUploadSource {
    /// Read from the uploaded-demo staging slot of `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProductSource for PromotedUploadSource {
    fn name(&self) -> &'static str {
        "uploaded"
    }

    async fn resolve(&self) -> Option<Resolution> {
        Some(Resolution {
            data: slot(self.store.as_ref(), keys::UPLOADED_DEMO)?,
            disposition: Disposition::PromoteToUser,
        })
    }
}

/// Priority 3: the cached demo catalog.
pub struct CachedDemoSource {
    store: Arc<dyn KeyValueStore>,
}

impl CachedDemoSource {
    /// Read from the demo cache slot of `store`.
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ProductSource for CachedDemoSource {
    fn name(&self) -> &'static str {
        "demo-cache"
    }

    async fn resolve(&self) -> Option<Resolution> {
        Some(Resolution {
            data: slot(self.store.as_ref(), keys::DEMO_PRODUCTS)?,
            disposition: Disposition::None,
        })
    }
}

/// Priority 4: the remote JSON catalog; a hit is cached into the demo slot.
pub struct RemoteSource {
    fetcher: Arc<dyn CatalogFetcher>,
}

impl RemoteSource {
    /// Fetch through `fetcher`.
    #[must_use]
    pub fn new(fetcher: Arc<dyn CatalogFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ProductSource for RemoteSource {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn resolve(&self) -> Option<Resolution> {
        let data = match self.fetcher.fetch().await {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(%error, "could not fetch remote catalog");
                return None;
            }
        };

        if !data.is_usable() {
            return None;
        }

        Some(Resolution {
            data,
            disposition: Disposition::CacheDemo,
        })
    }
}

/// Priority 5: the built-in fallback list; cached into the demo slot.
pub struct BuiltinSource;

#[async_trait]
impl ProductSource for BuiltinSource {
    fn name(&self) -> &'static str {
        "builtin"
    }

    async fn resolve(&self) -> Option<Resolution> {
        Some(Resolution {
            data: demo_products(),
            disposition: Disposition::CacheDemo,
        })
    }
}

impl std::fmt::Debug for UserSlotSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserSlotSource").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for PromotedUploadSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PromotedUploadSource").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for CachedDemoSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedDemoSource").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for RemoteSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteSource").finish_non_exhaustive()
    }
}

impl std::fmt::Debug for BuiltinSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuiltinSource").finish()
    }
}
