//! Storage
//!
//! A small key-value persistence layer with the semantics of browser local
//! storage: string keys, JSON blob values, a quota that can run out, and a
//! change signal delivered to *other* execution contexts when a key is
//! written.
//!
//! Consumers subscribe to changes explicitly through [`KeyValueStore::subscribe`]
//! rather than listening on an ambient global event.

use std::sync::{
    Mutex,
    mpsc::{Receiver, Sender, channel},
};

use serde::{Serialize, de::DeserializeOwned};
use thiserror::Error;

pub mod file;
pub mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

/// Errors surfaced by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store is out of space.
    #[error("storage quota exceeded")]
    QuotaExceeded,

    /// The backing file could not be read or written.
    #[error("storage backend error")]
    Io(#[from] std::io::Error),

    /// A value could not be encoded for persistence.
    #[error("value could not be encoded")]
    Encoding(#[from] serde_json::Error),
}

/// A change made to the store by another execution context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreChange {
    /// The key that was written or removed.
    pub key: String,
}

/// A subscription to store changes made by other contexts.
///
/// Dropping the watcher ends the subscription.
#[derive(Debug)]
pub struct StoreWatcher {
    rx: Receiver<StoreChange>,
}

impl StoreWatcher {
    pub(crate) fn new(rx: Receiver<StoreChange>) -> Self {
        Self { rx }
    }

    /// The next pending change, if any.
    pub fn try_next(&self) -> Option<StoreChange> {
        self.rx.try_recv().ok()
    }

    /// Drain every pending change.
    pub fn drain(&self) -> Vec<StoreChange> {
        std::iter::from_fn(|| self.try_next()).collect()
    }
}

/// Key-value persistence with external change signals.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value stored under `key`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write `value` under `key`, notifying other contexts.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::QuotaExceeded`] when the store is full, or an
    /// IO error for file-backed stores.
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;

    /// Remove `key`, notifying other contexts. Removing an absent key is
    /// not an error.
    fn remove(&self, key: &str) -> Result<(), StoreError>;

    /// Subscribe to changes made through *other* handles of this store.
    fn subscribe(&self) -> StoreWatcher;
}

/// Read and decode a JSON blob.
///
/// A missing key and a corrupt blob are both treated as "absent": the
/// fallback chains in the catalog and cart recover from bad data rather
/// than surfacing it.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = store.get(key)?;

    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            tracing::warn!(key, %error, "discarding corrupt stored blob");
            None
        }
    }
}

/// Encode and write a JSON blob.
///
/// # Errors
///
/// Returns a [`StoreError`] if encoding or the underlying write fails.
pub fn set_json<T: Serialize>(
    store: &dyn KeyValueStore,
    key: &str,
    value: &T,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}

/// Fan-out of change notifications to subscribed watchers.
///
/// Each store handle carries a context id; a change is delivered only to
/// watchers subscribed from *other* contexts, mirroring how the browser
/// `storage` event fires in every tab except the one that wrote.
#[derive(Debug, Default)]
pub(crate) struct ChangeBus {
    subscribers: Mutex<Vec<(u64, Sender<StoreChange>)>>,
}

impl ChangeBus {
    pub(crate) fn subscribe(&self, context: u64) -> StoreWatcher {
        let (tx, rx) = channel();
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push((context, tx));
        }
        StoreWatcher::new(rx)
    }

    pub(crate) fn publish(&self, origin: u64, key: &str) {
        let Ok(mut subscribers) = self.subscribers.lock() else {
            return;
        };

        subscribers.retain(|(context, tx)| {
            if *context == origin {
                return true;
            }
            tx.send(StoreChange {
                key: key.to_owned(),
            })
            .is_ok()
        });
    }
}
