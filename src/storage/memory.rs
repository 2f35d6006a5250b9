//! In-memory store
//!
//! The default backend for tests and single-run demos. Cloning a handle
//! models opening the same origin in a second browser tab: both handles
//! share the data, and each sees the other's changes through its watcher.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use super::{ChangeBus, KeyValueStore, StoreError, StoreWatcher};

#[derive(Debug)]
struct Inner {
    data: Mutex<HashMap<String, String>>,
    bus: ChangeBus,
    next_context: AtomicU64,
    /// Total bytes of keys and values this store will hold, when limited.
    capacity: Option<usize>,
}

/// Shared in-memory key-value store.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Arc<Inner>,
    context: u64,
}

impl MemoryStore {
    /// An unbounded store.
    #[must_use]
    pub fn new() -> Self {
        Self::build(None)
    }

    /// A store that reports [`StoreError::QuotaExceeded`] once the summed
    /// size of keys and values would exceed `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::build(Some(capacity))
    }

    fn build(capacity: Option<usize>) -> Self {
        Self {
            inner: Arc::new(Inner {
                data: Mutex::new(HashMap::new()),
                bus: ChangeBus::default(),
                next_context: AtomicU64::new(1),
                capacity,
            }),
            context: 0,
        }
    }

    fn used_bytes(data: &HashMap<String, String>) -> usize {
        data.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for MemoryStore {
    /// Open a new context over the same data, as a second tab would.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            context: self.inner.next_context.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.inner.data.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        {
            let mut data = self
                .inner
                .data
                .lock()
                .map_err(|_| StoreError::QuotaExceeded)?;

            if let Some(capacity) = self.inner.capacity {
                let existing = data.get(key).map(String::len).unwrap_or_default();
                let projected =
                    Self::used_bytes(&data) - existing + key.len() + value.len();
                if projected > capacity {
                    return Err(StoreError::QuotaExceeded);
                }
            }

            data.insert(key.to_owned(), value.to_owned());
        }

        self.inner.bus.publish(self.context, key);

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = match self.inner.data.lock() {
            Ok(mut data) => data.remove(key).is_some(),
            Err(_) => false,
        };

        if removed {
            self.inner.bus.publish(self.context, key);
        }

        Ok(())
    }

    fn subscribe(&self) -> StoreWatcher {
        self.inner.bus.subscribe(self.context)
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn set_get_remove() -> TestResult {
        let store = MemoryStore::new();

        store.set("a", "1")?;
        assert_eq!(store.get("a").as_deref(), Some("1"));

        store.remove("a")?;
        assert_eq!(store.get("a"), None);

        // Removing again is a no-op, not an error.
        store.remove("a")?;

        Ok(())
    }

    #[test]
    fn quota_exceeded_when_full() -> TestResult {
        let store = MemoryStore::with_capacity(10);

        store.set("k", "12345")?;

        let result = store.set("big", "1234567890");
        assert!(
            matches!(result, Err(StoreError::QuotaExceeded)),
            "expected QuotaExceeded, got {result:?}"
        );

        // Freeing space makes the write possible.
        store.remove("k")?;
        store.set("big", "123456")?;

        Ok(())
    }

    #[test]
    fn overwriting_counts_only_the_new_value() -> TestResult {
        let store = MemoryStore::with_capacity(8);

        store.set("k", "1234567")?;
        store.set("k", "7654321")?;

        Ok(())
    }

    #[test]
    fn changes_visible_to_other_contexts_only() -> TestResult {
        let tab_a = MemoryStore::new();
        let tab_b = tab_a.clone();

        let watcher_a = tab_a.subscribe();
        let watcher_b = tab_b.subscribe();

        tab_a.set("cart", "[]")?;

        assert_eq!(
            watcher_b.try_next().map(|c| c.key),
            Some("cart".to_owned()),
            "other tab sees the change"
        );
        assert_eq!(
            watcher_a.try_next(),
            None,
            "writing tab does not signal itself"
        );

        Ok(())
    }

    #[test]
    fn remove_of_absent_key_does_not_signal() -> TestResult {
        let tab_a = MemoryStore::new();
        let tab_b = tab_a.clone();
        let watcher_b = tab_b.subscribe();

        tab_a.remove("nothing")?;

        assert_eq!(watcher_b.try_next(), None);

        Ok(())
    }

    #[test]
    fn clones_share_data() -> TestResult {
        let tab_a = MemoryStore::new();
        let tab_b = tab_a.clone();

        tab_a.set("k", "v")?;

        assert_eq!(tab_b.get("k").as_deref(), Some("v"));

        Ok(())
    }
}
