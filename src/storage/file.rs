//! File-backed store
//!
//! Persists the key-value map as a single JSON document on disk, so a demo
//! profile survives restarts. Change signals reach other handles within the
//! same process only; two separate processes writing the same file race
//! last-write-wins, the same accepted limitation the in-browser original
//! has across tabs.

use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    sync::{
        Arc, Mutex,
        atomic::{AtomicU64, Ordering},
    },
};

use super::{ChangeBus, KeyValueStore, StoreError, StoreWatcher};

#[derive(Debug)]
struct Inner {
    path: PathBuf,
    data: Mutex<HashMap<String, String>>,
    bus: ChangeBus,
    next_context: AtomicU64,
    capacity: Option<usize>,
}

/// Key-value store persisted to a JSON file.
#[derive(Debug)]
pub struct FileStore {
    inner: Arc<Inner>,
    context: u64,
}

impl FileStore {
    /// Open or create the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        Self::open_with_capacity(path, None)
    }

    /// Open the store with a byte quota over keys and values.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the file exists but cannot be read or
    /// parsed.
    pub fn open_with_capacity(
        path: impl AsRef<Path>,
        capacity: Option<usize>,
    ) -> Result<Self, StoreError> {
        let path = path.as_ref().to_path_buf();

        let data = if path.exists() {
            let raw = fs::read_to_string(&path)?;
            serde_json::from_str(&raw)?
        } else {
            HashMap::new()
        };

        Ok(Self {
            inner: Arc::new(Inner {
                path,
                data: Mutex::new(data),
                bus: ChangeBus::default(),
                next_context: AtomicU64::new(1),
                capacity,
            }),
            context: 0,
        })
    }

    fn flush(&self, data: &HashMap<String, String>) -> Result<(), StoreError> {
        let raw = serde_json::to_string(data)?;

        // Write-then-rename so a crash mid-write never corrupts the store.
        let tmp = self.inner.path.with_extension("tmp");
        fs::write(&tmp, raw)?;
        fs::rename(&tmp, &self.inner.path)?;

        Ok(())
    }

    fn used_bytes(data: &HashMap<String, String>) -> usize {
        data.iter().map(|(k, v)| k.len() + v.len()).sum()
    }
}

impl Clone for FileStore {
    /// Open a new context over the same data, as a second view would.
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            context: self.inner.next_context.fetch_add(1, Ordering::Relaxed),
        }
    }
}

impl KeyValueStore for FileStore {
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
            self.flush(&data)?;
        }

        self.inner.bus.publish(self.context, key);

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StoreError> {
        let removed = {
            let mut data = self
                .inner
                .data
                .lock()
                .map_err(|_| StoreError::QuotaExceeded)?;

            let removed = data.remove(key).is_some();
            if removed {
                self.flush(&data)?;
            }
            removed
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
    fn survives_reopen() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        {
            let store = FileStore::open(&path)?;
            store.set("cart", "[{\"id\":\"1\"}]")?;
        }

        let reopened = FileStore::open(&path)?;
        assert_eq!(reopened.get("cart").as_deref(), Some("[{\"id\":\"1\"}]"));

        Ok(())
    }

    #[test]
    fn remove_persists() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        let store = FileStore::open(&path)?;
        store.set("k", "v")?;
        store.remove("k")?;

        let reopened = FileStore::open(&path)?;
        assert_eq!(reopened.get("k"), None);

        Ok(())
    }

    #[test]
    fn corrupt_file_is_an_error() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");
        fs::write(&path, "{broken")?;

        let result = FileStore::open(&path);
        assert!(
            matches!(result, Err(StoreError::Encoding(_))),
            "expected Encoding error, got {:?}",
            result.err()
        );

        Ok(())
    }

    #[test]
    fn quota_applies_to_file_store() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        let store = FileStore::open_with_capacity(&path, Some(4))?;

        let result = store.set("key", "toolong");
        assert!(
            matches!(result, Err(StoreError::QuotaExceeded)),
            "expected QuotaExceeded, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn cross_handle_signal() -> TestResult {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("store.json");

        let view_a = FileStore::open(&path)?;
        let view_b = view_a.clone();
        let watcher = view_b.subscribe();

        view_a.set("prefs", "{}")?;

        assert_eq!(watcher.try_next().map(|c| c.key), Some("prefs".to_owned()));

        Ok(())
    }
}
