// In-process key-value store, for tests and sessions that should not touch disk

use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use super::database::{StorageError, StorageResult};
use super::kv::KeyValueStore;

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> StorageResult<MutexGuard<'_, BTreeMap<String, String>>> {
        self.entries.lock().map_err(|_| StorageError::LockPoisoned)
    }
}

impl KeyValueStore for MemoryStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries()?.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.entries()?.remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self.entries()?.keys().cloned().collect())
    }

    fn clear(&self) -> StorageResult<()> {
        self.entries()?.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let store = MemoryStore::new();
        assert!(store.is_empty().unwrap());

        store.set_item("b", "2").unwrap();
        store.set_item("a", "1").unwrap();
        assert_eq!(store.get_item("a").unwrap().as_deref(), Some("1"));
        assert_eq!(store.keys().unwrap(), vec!["a", "b"]);
        assert_eq!(store.key(1).unwrap().as_deref(), Some("b"));
        assert_eq!(store.key(2).unwrap(), None);
        assert_eq!(store.len().unwrap(), 2);

        store.remove_item("a").unwrap();
        assert_eq!(store.get_item("a").unwrap(), None);

        store.clear().unwrap();
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn test_default_prefix_helpers() {
        let store = MemoryStore::new();
        store.set_item("x:1", "one").unwrap();
        store.set_item("x:2", "").unwrap();
        store.set_item("y:1", "other").unwrap();

        assert_eq!(store.copy_prefix("x:", "z:").unwrap(), 2);
        assert_eq!(store.get_item("z:1").unwrap().as_deref(), Some("one"));
        // Empty values are copied too
        assert_eq!(store.get_item("z:2").unwrap().as_deref(), Some(""));

        assert_eq!(store.remove_with_prefix("x:").unwrap(), 2);
        assert_eq!(store.keys().unwrap(), vec!["y:1", "z:1", "z:2"]);
    }
}
