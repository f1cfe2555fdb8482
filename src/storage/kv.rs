// Key-value store abstraction
// Shaped like the web Storage API so the workbench can be handed any implementation

use super::database::{DatabaseManager, StorageResult};

/// A synchronous, string-keyed store.
///
/// `keys` returns keys in ascending order for every implementation in this crate,
/// which makes `key(index)` stable between calls as long as nothing is written.
pub trait KeyValueStore {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>>;

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()>;

    fn remove_item(&self, key: &str) -> StorageResult<()>;

    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Every key starting with `prefix`, prefix included.
    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        Ok(self
            .keys()?
            .into_iter()
            .filter(|k| k.starts_with(prefix))
            .collect())
    }

    /// Remove every key starting with `prefix`. Returns how many were removed.
    fn remove_with_prefix(&self, prefix: &str) -> StorageResult<usize> {
        let keys = self.keys_with_prefix(prefix)?;
        for key in &keys {
            self.remove_item(key)?;
        }
        Ok(keys.len())
    }

    /// Copy every key under `from` to the same suffix under `to`. Source keys are kept.
    fn copy_prefix(&self, from: &str, to: &str) -> StorageResult<usize> {
        let keys = self.keys_with_prefix(from)?;
        let mut copied = 0;
        for key in keys {
            if let Some(value) = self.get_item(&key)? {
                self.set_item(&format!("{}{}", to, &key[from.len()..]), &value)?;
                copied += 1;
            }
        }
        Ok(copied)
    }

    fn clear(&self) -> StorageResult<()> {
        self.remove_with_prefix("").map(|_| ())
    }

    fn key(&self, index: usize) -> StorageResult<Option<String>> {
        Ok(self.keys()?.into_iter().nth(index))
    }

    fn len(&self) -> StorageResult<usize> {
        Ok(self.keys()?.len())
    }

    fn is_empty(&self) -> StorageResult<bool> {
        Ok(self.len()? == 0)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &S {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        (**self).remove_item(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        (**self).keys_with_prefix(prefix)
    }

    fn remove_with_prefix(&self, prefix: &str) -> StorageResult<usize> {
        (**self).remove_with_prefix(prefix)
    }

    fn copy_prefix(&self, from: &str, to: &str) -> StorageResult<usize> {
        (**self).copy_prefix(from, to)
    }

    fn clear(&self) -> StorageResult<()> {
        (**self).clear()
    }
}

impl KeyValueStore for DatabaseManager {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.get_state(key)
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.set_state(key, value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.delete_state(key).map(|_| ())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.get_all_state_keys()
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.get_state_keys_with_prefix(prefix)
    }

    fn remove_with_prefix(&self, prefix: &str) -> StorageResult<usize> {
        self.delete_state_with_prefix(prefix)
    }

    fn copy_prefix(&self, from: &str, to: &str) -> StorageResult<usize> {
        self.copy_state_prefix(from, to)
    }
}
