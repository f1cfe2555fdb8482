// Tab-scoped storage
// Gives each tab's workbench its own namespace inside the shared key-value store

use super::database::StorageResult;
use super::kv::KeyValueStore;

/// Prefix shared by every tab namespace; the tab id and a `:` follow it.
pub const TAB_STORAGE_PREFIX: &str = "graphiql-tab-";

/// Workbench flag controlling whether request headers survive reloads.
pub const PERSIST_HEADERS_KEY: &str = "graphiql:shouldPersistHeaders";

/// Namespace prefix for a tab, e.g. `graphiql-tab-<id>:`
pub fn tab_storage_prefix(tab_id: &str) -> String {
    format!("{}{}:", TAB_STORAGE_PREFIX, tab_id)
}

/// Copy every entry in one tab's namespace into another's. Values are copied
/// verbatim and the source namespace is left as it was.
pub fn copy_namespace<S>(store: &S, from_tab_id: &str, to_tab_id: &str) -> StorageResult<usize>
where
    S: KeyValueStore + ?Sized,
{
    store.copy_prefix(&tab_storage_prefix(from_tab_id), &tab_storage_prefix(to_tab_id))
}

/// A view of `store` restricted to one tab's keys, with the prefix stripped.
pub struct TabStorage<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    prefix: String,
}

impl<'a, S: KeyValueStore + ?Sized> TabStorage<'a, S> {
    /// Open the namespace for `tab_id`, turning header persistence on if the
    /// workbench has never recorded a choice for this tab.
    pub fn new(store: &'a S, tab_id: &str) -> StorageResult<Self> {
        let storage = Self {
            store,
            prefix: tab_storage_prefix(tab_id),
        };

        if storage.get_item(PERSIST_HEADERS_KEY)?.is_none() {
            storage.set_item(PERSIST_HEADERS_KEY, "true")?;
        }

        Ok(storage)
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn scoped(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key)
    }
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for TabStorage<'_, S> {
    fn get_item(&self, key: &str) -> StorageResult<Option<String>> {
        self.store.get_item(&self.scoped(key))
    }

    fn set_item(&self, key: &str, value: &str) -> StorageResult<()> {
        self.store.set_item(&self.scoped(key), value)
    }

    fn remove_item(&self, key: &str) -> StorageResult<()> {
        self.store.remove_item(&self.scoped(key))
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        Ok(self
            .store
            .keys_with_prefix(&self.prefix)?
            .into_iter()
            .map(|k| k[self.prefix.len()..].to_string())
            .collect())
    }

    fn keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        let full = self.scoped(prefix);
        Ok(self
            .store
            .keys_with_prefix(&full)?
            .into_iter()
            .map(|k| k[self.prefix.len()..].to_string())
            .collect())
    }

    fn remove_with_prefix(&self, prefix: &str) -> StorageResult<usize> {
        self.store.remove_with_prefix(&self.scoped(prefix))
    }

    fn copy_prefix(&self, from: &str, to: &str) -> StorageResult<usize> {
        self.store.copy_prefix(&self.scoped(from), &self.scoped(to))
    }

    fn clear(&self) -> StorageResult<()> {
        self.store.remove_with_prefix(&self.prefix).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{DatabaseManager, MemoryStore};
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicU32, Ordering};

    static TEST_COUNTER: AtomicU32 = AtomicU32::new(0);

    fn create_test_db() -> (DatabaseManager, PathBuf) {
        let counter = TEST_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_path = std::env::temp_dir().join(format!(
            "graphiql_desktop_scoped_test_{}_{}.db",
            std::process::id(),
            counter
        ));
        let _ = std::fs::remove_file(&db_path);
        let manager = DatabaseManager::new(db_path.clone()).unwrap();
        (manager, db_path)
    }

    #[test]
    fn test_prefix_format() {
        assert_eq!(tab_storage_prefix("abc"), "graphiql-tab-abc:");
    }

    #[test]
    fn test_new_enables_header_persistence() {
        let store = MemoryStore::new();
        let storage = TabStorage::new(&store, "t1").unwrap();

        assert_eq!(
            store.get_item("graphiql-tab-t1:graphiql:shouldPersistHeaders").unwrap().as_deref(),
            Some("true")
        );
        assert_eq!(storage.keys().unwrap(), vec![PERSIST_HEADERS_KEY]);
    }

    #[test]
    fn test_new_keeps_existing_header_choice() {
        let store = MemoryStore::new();
        store
            .set_item("graphiql-tab-t1:graphiql:shouldPersistHeaders", "false")
            .unwrap();

        let storage = TabStorage::new(&store, "t1").unwrap();
        assert_eq!(storage.get_item(PERSIST_HEADERS_KEY).unwrap().as_deref(), Some("false"));
    }

    #[test]
    fn test_namespaces_are_isolated() {
        let store = MemoryStore::new();
        let a = TabStorage::new(&store, "a").unwrap();
        let b = TabStorage::new(&store, "b").unwrap();

        a.set_item("graphiql:query", "{ a }").unwrap();
        b.set_item("graphiql:query", "{ b }").unwrap();
        store.set_item("unrelated", "x").unwrap();

        assert_eq!(a.get_item("graphiql:query").unwrap().as_deref(), Some("{ a }"));
        assert_eq!(b.get_item("graphiql:query").unwrap().as_deref(), Some("{ b }"));
        assert_eq!(a.len().unwrap(), 2);

        a.remove_item("graphiql:query").unwrap();
        assert_eq!(a.get_item("graphiql:query").unwrap(), None);
        assert_eq!(b.get_item("graphiql:query").unwrap().as_deref(), Some("{ b }"));
    }

    #[test]
    fn test_clear_only_touches_own_prefix() {
        let store = MemoryStore::new();
        let a = TabStorage::new(&store, "a").unwrap();
        let ab = TabStorage::new(&store, "ab").unwrap();
        a.set_item("k", "1").unwrap();
        ab.set_item("k", "2").unwrap();
        store.set_item("graphiql-desktop-tabs", "{}").unwrap();

        a.clear().unwrap();

        assert!(a.is_empty().unwrap());
        assert_eq!(ab.get_item("k").unwrap().as_deref(), Some("2"));
        assert_eq!(store.get_item("graphiql-desktop-tabs").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_key_by_index_strips_prefix() {
        let store = MemoryStore::new();
        let storage = TabStorage::new(&store, "t").unwrap();
        storage.set_item("a", "1").unwrap();

        assert_eq!(storage.key(0).unwrap().as_deref(), Some("a"));
        assert_eq!(storage.key(1).unwrap().as_deref(), Some(PERSIST_HEADERS_KEY));
        assert_eq!(storage.key(2).unwrap(), None);
    }

    #[test]
    fn test_copy_namespace() {
        let store = MemoryStore::new();
        let src = TabStorage::new(&store, "src").unwrap();
        src.set_item("graphiql:tabState", "{\"tabs\":[]}").unwrap();
        src.set_item("graphiql:queries", "[]").unwrap();

        let copied = copy_namespace(&store, "src", "dst").unwrap();
        assert_eq!(copied, 3);

        let dst = TabStorage::new(&store, "dst").unwrap();
        assert_eq!(dst.keys().unwrap(), src.keys().unwrap());
        for key in src.keys().unwrap() {
            assert_eq!(dst.get_item(&key).unwrap(), src.get_item(&key).unwrap());
        }
        assert_eq!(src.len().unwrap(), 3);
    }

    #[test]
    fn test_scoped_storage_over_sqlite() {
        let (manager, db_path) = create_test_db();

        let storage = TabStorage::new(&manager, "tab-1").unwrap();
        storage.set_item("graphiql:headers", "{}").unwrap();
        assert_eq!(
            storage.keys().unwrap(),
            vec!["graphiql:headers", "graphiql:shouldPersistHeaders"]
        );

        assert_eq!(copy_namespace(&manager, "tab-1", "tab-2").unwrap(), 2);
        let copy = TabStorage::new(&manager, "tab-2").unwrap();
        assert_eq!(copy.get_item("graphiql:headers").unwrap().as_deref(), Some("{}"));

        storage.clear().unwrap();
        assert!(storage.is_empty().unwrap());
        assert_eq!(copy.len().unwrap(), 2);

        let _ = std::fs::remove_file(&db_path);
    }
}
