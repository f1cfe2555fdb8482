// App settings management
// Settings live in the same key-value store as the session, one key per setting

use serde::{Deserialize, Serialize};

use super::database::StorageResult;
use super::kv::KeyValueStore;

const CLEAR_TAB_STORAGE_ON_REMOVE: &str = "clear_tab_storage_on_remove";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// Wipe a tab's workbench namespace when the tab is closed. Off by default,
    /// which leaves closed tabs' history in the store.
    pub clear_tab_storage_on_remove: bool,
}

impl AppSettings {
    /// Read settings from the store, falling back to defaults for missing keys
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<Self> {
        Ok(Self {
            clear_tab_storage_on_remove: get_bool_setting(store, CLEAR_TAB_STORAGE_ON_REMOVE, false)?,
        })
    }

    /// Write every setting to the store
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> StorageResult<()> {
        set_bool_setting(store, CLEAR_TAB_STORAGE_ON_REMOVE, self.clear_tab_storage_on_remove)
    }
}

fn get_bool_setting<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    default: bool,
) -> StorageResult<bool> {
    let value = store.get_item(key)?;
    Ok(match value.as_deref() {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    })
}

fn set_bool_setting<S: KeyValueStore + ?Sized>(
    store: &S,
    key: &str,
    value: bool,
) -> StorageResult<()> {
    store.set_item(key, if value { "true" } else { "false" })
}

/// Initialize default settings if they don't exist
pub fn init_default_settings<S: KeyValueStore + ?Sized>(store: &S) -> StorageResult<()> {
    if store.get_item(CLEAR_TAB_STORAGE_ON_REMOVE)?.is_none() {
        store.set_item(CLEAR_TAB_STORAGE_ON_REMOVE, "false")?;
    }
    Ok(())
}
