// Local persistence
// A single key-value table backs the session record, app settings and every
// tab's workbench namespace

pub mod database;
pub mod crud;
pub mod kv;
pub mod memory;
pub mod scoped;
pub mod state;

pub use database::{DatabaseManager, StorageError, StorageResult, get_default_db_path};
pub use kv::KeyValueStore;
pub use memory::MemoryStore;
pub use scoped::{TabStorage, copy_namespace, tab_storage_prefix, PERSIST_HEADERS_KEY};
pub use state::{AppSettings, init_default_settings};
