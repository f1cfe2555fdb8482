// Session management: tabs, the active tab, and persistence of both

pub mod model;
pub mod store;
pub mod tab;

use thiserror::Error;

use crate::storage::StorageError;

pub use model::Session;
pub use store::{TabStore, SESSION_BACKUP_KEY, SESSION_KEY};
pub use tab::{Tab, TabUpdate};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Could not save session: {0}")]
    Save(#[source] StorageError),
    #[error("Could not load session: {0}")]
    Load(#[source] StorageError),
    #[error("Could not update tab storage: {0}")]
    TabStorage(#[source] StorageError),
    #[error("Session encoding error: {0}")]
    Encoding(#[from] serde_json::Error),
}
