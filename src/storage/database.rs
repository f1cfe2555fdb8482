// Database connection manager for local SQLite storage
// Handles app data directory resolution and the app_state key-value table

use rusqlite::{Connection, Result as SqliteResult};
use std::path::PathBuf;
use std::sync::Mutex;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Failed to get app data directory")]
    AppDataDir,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Storage lock poisoned")]
    LockPoisoned,
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Database manager for local SQLite storage
pub struct DatabaseManager {
    connection: Mutex<Connection>,
    db_path: PathBuf,
}

impl DatabaseManager {
    /// Create a new database manager with the given database path
    pub fn new(db_path: PathBuf) -> StorageResult<Self> {
        // Ensure parent directory exists
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let connection = Connection::open(&db_path)?;

        let manager = Self {
            connection: Mutex::new(connection),
            db_path,
        };

        manager.init_schema()?;

        Ok(manager)
    }

    /// Get the database path
    pub fn db_path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Initialize the database schema
    fn init_schema(&self) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.execute_batch(
                r#"
                -- App state table: durable key-value store shared by the session
                -- record, app settings and every tab's workbench namespace
                CREATE TABLE IF NOT EXISTS app_state (
                    key TEXT PRIMARY KEY,
                    value TEXT NOT NULL,
                    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
                );
                "#,
            )
        })
    }

    /// Execute a function with database connection access
    pub fn with_connection<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&Connection) -> SqliteResult<T>,
    {
        let conn = self.connection.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&conn).map_err(StorageError::from)
    }

    /// Execute a function with mutable database connection access
    pub fn with_connection_mut<F, T>(&self, f: F) -> StorageResult<T>
    where
        F: FnOnce(&mut Connection) -> SqliteResult<T>,
    {
        let mut conn = self.connection.lock().map_err(|_| StorageError::LockPoisoned)?;
        f(&mut conn).map_err(StorageError::from)
    }
}

/// Get the default database path in the app data directory
pub fn get_default_db_path() -> StorageResult<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "graphiql-desktop", "graphiql-desktop")
        .ok_or(StorageError::AppDataDir)?;

    let data_dir = proj_dirs.data_dir();
    Ok(data_dir.join("graphiql-desktop.db"))
}
