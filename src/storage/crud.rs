// Row-level access to the `app_state` table: the session record, settings and
// every tab's `graphiql-tab-<id>:` namespace live here as plain key/value rows

use rusqlite::{params, Connection, OptionalExtension, ToSql};
use super::database::{DatabaseManager, StorageResult};

/// Keys matching `sql`, in the order the query returns them. Row errors are
/// propagated rather than skipped.
fn query_keys(conn: &Connection, sql: &str, args: &[&dyn ToSql]) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(args, |row| row.get(0))?;
    rows.collect()
}

impl DatabaseManager {
    /// Value stored under `key`, if any
    pub fn get_state(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_connection(|conn| {
            conn.query_row(
                "SELECT value FROM app_state WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()
        })
    }

    /// Insert or overwrite `key`, stamping `updated_at`
    pub fn set_state(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![key, value],
            )?;
            Ok(())
        })
    }

    /// Delete `key`; true if a row was removed
    pub fn delete_state(&self, key: &str) -> StorageResult<bool> {
        self.with_connection(|conn| {
            let rows_affected = conn.execute(
                "DELETE FROM app_state WHERE key = ?1",
                params![key],
            )?;
            Ok(rows_affected > 0)
        })
    }

    /// Every key in the table, sorted
    pub fn get_all_state_keys(&self) -> StorageResult<Vec<String>> {
        self.with_connection(|conn| query_keys(conn, "SELECT key FROM app_state ORDER BY key", &[]))
    }

    /// Get all app state keys starting with `prefix`.
    ///
    /// Uses `substr` rather than `LIKE` so `%` and `_` in a prefix match literally.
    pub fn get_state_keys_with_prefix(&self, prefix: &str) -> StorageResult<Vec<String>> {
        self.with_connection(|conn| {
            query_keys(
                conn,
                "SELECT key FROM app_state WHERE substr(key, 1, length(?1)) = ?1 ORDER BY key",
                params![prefix],
            )
        })
    }

    /// Delete every app state key starting with `prefix`
    pub fn delete_state_with_prefix(&self, prefix: &str) -> StorageResult<usize> {
        self.with_connection(|conn| {
            conn.execute(
                "DELETE FROM app_state WHERE substr(key, 1, length(?1)) = ?1",
                params![prefix],
            )
        })
    }

    /// Copy every key under `from_prefix` to the same suffix under `to_prefix`.
    /// Existing destination keys are overwritten; source keys are left alone.
    pub fn copy_state_prefix(&self, from_prefix: &str, to_prefix: &str) -> StorageResult<usize> {
        self.with_connection_mut(|conn| {
            let tx = conn.transaction()?;
            let copied = tx.execute(
                r#"
                INSERT INTO app_state (key, value, updated_at)
                SELECT ?2 || substr(key, length(?1) + 1), value, datetime('now')
                FROM app_state
                WHERE substr(key, 1, length(?1)) = ?1
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = datetime('now')
                "#,
                params![from_prefix, to_prefix],
            )?;
            tx.commit()?;
            Ok(copied)
        })
    }
}
