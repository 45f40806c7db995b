// Key-value entry operations for the local store
// Entries hold JSON-encoded text under string keys, localStorage-style

use rusqlite::{params, OptionalExtension};

use super::database::{DatabaseManager, StorageResult};

impl DatabaseManager {
    /// Get an entry from the local store
    pub fn get_entry(&self, key: &str) -> StorageResult<Option<String>> {
        self.with_connection(|conn| {
            let value: Option<String> = conn
                .query_row(
                    "SELECT value FROM local_store WHERE key = ?1",
                    params![key],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(value)
        })
    }

    /// Set an entry in the local store, replacing any previous value
    pub fn set_entry(&self, key: &str, value: &str) -> StorageResult<()> {
        self.with_connection(|conn| {
            conn.execute(
                r#"
                INSERT INTO local_store (key, value, updated_at)
                VALUES (?1, ?2, datetime('now'))
                ON CONFLICT(key) DO UPDATE SET
                    value = excluded.value,
                    updated_at = excluded.updated_at
                "#,
                params![key, value],
            )?;
            Ok(())
        })
    }

    /// Delete an entry from the local store
    pub fn delete_entry(&self, key: &str) -> StorageResult<bool> {
        self.with_connection(|conn| {
            let rows_affected =
                conn.execute("DELETE FROM local_store WHERE key = ?1", params![key])?;
            Ok(rows_affected > 0)
        })
    }

    /// Get all entry keys in the local store
    pub fn entry_keys(&self) -> StorageResult<Vec<String>> {
        self.with_connection(|conn| {
            let mut stmt = conn.prepare("SELECT key FROM local_store ORDER BY key")?;
            let keys = stmt
                .query_map([], |row| row.get(0))?
                .filter_map(|r| r.ok())
                .collect();
            Ok(keys)
        })
    }
}
