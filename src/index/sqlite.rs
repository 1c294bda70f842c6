//! SQLite-backed snapshot store.

use crate::index::schema::{
    BACKLINK_INDEX_KEY, FINGERPRINTS_KEY, LINK_INDEX_KEY, TAG_INDEX_KEY, create_schema,
};
use crate::index::{IndexError, IndexResult, IndexSnapshot, SnapshotStore};
use rusqlite::{Connection, OptionalExtension, params};
use std::fs;
use std::path::Path;

/// Snapshot store keeping each index as a JSON value in a key-value table.
pub struct SqliteSnapshotStore {
    conn: Connection,
}

impl SqliteSnapshotStore {
    /// Opens an in-memory store.
    ///
    /// This is useful for testing and temporary indexes that don't need persistence.
    pub fn open_in_memory() -> IndexResult<Self> {
        let conn = Connection::open_in_memory()?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Opens or creates a store at the given path.
    ///
    /// Creates parent directories if they don't exist.
    pub fn open(path: &Path) -> IndexResult<Self> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent).map_err(|e| IndexError::Io {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let conn = Connection::open(path)?;
        create_schema(&conn)?;
        Ok(Self { conn })
    }

    /// Removes any stored snapshot.
    pub fn clear(&mut self) -> IndexResult<()> {
        self.conn.execute("DELETE FROM index_cache", [])?;
        Ok(())
    }

    fn get(&self, key: &str) -> IndexResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM index_cache WHERE key = ?1",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }
}

impl SnapshotStore for SqliteSnapshotStore {
    fn load(&self) -> IndexResult<Option<IndexSnapshot>> {
        let (Some(tags), Some(links), Some(backlinks), Some(fingerprints)) = (
            self.get(TAG_INDEX_KEY)?,
            self.get(LINK_INDEX_KEY)?,
            self.get(BACKLINK_INDEX_KEY)?,
            self.get(FINGERPRINTS_KEY)?,
        ) else {
            return Ok(None);
        };

        Ok(Some(IndexSnapshot {
            tags: serde_json::from_str(&tags)?,
            links: serde_json::from_str(&links)?,
            backlinks: serde_json::from_str(&backlinks)?,
            fingerprints: serde_json::from_str(&fingerprints)?,
        }))
    }

    fn save(&mut self, snapshot: &IndexSnapshot) -> IndexResult<()> {
        let parts = [
            (TAG_INDEX_KEY, serde_json::to_string(&snapshot.tags)?),
            (LINK_INDEX_KEY, serde_json::to_string(&snapshot.links)?),
            (BACKLINK_INDEX_KEY, serde_json::to_string(&snapshot.backlinks)?),
            (FINGERPRINTS_KEY, serde_json::to_string(&snapshot.fingerprints)?),
        ];

        let tx = self.conn.transaction()?;
        for (key, value) in &parts {
            tx.execute(
                "INSERT INTO index_cache (key, value) VALUES (?1, ?2)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value",
                params![key, value],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::BTreeSet;
    use tempfile::TempDir;

    fn sample_snapshot() -> IndexSnapshot {
        let mut snapshot = IndexSnapshot::default();
        snapshot
            .tags
            .insert("project".into(), BTreeSet::from(["a".to_string()]));
        snapshot
            .links
            .insert("beta".into(), BTreeSet::from(["a".to_string()]));
        snapshot
            .backlinks
            .insert("b".into(), BTreeSet::from(["a".to_string()]));
        snapshot.fingerprints.insert("a".into(), "00".repeat(32));
        snapshot
    }

    #[test]
    fn empty_store_loads_nothing() {
        let store = SqliteSnapshotStore::open_in_memory().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_load_returns_snapshot() {
        let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
        store.save(&sample_snapshot()).unwrap();
        assert_eq!(store.load().unwrap(), Some(sample_snapshot()));
    }

    #[test]
    fn save_replaces_previous_snapshot() {
        let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
        store.save(&sample_snapshot()).unwrap();
        store.save(&IndexSnapshot::default()).unwrap();
        assert_eq!(store.load().unwrap(), Some(IndexSnapshot::default()));
    }

    #[test]
    fn clear_removes_snapshot() {
        let mut store = SqliteSnapshotStore::open_in_memory().unwrap();
        store.save(&sample_snapshot()).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn open_creates_parent_directories_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(".index").join("notedex.db");

        {
            let mut store = SqliteSnapshotStore::open(&path).unwrap();
            store.save(&sample_snapshot()).unwrap();
        }

        let reopened = SqliteSnapshotStore::open(&path).unwrap();
        assert_eq!(reopened.load().unwrap(), Some(sample_snapshot()));
    }

    #[test]
    fn corrupt_payload_is_an_error() {
        let store = SqliteSnapshotStore::open_in_memory().unwrap();
        for key in [TAG_INDEX_KEY, LINK_INDEX_KEY, BACKLINK_INDEX_KEY, FINGERPRINTS_KEY] {
            store
                .conn
                .execute(
                    "INSERT INTO index_cache (key, value) VALUES (?1, 'nope')",
                    [key],
                )
                .unwrap();
        }
        assert!(matches!(store.load(), Err(IndexError::Serialization(_))));
    }
}
