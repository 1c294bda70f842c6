//! Serialized snapshot of the inverted indices and the store trait that keeps it.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or saving a snapshot.
#[derive(Debug, Error)]
pub enum IndexError {
    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A snapshot payload could not be encoded or decoded.
    #[error("invalid snapshot payload: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An I/O error occurred.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for snapshot operations.
pub type IndexResult<T> = Result<T, IndexError>;

/// A cached copy of the tag, link and backlink indices.
///
/// The snapshot is never a source of truth. It is only trusted when its
/// fingerprints match the live notes exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexSnapshot {
    /// Tag → ids of notes carrying it.
    pub tags: BTreeMap<String, BTreeSet<String>>,
    /// Lowercase link target → ids of notes linking to it.
    pub links: BTreeMap<String, BTreeSet<String>>,
    /// Note id → ids of notes whose links resolve to it.
    pub backlinks: BTreeMap<String, BTreeSet<String>>,
    /// Note id → content fingerprint at the time of the snapshot.
    pub fingerprints: BTreeMap<String, String>,
}

/// Persistence for index snapshots.
///
/// Implementations may use different storage backends (e.g., SQLite, a
/// browser key-value store).
pub trait SnapshotStore: Send {
    /// Loads the stored snapshot, or `None` if nothing complete is stored.
    fn load(&self) -> IndexResult<Option<IndexSnapshot>>;

    /// Replaces the stored snapshot.
    fn save(&mut self, snapshot: &IndexSnapshot) -> IndexResult<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_error_implements_std_error() {
        fn assert_error<E: std::error::Error>() {}
        assert_error::<IndexError>();
    }

    #[test]
    fn serialization_error_displays_reason() {
        let err: IndexError = serde_json::from_str::<IndexSnapshot>("{")
            .unwrap_err()
            .into();
        assert!(err.to_string().contains("invalid snapshot payload"));
    }
}
