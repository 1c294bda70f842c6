//! SQLite schema for the snapshot cache.

use rusqlite::Connection;

/// Keys under which the snapshot parts are stored.
pub const TAG_INDEX_KEY: &str = "tag_index";
pub const LINK_INDEX_KEY: &str = "link_index";
pub const BACKLINK_INDEX_KEY: &str = "backlink_index";
pub const FINGERPRINTS_KEY: &str = "fingerprints";

/// Creates the key-value table holding snapshot parts.
///
/// It is idempotent - calling it multiple times is safe.
pub fn create_schema(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        "CREATE TABLE IF NOT EXISTS index_cache (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );",
    )
}
