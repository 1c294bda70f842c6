//! Isolated test environment with temp directory.

// Allow dead code since each test binary uses a different subset
#![allow(dead_code)]

use super::{NotedexCommand, TestNote};
use notedex::index::{MetadataIndex, SqliteSnapshotStore};
use notedex::infra::DirectorySource;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Isolated test environment with a temporary notes directory.
///
/// Creates a temp directory that is automatically cleaned up on drop. Notes
/// live in `notes/` and the config lookup is redirected to `config/`, so the
/// user's own config never leaks into a test.
pub struct TestEnv {
    /// The temporary directory (kept for lifetime management)
    temp_dir: TempDir,
    /// Path to the notes directory
    notes_dir: PathBuf,
}

impl TestEnv {
    /// Creates a new isolated test environment.
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let notes_dir = temp_dir.path().join("notes");
        std::fs::create_dir_all(&notes_dir).expect("Failed to create notes directory");
        std::fs::create_dir_all(temp_dir.path().join("config"))
            .expect("Failed to create config directory");
        Self {
            temp_dir,
            notes_dir,
        }
    }

    /// Returns the path to the notes directory.
    pub fn notes_dir(&self) -> &Path {
        &self.notes_dir
    }

    /// Returns the path where the snapshot database is stored.
    pub fn index_path(&self) -> PathBuf {
        self.notes_dir.join(".index").join("notedex.db")
    }

    /// Returns the directory standing in for `~/.config`.
    pub fn config_home(&self) -> PathBuf {
        self.temp_dir.path().join("config")
    }

    /// Writes `notedex/config.toml` under the redirected config home.
    pub fn write_config(&self, contents: &str) -> PathBuf {
        let dir = self.config_home().join("notedex");
        std::fs::create_dir_all(&dir).expect("Failed to create config directory");
        let path = dir.join("config.toml");
        std::fs::write(&path, contents).expect("Failed to write config");
        path
    }

    /// Adds a test note to the environment and returns its path.
    pub fn add_note(&self, note: &TestNote) -> PathBuf {
        self.write_file(&note.relative_path(), &note.to_markdown())
    }

    /// Deletes a previously added note.
    pub fn remove_note(&self, note: &TestNote) {
        std::fs::remove_file(self.notes_dir.join(note.relative_path()))
            .expect("Failed to remove note");
    }

    /// Writes a file below the notes directory and returns its path.
    pub fn write_file(&self, name: &str, content: &str) -> PathBuf {
        let path = self.notes_dir.join(name);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&path, content).expect("Failed to write file");
        path
    }

    /// Writes a JSON notes export next to the notes directory.
    pub fn write_export(&self, name: &str, notes: &serde_json::Value) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        let json = serde_json::to_string_pretty(notes).expect("Failed to encode export");
        std::fs::write(&path, json).expect("Failed to write export");
        path
    }

    /// Loads the notes directory and builds a snapshot-backed index over it.
    pub fn build_index(&self) -> (DirectorySource, MetadataIndex) {
        let source = DirectorySource::open(&self.notes_dir).expect("Failed to load notes");
        let store = SqliteSnapshotStore::open(&self.index_path()).expect("Failed to open store");
        let mut index = MetadataIndex::with_store(store);
        index.init(&source);
        (source, index)
    }

    /// Creates a command configured for this test environment.
    pub fn cmd(&self) -> NotedexCommand {
        self.bare_cmd().dir(&self.notes_dir)
    }

    /// Creates a command with the isolated config but no `--dir`.
    pub fn bare_cmd(&self) -> NotedexCommand {
        NotedexCommand::new().config_home(&self.config_home())
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_creates_temp_directory() {
        let env = TestEnv::new();
        assert!(env.notes_dir().is_dir(), "notes directory should exist");
    }

    #[test]
    fn test_env_cleanup_on_drop() {
        let path = {
            let env = TestEnv::new();
            env.notes_dir().to_path_buf()
        };
        assert!(!path.exists(), "temp directory should be cleaned up on drop");
    }

    #[test]
    fn test_env_index_path() {
        let env = TestEnv::new();
        let index_path = env.index_path();
        assert!(index_path.ends_with(".index/notedex.db"));
        assert!(index_path.starts_with(env.notes_dir()));
    }

    #[test]
    fn test_env_provides_command() {
        let env = TestEnv::new();
        let cmd = env.cmd();
        let args = cmd.get_args();
        assert_eq!(args[0], "--dir");
        assert_eq!(args[1], env.notes_dir().to_string_lossy());
    }

    #[test]
    fn test_env_add_note_in_folder() {
        let env = TestEnv::new();
        let path = env.add_note(&TestNote::new("Plan").folder("work/q3"));
        assert!(path.is_file());
        assert!(path.ends_with("work/q3/Plan.md"));
    }

    #[test]
    fn test_env_build_index_includes_notes() {
        let env = TestEnv::new();
        env.add_note(&TestNote::new("First").tag("a"));
        env.add_note(&TestNote::new("Second").tag("a"));

        let (_source, index) = env.build_index();

        assert_eq!(index.len(), 2);
        assert_eq!(index.get_by_tag("a").len(), 2);
        assert!(env.index_path().exists(), "snapshot should be written");
    }
}
