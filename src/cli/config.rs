//! Configuration file support.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Application configuration loaded from config file.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Default notes directory
    pub dir: Option<PathBuf>,

    /// Default JSON notes export, used when no directory is given
    pub notes: Option<PathBuf>,

    /// Cache the index in `.index/notedex.db` under the notes directory
    pub snapshot: bool,

    /// Log level used when no `-v` flag is given (error, warn, info, debug, trace)
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir: None,
            notes: None,
            snapshot: true,
            log_level: None,
        }
    }
}

/// Where the notes are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotesLocation {
    /// A directory of markdown files.
    Directory(PathBuf),
    /// A JSON array of notes.
    Export(PathBuf),
}

impl NotesLocation {
    /// Returns the path of the snapshot database for this location.
    ///
    /// Only directories carry a snapshot.
    pub fn snapshot_path(&self) -> Option<PathBuf> {
        match self {
            NotesLocation::Directory(dir) => Some(dir.join(".index").join("notedex.db")),
            NotesLocation::Export(_) => None,
        }
    }
}

impl Config {
    /// Load configuration from the default config file location.
    ///
    /// Returns default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Load configuration from a specific file.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("failed to read config file: {}", config_path.display()))?;

        toml::from_str(&contents)
            .with_context(|| format!("failed to parse config file: {}", config_path.display()))
    }

    /// Returns the path to the config file.
    ///
    /// Default: `~/.config/notedex/config.toml`
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("notedex")
            .join("config.toml")
    }

    /// Resolve where notes are read from, with CLI arguments taking precedence.
    ///
    /// Precedence order:
    /// 1. CLI `--notes` argument
    /// 2. CLI `--dir` argument
    /// 3. Config file `notes` setting
    /// 4. Config file `dir` setting
    /// 5. Current working directory
    pub fn notes_location(
        &self,
        cli_dir: Option<&PathBuf>,
        cli_notes: Option<&PathBuf>,
    ) -> NotesLocation {
        if let Some(path) = cli_notes {
            return NotesLocation::Export(path.clone());
        }
        if let Some(dir) = cli_dir {
            return NotesLocation::Directory(dir.clone());
        }
        if let Some(path) = &self.notes {
            return NotesLocation::Export(path.clone());
        }
        NotesLocation::Directory(self.dir.clone().unwrap_or_else(|| PathBuf::from(".")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn default_config_enables_snapshot() {
        let config = Config::default();
        assert!(config.dir.is_none());
        assert!(config.snapshot);
    }

    #[test]
    fn cli_notes_take_precedence() {
        let config = Config {
            dir: Some(PathBuf::from("/config/notes")),
            ..Config::default()
        };
        let cli_dir = PathBuf::from("/cli/notes");
        let cli_notes = PathBuf::from("/cli/notes.json");
        assert_eq!(
            config.notes_location(Some(&cli_dir), Some(&cli_notes)),
            NotesLocation::Export(PathBuf::from("/cli/notes.json"))
        );
        assert_eq!(
            config.notes_location(Some(&cli_dir), None),
            NotesLocation::Directory(PathBuf::from("/cli/notes"))
        );
    }

    #[test]
    fn cli_dir_beats_configured_export() {
        let config = Config {
            notes: Some(PathBuf::from("/config/notes.json")),
            ..Config::default()
        };
        let cli_dir = PathBuf::from("/cli/notes");
        assert_eq!(
            config.notes_location(Some(&cli_dir), None),
            NotesLocation::Directory(PathBuf::from("/cli/notes"))
        );
        assert_eq!(
            config.notes_location(None, None),
            NotesLocation::Export(PathBuf::from("/config/notes.json"))
        );
    }

    #[test]
    fn location_falls_back_to_config_then_cwd() {
        let config = Config {
            dir: Some(PathBuf::from("/config/notes")),
            ..Config::default()
        };
        assert_eq!(
            config.notes_location(None, None),
            NotesLocation::Directory(PathBuf::from("/config/notes"))
        );
        assert_eq!(
            Config::default().notes_location(None, None),
            NotesLocation::Directory(PathBuf::from("."))
        );
    }

    #[test]
    fn only_directories_have_snapshots() {
        let dir = NotesLocation::Directory(PathBuf::from("vault"));
        assert_eq!(
            dir.snapshot_path(),
            Some(PathBuf::from("vault/.index/notedex.db"))
        );
        assert_eq!(
            NotesLocation::Export(PathBuf::from("notes.json")).snapshot_path(),
            None
        );
    }

    #[test]
    fn parses_partial_config_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "snapshot = false\nlog_level = \"debug\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert!(!config.snapshot);
        assert_eq!(config.log_level.as_deref(), Some("debug"));
        assert!(config.notes.is_none());
    }

    #[test]
    fn missing_config_file_is_default() {
        let temp = tempfile::TempDir::new().unwrap();
        let config = Config::load_from(&temp.path().join("absent.toml")).unwrap();
        assert!(config.snapshot);
    }

    #[test]
    fn malformed_config_file_is_an_error() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "snapshot = \"sometimes\"").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(format!("{err:#}").contains("failed to parse config file"));
    }

    #[test]
    fn config_path_is_in_config_dir() {
        let path = Config::config_path();
        assert!(path.ends_with("notedex/config.toml"));
    }
}
