//! File-system document sources: a markdown vault directory and a JSON export.

use crate::domain::{Block, BlockKind, DocumentSource, MemorySource, Note};
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

/// Errors opening a document source.
#[derive(Debug, Error)]
pub enum FsError {
    #[error("notes directory not found: {path}")]
    NotFound { path: PathBuf },

    #[error("path is not a directory: {path}")]
    NotADirectory { path: PathBuf },

    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid notes export {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// A file that could not be turned into a note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadError {
    pub path: PathBuf,
    pub message: String,
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.message)
    }
}

/// A document source backed by a directory of markdown files.
///
/// Every `.md` file below the root (hidden entries excluded) is read once at
/// open time. The note id is the relative path without extension, the title
/// is the file stem and the path is the containing folder.
#[derive(Debug)]
pub struct DirectorySource {
    root: PathBuf,
    notes: MemorySource,
    errors: Vec<LoadError>,
}

impl DirectorySource {
    /// Scans and loads a notes directory.
    ///
    /// # Errors
    ///
    /// Returns `FsError::NotFound` or `FsError::NotADirectory` if `dir` is not
    /// a usable directory. Unreadable files do not fail the scan; they are
    /// reported by [`DirectorySource::errors`].
    pub fn open(dir: &Path) -> Result<Self, FsError> {
        let mut notes = MemorySource::new();
        let mut errors = Vec::new();

        for relative in scan_notes_directory(dir)? {
            match read_markdown_note(dir, &relative) {
                Ok(note) => notes.insert(note),
                Err(message) => {
                    tracing::warn!(path = %relative.display(), %message, "skipping note");
                    errors.push(LoadError {
                        path: relative,
                        message,
                    });
                }
            }
        }

        tracing::debug!(
            root = %dir.display(),
            notes = notes.len(),
            errors = errors.len(),
            "loaded notes directory"
        );

        Ok(Self {
            root: dir.to_path_buf(),
            notes,
            errors,
        })
    }

    /// Returns the directory the notes were loaded from.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the files that could not be loaded.
    pub fn errors(&self) -> &[LoadError] {
        &self.errors
    }
}

impl DocumentSource for DirectorySource {
    fn list_notes(&self) -> Vec<&Note> {
        self.notes.list_notes()
    }

    fn get_note(&self, id: &str) -> Option<&Note> {
        self.notes.get_note(id)
    }
}

/// Loads a JSON array of notes (camelCase fields, RFC 3339 timestamps).
///
/// # Errors
///
/// Returns `FsError::Io` if the file cannot be read and `FsError::Json` if it
/// is not a valid notes export.
pub fn load_notes_json(path: &Path) -> Result<MemorySource, FsError> {
    let contents = std::fs::read_to_string(path).map_err(|e| FsError::from_io(path, e))?;
    let notes: Vec<Note> = serde_json::from_str(&contents).map_err(|e| FsError::Json {
        path: path.to_path_buf(),
        source: e,
    })?;
    tracing::debug!(path = %path.display(), notes = notes.len(), "loaded notes export");
    Ok(notes.into_iter().collect())
}

impl FsError {
    fn from_io(path: &Path, error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::NotFound => FsError::NotFound { path: path.into() },
            _ => FsError::Io {
                path: path.into(),
                source: error,
            },
        }
    }
}

/// Scans a directory recursively for markdown (.md) files.
///
/// Skips hidden files and directories (starting with `.`), including the
/// `.index/` directory used for the snapshot cache. Returns paths relative to
/// the input directory, sorted for a stable note order.
///
/// # Errors
///
/// Returns `FsError::NotFound` if the directory doesn't exist.
/// Returns `FsError::NotADirectory` if the path is not a directory.
pub fn scan_notes_directory(dir: &Path) -> Result<Vec<PathBuf>, FsError> {
    if !dir.exists() {
        return Err(FsError::NotFound {
            path: dir.to_path_buf(),
        });
    }
    if !dir.is_dir() {
        return Err(FsError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let paths = WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e))
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(has_md_extension)
        .filter_map(|e| e.path().strip_prefix(dir).ok().map(Path::to_path_buf))
        .collect();

    Ok(paths)
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|s| s.starts_with('.'))
}

fn has_md_extension(entry: &DirEntry) -> bool {
    entry.path().extension().is_some_and(|e| e == "md")
}

fn read_markdown_note(root: &Path, relative: &Path) -> Result<Note, String> {
    let full_path = root.join(relative);
    let bytes = std::fs::read(&full_path).map_err(|e| e.to_string())?;
    let text = String::from_utf8(bytes)
        .map_err(|e| format!("invalid UTF-8 at byte {}", e.utf8_error().valid_up_to()))?;
    let text = text.strip_prefix('\u{FEFF}').unwrap_or(&text);

    let metadata = std::fs::metadata(&full_path).map_err(|e| e.to_string())?;
    let modified: DateTime<Utc> = metadata
        .modified()
        .map(DateTime::from)
        .unwrap_or_else(|_| Utc::now());
    let created: DateTime<Utc> = metadata.created().map(DateTime::from).unwrap_or(modified);

    let id = slash_path(&relative.with_extension(""));
    let title = relative
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("Untitled")
        .to_string();
    let folder = relative.parent().map(slash_path).unwrap_or_default();

    let blocks = markdown_to_blocks(&id, text);
    Ok(Note::builder(id, title, created, modified)
        .path(folder)
        .content(text)
        .blocks(blocks)
        .build())
}

fn slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

/// Splits markdown text into one block per non-blank line.
///
/// `- [ ]` and `- [x]` items become task blocks with the marker removed;
/// other lines keep their text and are classified by their leading marker.
pub fn markdown_to_blocks(note_id: &str, text: &str) -> Vec<Block> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            let id = format!("{}#L{}", note_id, i + 1);
            let trimmed = line.trim_start();
            if let Some((checked, rest)) = parse_task_marker(trimmed) {
                return Block::task(id, rest, checked);
            }
            let kind = if trimmed.starts_with("```") {
                BlockKind::Code
            } else if trimmed.starts_with("# ") || trimmed.starts_with("##") {
                BlockKind::Heading
            } else if trimmed.starts_with("- ") || trimmed.starts_with("* ") {
                BlockKind::Bullet
            } else if trimmed.starts_with("> ") {
                BlockKind::Quote
            } else {
                BlockKind::Text
            };
            Block::new(id, kind, line)
        })
        .collect()
}

fn parse_task_marker(line: &str) -> Option<(bool, &str)> {
    let rest = line
        .strip_prefix("- [")
        .or_else(|| line.strip_prefix("* ["))?;
    let mut chars = rest.chars();
    let checked = match chars.next()? {
        ' ' => false,
        'x' | 'X' => true,
        _ => return None,
    };
    let rest = chars.as_str().strip_prefix(']')?;
    Some((checked, rest.trim()))
}
