//! Command handlers for the CLI.

mod check;
mod index;
mod links;
mod metadata;
mod query;
mod resolve;
mod search;


use anyhow::{Context, Result};
use tracing::warn;

use crate::cli::config::NotesLocation;
use crate::cli::output::{NoteListing, Output, OutputFormat};
use crate::domain::{DocumentSource, MemorySource, Note};
use crate::index::{
    BuildResult, MetadataIndex, MetadataRecord, ProgressReporter, SqliteSnapshotStore,
};
use crate::infra::{DirectorySource, LoadError, load_notes_json};

// Re-export public items
pub use check::handle_check;
pub use index::handle_index;
pub use links::{handle_backlinks, handle_linking};
pub use metadata::{handle_show, handle_tags, handle_where};
pub use query::handle_query;
pub use resolve::{ResolveResult, resolve_note};
pub use search::handle_search;

// ===========================================
// Workspace
// ===========================================

/// Where the notes live and how the index is cached, resolved from CLI flags
/// and the config file.
#[derive(Debug, Clone)]
pub struct Workspace {
    location: NotesLocation,
    snapshot: bool,
}

impl Workspace {
    pub fn new(location: NotesLocation, snapshot: bool) -> Self {
        Self { location, snapshot }
    }

    /// Loads every note from the configured location.
    pub(crate) fn load(&self) -> Result<Notes> {
        match &self.location {
            NotesLocation::Directory(dir) => {
                let source = DirectorySource::open(dir)
                    .with_context(|| format!("failed to load notes from {}", dir.display()))?;
                Ok(Notes::Directory(source))
            }
            NotesLocation::Export(path) => {
                let source = load_notes_json(path)
                    .with_context(|| format!("failed to load notes from {}", path.display()))?;
                Ok(Notes::Export(source))
            }
        }
    }

    /// Creates an index with the snapshot store attached, if enabled.
    ///
    /// A snapshot database that cannot be opened only costs the cache.
    pub(crate) fn open_index(&self) -> MetadataIndex {
        let Some(db_path) = self.location.snapshot_path().filter(|_| self.snapshot) else {
            return MetadataIndex::new();
        };

        match SqliteSnapshotStore::open(&db_path) {
            Ok(store) => MetadataIndex::with_store(store),
            Err(e) => {
                warn!(path = %db_path.display(), error = %e, "snapshot unavailable");
                MetadataIndex::new()
            }
        }
    }

    /// Loads the notes and initializes an index over them.
    pub(crate) fn indexed(&self) -> Result<(Notes, MetadataIndex)> {
        let notes = self.load()?;
        let mut index = self.open_index();
        index.init(&notes);
        Ok((notes, index))
    }
}

/// Notes loaded from either kind of location.
#[derive(Debug)]
pub(crate) enum Notes {
    Directory(DirectorySource),
    Export(MemorySource),
}

impl Notes {
    /// Returns the files that could not be loaded.
    pub(crate) fn load_errors(&self) -> &[LoadError] {
        match self {
            Notes::Directory(source) => source.errors(),
            Notes::Export(_) => &[],
        }
    }
}

impl DocumentSource for Notes {
    fn list_notes(&self) -> Vec<&Note> {
        match self {
            Notes::Directory(source) => source.list_notes(),
            Notes::Export(source) => source.list_notes(),
        }
    }

    fn get_note(&self, id: &str) -> Option<&Note> {
        match self {
            Notes::Directory(source) => source.get_note(id),
            Notes::Export(source) => source.get_note(id),
        }
    }
}

// ===========================================
// Shared Utilities
// ===========================================

/// Progress reporter that prints to stdout.
pub(crate) struct ConsoleReporter {
    verbose: bool,
}

impl ConsoleReporter {
    pub(crate) fn new(verbose: bool) -> Self {
        Self { verbose }
    }
}

impl ProgressReporter for ConsoleReporter {
    fn on_note(&mut self, id: &str) {
        if self.verbose {
            println!("  indexed: {}", id);
        }
    }

    fn on_complete(&mut self, result: &BuildResult) {
        if result.from_snapshot {
            println!("Indexed {} notes (from snapshot)", result.indexed);
        } else {
            println!("Indexed {} notes", result.indexed);
        }
    }
}

/// Prints notes in the requested format.
pub(crate) fn print_notes(
    records: &[&MetadataRecord],
    format: OutputFormat,
    empty: &str,
    noun: &str,
) -> Result<()> {
    match format {
        OutputFormat::Human => {
            if records.is_empty() {
                println!("{}", empty);
            } else {
                print_note_table(records, noun);
            }
        }
        OutputFormat::Json => {
            let listings: Vec<NoteListing> =
                records.iter().copied().map(NoteListing::from).collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
    }
    Ok(())
}

/// Prints notes as an ID/Title/Path table followed by a count line.
fn print_note_table(records: &[&MetadataRecord], noun: &str) {
    println!("{:<30}  {:<40}  {}", "ID", "Title", "Path");
    println!(
        "{:<30}  {:<40}  {}",
        "------------------------------", "----------------------------------------", "----"
    );
    for record in records {
        println!(
            "{:<30}  {:<40}  {}",
            truncate_str(record.id(), 30),
            truncate_str(record.title(), 40),
            record.path()
        );
    }
    println!();
    println!("{} {}(s)", records.len(), noun);
}

/// Truncates a string to a maximum display width, adding ellipsis if needed.
pub(crate) fn truncate_str(s: &str, max_width: usize) -> String {
    if s.chars().count() <= max_width {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}
