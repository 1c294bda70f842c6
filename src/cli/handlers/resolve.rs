//! Note resolution utilities.

use anyhow::{Result, bail};

use crate::index::{MetadataIndex, MetadataRecord};

/// Result of resolving a note identifier.
#[derive(Debug)]
pub enum ResolveResult<'a> {
    /// Exactly one note matched.
    Unique(&'a MetadataRecord),
    /// Multiple notes share the title (ambiguous).
    Ambiguous(Vec<&'a MetadataRecord>),
    /// No notes matched.
    NotFound,
}

/// Prints the candidates of an ambiguous identifier.
pub(crate) fn print_ambiguous_notes(identifier: &str, notes: &[&MetadataRecord]) {
    eprintln!("Ambiguous: '{}' matches {} notes:", identifier, notes.len());
    for note in notes {
        eprintln!("  {} - {}", note.id(), note.title());

        if !note.tags().is_empty() {
            let tags: Vec<_> = note.tags().iter().map(|t| t.as_str()).collect();
            eprintln!("      tags: {}", tags.join(", "));
        }
    }
    eprintln!();
    eprintln!("Use the note ID to specify which note you mean.");
}

/// Resolves a note identifier to a unique note.
///
/// Resolution order:
/// 1. Exact ID match
/// 2. Case-insensitive title match
pub fn resolve_note<'a>(index: &'a MetadataIndex, identifier: &str) -> ResolveResult<'a> {
    let identifier = identifier.trim();

    if let Some(record) = index.get(identifier) {
        return ResolveResult::Unique(record);
    }

    let key = identifier.to_lowercase();
    let mut candidates: Vec<&MetadataRecord> = index
        .records()
        .filter(|record| record.title_key() == key)
        .collect();

    match candidates.len() {
        0 => ResolveResult::NotFound,
        1 => ResolveResult::Unique(candidates.remove(0)),
        _ => ResolveResult::Ambiguous(candidates),
    }
}

/// Resolves an identifier or fails with a message fit for the terminal.
pub(crate) fn require_note<'a>(
    index: &'a MetadataIndex,
    identifier: &str,
) -> Result<&'a MetadataRecord> {
    match resolve_note(index, identifier) {
        ResolveResult::Unique(record) => Ok(record),
        ResolveResult::Ambiguous(notes) => {
            print_ambiguous_notes(identifier, &notes);
            bail!("ambiguous note identifier");
        }
        ResolveResult::NotFound => bail!("note not found: '{}'", identifier),
    }
}
