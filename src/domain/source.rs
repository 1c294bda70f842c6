//! The boundary between the index and whatever owns the notes.

use crate::domain::Note;
use indexmap::IndexMap;

/// Supplies notes to the index.
///
/// The index only reads through this trait; it never owns or mutates notes.
/// Implementations hold their notes in memory, so lookups cannot fail.
pub trait DocumentSource {
    /// Lists every note, in the source's own order.
    fn list_notes(&self) -> Vec<&Note>;

    /// Looks up a single note by id.
    fn get_note(&self, id: &str) -> Option<&Note>;
}

/// An insertion-ordered, in-memory document source.
///
/// Hosts that own the notes (an editor, a sync layer, tests) mutate this and
/// then tell the index which note changed.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    notes: IndexMap<String, Note>,
}

impl MemorySource {
    /// Creates an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a note. A replaced note keeps its position.
    pub fn insert(&mut self, note: Note) {
        self.notes.insert(note.id().to_string(), note);
    }

    /// Removes a note, returning it if it existed.
    pub fn remove(&mut self, id: &str) -> Option<Note> {
        self.notes.shift_remove(id)
    }

    /// Returns the number of notes.
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    /// Returns true if the source holds no notes.
    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

impl FromIterator<Note> for MemorySource {
    fn from_iter<I: IntoIterator<Item = Note>>(iter: I) -> Self {
        let mut source = Self::new();
        for note in iter {
            source.insert(note);
        }
        source
    }
}

impl DocumentSource for MemorySource {
    fn list_notes(&self) -> Vec<&Note> {
        self.notes.values().collect()
    }

    fn get_note(&self, id: &str) -> Option<&Note> {
        self.notes.get(id)
    }
}
