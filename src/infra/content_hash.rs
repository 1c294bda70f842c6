//! Content fingerprints for validating a cached index snapshot.

use crate::domain::Note;
use crate::infra::derive_text;
use sha2::{Digest, Sha256};
use std::fmt;

/// SHA256 hash of the indexable part of a note.
///
/// Stores a 64-character lowercase hex string. Two notes with the same hash
/// contribute identical entries to the tag, link and backlink indices.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct ContentHash {
    hex: String,
}

impl ContentHash {
    /// Fingerprints a note by its title and derived text.
    ///
    /// The title takes part because backlinks resolve against titles.
    pub fn of_note(note: &Note) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(note.title().as_bytes());
        hasher.update([0u8]);
        hasher.update(derive_text(note).as_bytes());
        Self {
            hex: format!("{:x}", hasher.finalize()),
        }
    }

    /// Returns the hash as a 64-character lowercase hex string.
    pub fn as_str(&self) -> &str {
        &self.hex
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hex)
    }
}
