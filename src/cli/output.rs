//! Output format types for CLI commands.

use clap::ValueEnum;
use serde::Serialize;

use crate::index::MetadataRecord;

/// Output format for command results.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output (default)
    #[default]
    Human,
    /// JSON output for programmatic consumption
    Json,
}

/// Wrapper for serializable command output.
#[derive(Debug, Serialize)]
pub struct Output<T: Serialize> {
    pub data: T,
}

impl<T: Serialize> Output<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// A single note in listing output.
#[derive(Debug, Serialize)]
pub struct NoteListing {
    pub id: String,
    pub title: String,
    pub path: String,
}

impl From<&MetadataRecord> for NoteListing {
    fn from(record: &MetadataRecord) -> Self {
        Self {
            id: record.id().to_string(),
            title: record.title().to_string(),
            path: record.path().to_string(),
        }
    }
}

/// A tag with optional count.
#[derive(Debug, Serialize)]
pub struct TagListing {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
}

/// A note's full metadata together with the notes linking to it.
#[derive(Debug, Serialize)]
pub struct NoteDetail<'a> {
    #[serde(flatten)]
    pub record: &'a MetadataRecord,
    pub backlinks: Vec<NoteListing>,
}
