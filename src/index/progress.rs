//! Progress reporting while the index is built.

/// Result of building the index from a document source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildResult {
    /// Number of notes indexed.
    pub indexed: usize,
    /// Whether the inverted indices were seeded from a cached snapshot.
    pub from_snapshot: bool,
}

/// Trait for receiving progress updates during index construction.
pub trait ProgressReporter {
    /// Called after a note's record is derived.
    fn on_note(&mut self, id: &str);
    /// Called when the build is complete.
    fn on_complete(&mut self, result: &BuildResult);
}

/// A no-op progress reporter.
#[derive(Default)]
pub struct NoopReporter;

impl ProgressReporter for NoopReporter {
    fn on_note(&mut self, _id: &str) {}
    fn on_complete(&mut self, _result: &BuildResult) {}
}
