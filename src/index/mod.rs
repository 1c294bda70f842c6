//! Metadata index, its snapshot cache and consistency checks

mod metadata;
mod progress;
mod record;
mod schema;
mod snapshot;
mod sqlite;
mod validation;

pub use metadata::MetadataIndex;
pub use progress::{BuildResult, NoopReporter, ProgressReporter};
pub use record::{MetadataRecord, timestamp_value};
pub use snapshot::{IndexError, IndexResult, IndexSnapshot, SnapshotStore};
pub use sqlite::SqliteSnapshotStore;
pub use validation::{IndexKind, Severity, ValidationIssue, ValidationSummary};
