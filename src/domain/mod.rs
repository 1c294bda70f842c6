//! Core types: Note, Block, Tag, WikiLink, Value and the DocumentSource boundary

mod link;
mod note;
mod source;
mod tag;
mod value;

pub use link::WikiLink;
pub use note::{Block, BlockKind, Note, NoteBuilder};
pub use source::{DocumentSource, MemorySource};
pub use tag::{ParseTagError, Tag};
pub use value::{Value, parse_number};
