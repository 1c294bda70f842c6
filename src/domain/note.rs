//! Note and block types supplied by a document source.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The kind of a structural block inside a note.
///
/// Unknown kinds from imported data deserialize as [`BlockKind::Other`]
/// rather than failing the whole note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockKind {
    Text,
    Heading,
    Bullet,
    Numbered,
    Quote,
    Code,
    Divider,
    #[serde(alias = "todo", alias = "checkbox")]
    Task,
    #[serde(other)]
    Other,
}

/// One structural block of a note, in document order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    id: String,
    #[serde(rename = "type")]
    kind: BlockKind,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    checked: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl Block {
    /// Creates a block of the given kind.
    pub fn new(id: impl Into<String>, kind: BlockKind, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            kind,
            content: content.into(),
            checked: None,
            created_at: None,
            completed_at: None,
        }
    }

    /// Creates a task block.
    pub fn task(id: impl Into<String>, content: impl Into<String>, checked: bool) -> Self {
        let mut block = Self::new(id, BlockKind::Task, content);
        block.checked = Some(checked);
        block
    }

    /// Sets the task timestamps.
    pub fn with_task_times(
        mut self,
        created_at: Option<DateTime<Utc>>,
        completed_at: Option<DateTime<Utc>>,
    ) -> Self {
        self.created_at = created_at;
        self.completed_at = completed_at;
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> BlockKind {
        self.kind
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns whether the block is checked. Blocks without a value are unchecked.
    pub fn is_checked(&self) -> bool {
        self.checked.unwrap_or(false)
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Returns true for task blocks that are still open.
    pub fn is_open_task(&self) -> bool {
        self.kind == BlockKind::Task && !self.is_checked()
    }
}

/// A note owned by the document source.
///
/// A note carries either flat `content` or an ordered list of `blocks`. When
/// blocks are present they are authoritative and the note's text is their
/// contents joined in order.
///
/// # Examples
///
/// ```
/// use notedex::domain::{Block, Note};
/// use chrono::Utc;
///
/// let now = Utc::now();
/// let note = Note::builder("n1", "Groceries", now, now)
///     .path("home")
///     .block(Block::task("b1", "milk", false))
///     .build();
/// assert_eq!(note.blocks().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    id: String,
    title: String,
    #[serde(default)]
    path: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    blocks: Vec<Block>,
    created: DateTime<Utc>,
    modified: DateTime<Utc>,
}

impl Note {
    /// Creates a note with flat content.
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        content: impl Into<String>,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            path: String::new(),
            content: content.into(),
            blocks: Vec::new(),
            created,
            modified,
        }
    }

    /// Creates a builder for constructing a note with optional fields.
    pub fn builder(
        id: impl Into<String>,
        title: impl Into<String>,
        created: DateTime<Utc>,
        modified: DateTime<Utc>,
    ) -> NoteBuilder {
        NoteBuilder {
            note: Self::new(id, title, String::new(), created, modified),
        }
    }

    /// Returns the note's stable identifier.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns the note's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the slash-delimited logical folder path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the flat content (ignored when blocks exist).
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the structural blocks in document order.
    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn created(&self) -> DateTime<Utc> {
        self.created
    }

    pub fn modified(&self) -> DateTime<Utc> {
        self.modified
    }

    /// Returns the task blocks in document order.
    pub fn tasks(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.kind() == BlockKind::Task)
    }

    /// Returns true if any task block is unchecked.
    pub fn has_open_tasks(&self) -> bool {
        self.blocks.iter().any(Block::is_open_task)
    }
}

/// Builder for constructing a Note.
#[derive(Debug)]
pub struct NoteBuilder {
    note: Note,
}

impl NoteBuilder {
    /// Sets the folder path.
    pub fn path(mut self, path: impl Into<String>) -> Self {
        self.note.path = path.into();
        self
    }

    /// Sets the flat content.
    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.note.content = content.into();
        self
    }

    /// Appends a block.
    pub fn block(mut self, block: Block) -> Self {
        self.note.blocks.push(block);
        self
    }

    /// Replaces all blocks.
    pub fn blocks(mut self, blocks: Vec<Block>) -> Self {
        self.note.blocks = blocks;
        self
    }

    /// Builds the Note.
    pub fn build(self) -> Note {
        self.note
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn test_datetime() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2024-01-15T10:30:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn builder_sets_optional_fields() {
        let note = Note::builder("n1", "Title", test_datetime(), test_datetime())
            .path("projects/alpha")
            .content("hello")
            .build();
        assert_eq!(note.id(), "n1");
        assert_eq!(note.path(), "projects/alpha");
        assert_eq!(note.content(), "hello");
        assert!(note.blocks().is_empty());
    }

    #[test]
    fn task_without_checked_value_is_open() {
        let block: Block =
            serde_json::from_str(r#"{"id":"b1","type":"task","content":"call bob"}"#).unwrap();
        assert!(!block.is_checked());
        assert!(block.is_open_task());
    }

    #[test]
    fn block_kind_accepts_aliases_and_unknowns() {
        let todo: Block = serde_json::from_str(r#"{"id":"b","type":"todo"}"#).unwrap();
        assert_eq!(todo.kind(), BlockKind::Task);
        let odd: Block = serde_json::from_str(r#"{"id":"b","type":"kanban-card"}"#).unwrap();
        assert_eq!(odd.kind(), BlockKind::Other);
    }

    #[test]
    fn has_open_tasks_ignores_checked_tasks() {
        let done = Note::builder("n", "t", test_datetime(), test_datetime())
            .block(Block::task("a", "x", true))
            .build();
        assert!(!done.has_open_tasks());

        let open = Note::builder("n", "t", test_datetime(), test_datetime())
            .block(Block::task("a", "x", true))
            .block(Block::task("b", "y", false))
            .build();
        assert!(open.has_open_tasks());
        assert_eq!(open.tasks().count(), 2);
    }

    #[test]
    fn deserializes_camel_case_export() {
        let json = r#"{
            "id": "n1",
            "title": "Sprint",
            "path": "work",
            "blocks": [
                {"id": "b1", "type": "task", "content": "ship", "checked": true,
                 "createdAt": "2024-01-15T10:30:00Z", "completedAt": "2024-01-16T09:00:00Z"}
            ],
            "created": "2024-01-15T10:30:00Z",
            "modified": "2024-01-16T09:00:00Z"
        }"#;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.title(), "Sprint");
        assert_eq!(note.content(), "");
        assert_eq!(note.blocks()[0].created_at(), Some(test_datetime()));
        assert!(note.blocks()[0].completed_at().is_some());
    }
}
