//! Builder for markdown test notes.

/// Builder for creating markdown notes with frontmatter.
///
/// The note id seen by notedex is the relative path without `.md`, so a note
/// titled "Plan" in folder "work" has id `work/Plan`.
#[derive(Debug, Clone)]
pub struct TestNote {
    title: String,
    folder: Option<String>,
    frontmatter: Vec<(String, String)>,
    tags: Vec<String>,
    body: String,
}

impl TestNote {
    /// Creates a new test note with the given title.
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            folder: None,
            frontmatter: Vec::new(),
            tags: Vec::new(),
            body: String::new(),
        }
    }

    /// Places the note in a folder below the notes directory.
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Adds a raw `key: value` frontmatter line.
    pub fn field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.frontmatter.push((key.into(), value.into()));
        self
    }

    /// Adds a tag to the frontmatter `tags` list.
    pub fn tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Sets the body content (builder method).
    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Returns the title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the id the note will have once indexed.
    pub fn id(&self) -> String {
        match &self.folder {
            Some(folder) => format!("{}/{}", folder, self.title),
            None => self.title.clone(),
        }
    }

    /// Returns the file path relative to the notes directory.
    pub fn relative_path(&self) -> String {
        format!("{}.md", self.id())
    }

    /// Renders the note as markdown.
    pub fn to_markdown(&self) -> String {
        let mut lines = Vec::new();
        if !self.frontmatter.is_empty() || !self.tags.is_empty() {
            lines.push("---".to_string());
            for (key, value) in &self.frontmatter {
                lines.push(format!("{}: {}", key, value));
            }
            if !self.tags.is_empty() {
                lines.push(format!("tags: [{}]", self.tags.join(", ")));
            }
            lines.push("---".to_string());
        }
        if !self.body.is_empty() {
            lines.push(self.body.clone());
        }
        let mut text = lines.join("\n");
        text.push('\n');
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_without_metadata_is_just_body() {
        let note = TestNote::new("Plain").body("hello");
        assert_eq!(note.to_markdown(), "hello\n");
        assert_eq!(note.id(), "Plain");
    }

    #[test]
    fn test_note_builder_fluent() {
        let note = TestNote::new("Plan")
            .folder("work")
            .field("status", "Active")
            .tag("project")
            .tag("q3")
            .body("- [ ] ship it");

        assert_eq!(note.id(), "work/Plan");
        assert_eq!(note.relative_path(), "work/Plan.md");
        assert_eq!(
            note.to_markdown(),
            "---\nstatus: Active\ntags: [project, q3]\n---\n- [ ] ship it\n"
        );
    }
}
