//! Text extraction, content fingerprints and file-system document sources

mod content_hash;
mod extract;
mod frontmatter;
mod fs;

pub use content_hash::ContentHash;
pub use extract::{derive_text, extract_tags, extract_wiki_links, word_count};
pub use frontmatter::{Frontmatter, ParsedText, parse_frontmatter};
pub use fs::{
    DirectorySource, FsError, LoadError, load_notes_json, markdown_to_blocks, scan_notes_directory,
};
