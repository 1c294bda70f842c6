//! Metadata command handlers (tags, show, where).

use anyhow::Result;

use super::resolve::require_note;
use super::{Workspace, print_notes};
use crate::cli::output::{NoteDetail, NoteListing, Output, OutputFormat, TagListing};
use crate::cli::{ShowArgs, TagsArgs, WhereArgs};
use crate::query::parse_value;

pub fn handle_tags(args: &TagsArgs, workspace: &Workspace) -> Result<()> {
    let (_notes, index) = workspace.indexed()?;
    let tags = index.get_all_tags();

    match args.format {
        OutputFormat::Human => {
            if tags.is_empty() {
                println!("No tags found.");
            } else {
                for (tag, count) in &tags {
                    if args.counts {
                        println!("{} ({})", tag, count);
                    } else {
                        println!("{}", tag);
                    }
                }
            }
        }
        OutputFormat::Json => {
            let listings: Vec<TagListing> = tags
                .iter()
                .map(|(tag, count)| TagListing {
                    name: tag.clone(),
                    count: if args.counts { Some(*count) } else { None },
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&Output::new(listings))?);
        }
    }
    Ok(())
}

pub fn handle_show(args: &ShowArgs, workspace: &Workspace) -> Result<()> {
    let (_notes, index) = workspace.indexed()?;
    let note = require_note(&index, &args.note)?;
    let backlinks = index.get_backlinks(note.id());

    match args.format {
        OutputFormat::Human => {
            println!("Title:    {}", note.title());
            println!("ID:       {}", note.id());
            if !note.path().is_empty() {
                println!("Path:     {}", note.path());
            }
            println!("Created:  {}", note.created().format("%Y-%m-%d %H:%M"));
            println!("Modified: {}", note.modified().format("%Y-%m-%d %H:%M"));
            if !note.tags().is_empty() {
                let tags: Vec<_> = note.tags().iter().map(|t| t.as_str()).collect();
                println!("Tags:     {}", tags.join(", "));
            }
            println!("Words:    {}", note.word_count());
            println!("Blocks:   {}", note.block_count());

            if !note.frontmatter().is_empty() {
                println!();
                println!("Frontmatter:");
                for (key, value) in note.frontmatter() {
                    println!("  {}: {}", key, value);
                }
            }

            if !note.links().is_empty() {
                println!();
                println!("Links:");
                for link in note.links() {
                    println!("  {}", link);
                }
            }

            if !backlinks.is_empty() {
                println!();
                println!("Backlinks:");
                for backlink in &backlinks {
                    println!("  {} - {}", backlink.id(), backlink.title());
                }
            }
        }
        OutputFormat::Json => {
            let detail = NoteDetail {
                record: note,
                backlinks: backlinks.iter().copied().map(NoteListing::from).collect(),
            };
            println!("{}", serde_json::to_string_pretty(&Output::new(detail))?);
        }
    }
    Ok(())
}

pub fn handle_where(args: &WhereArgs, workspace: &Workspace) -> Result<()> {
    let (_notes, index) = workspace.indexed()?;

    // Literal syntax matches query conditions: "quoted", numbers, booleans, [lists]
    let value = parse_value(&args.value);
    let matches = index.query(&args.key, &value);

    print_notes(&matches, args.format, "No matching notes found.", "note")
}
