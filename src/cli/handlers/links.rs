//! Link-related command handlers (backlinks, linking).

use anyhow::Result;

use super::resolve::require_note;
use super::{Workspace, print_notes};
use crate::cli::{BacklinksArgs, LinkingArgs};

pub fn handle_backlinks(args: &BacklinksArgs, workspace: &Workspace) -> Result<()> {
    let (_notes, index) = workspace.indexed()?;
    let note = require_note(&index, &args.note)?;

    let mut backlinks = index.get_backlinks(note.id());
    // Most recently modified first
    backlinks.sort_by_key(|n| std::cmp::Reverse(n.modified()));

    print_notes(&backlinks, args.format, "No backlinks found.", "backlink")
}

pub fn handle_linking(args: &LinkingArgs, workspace: &Workspace) -> Result<()> {
    let (_notes, index) = workspace.indexed()?;
    let notes = index.get_linking_notes(&args.target);

    print_notes(&notes, args.format, "No linking notes found.", "note")
}
