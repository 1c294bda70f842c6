//! Search command handler.

use anyhow::Result;

use super::{Workspace, print_notes};
use crate::cli::SearchArgs;

pub fn handle_search(args: &SearchArgs, workspace: &Workspace) -> Result<()> {
    let (_notes, index) = workspace.indexed()?;

    // Ranked by title, tag and frontmatter score
    let results = index.search(&args.query);

    print_notes(&results, args.format, "No matching notes found.", "result")
}
