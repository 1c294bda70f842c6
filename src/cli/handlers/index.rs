//! Index command handler.

use anyhow::Result;

use super::{ConsoleReporter, Workspace};
use crate::cli::IndexArgs;

pub fn handle_index(args: &IndexArgs, workspace: &Workspace, verbose: bool) -> Result<()> {
    let notes = workspace.load()?;
    let mut index = workspace.open_index();
    let mut reporter = ConsoleReporter::new(verbose);

    if args.full {
        println!("Rebuilding index...");
        index.rebuild_with_progress(&notes, &mut reporter);
    } else {
        println!("Updating index...");
        index.init_with_progress(&notes, &mut reporter);
    }

    for error in notes.load_errors() {
        eprintln!("  {}", error);
    }
    if !notes.load_errors().is_empty() {
        eprintln!("{} file(s) could not be loaded", notes.load_errors().len());
    }

    Ok(())
}
