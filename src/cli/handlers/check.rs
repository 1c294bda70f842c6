//! Check command handler.

use anyhow::{Result, bail};

use super::Workspace;
use crate::cli::CheckArgs;
use crate::index::Severity;

pub fn handle_check(args: &CheckArgs, workspace: &Workspace) -> Result<()> {
    // 1. Load notes and build the index
    let (notes, index) = workspace.indexed()?;
    if index.is_empty() && notes.load_errors().is_empty() {
        println!("No notes found.");
        return Ok(());
    }

    // 2. Compare the inverted indices against the records
    let summary = index.validate();
    let load_errors = notes.load_errors();

    let warnings = if args.quiet { 0 } else { summary.warning_count() };
    let errors = summary.error_count() + load_errors.len();

    // 3. Display results
    if errors == 0 && warnings == 0 {
        println!("All {} notes OK.", index.len());
        return Ok(());
    }

    for error in load_errors {
        println!("error: {}", error);
    }
    for issue in summary.issues_by_severity() {
        if args.quiet && issue.severity() == Severity::Warning {
            continue;
        }
        println!("{}: {}", issue.severity(), issue);
    }
    println!(
        "\nFound {} issue(s): {} error(s), {} warning(s)",
        errors + warnings,
        errors,
        warnings
    );

    // 4. Exit code: fail only if there are errors
    if errors > 0 {
        bail!("check failed");
    }
    Ok(())
}
