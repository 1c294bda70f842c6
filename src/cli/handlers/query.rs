//! Query command handler.

use anyhow::{Result, bail};
use std::fmt::{self, Write};

use super::{Workspace, truncate_str};
use crate::cli::QueryArgs;
use crate::cli::output::OutputFormat;
use crate::domain::Value;
use crate::query::{QueryEngine, QueryResults};

pub fn handle_query(args: &QueryArgs, workspace: &Workspace) -> Result<()> {
    let notes = workspace.load()?;
    let mut index = workspace.open_index();

    let outcome = QueryEngine::new(&mut index, &notes).execute(&args.query);

    match args.format {
        OutputFormat::Human => {
            if let Some(error) = &outcome.error {
                bail!("query failed: {}", error);
            }
            print!("{}", render_results(&outcome.results)?);
        }
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
            if let Some(error) = &outcome.error {
                bail!("query failed: {}", error);
            }
        }
    }
    Ok(())
}

/// Renders results as terminal text, ending with a count line.
pub(crate) fn render_results(results: &QueryResults) -> Result<String, fmt::Error> {
    let mut out = String::new();
    match results {
        QueryResults::List(rows) => {
            if rows.is_empty() {
                out.push_str("No matching notes found.\n");
                return Ok(out);
            }
            for row in rows {
                if row.path.is_empty() {
                    writeln!(out, "{}  {}", row.id, row.title)?;
                } else {
                    writeln!(out, "{}  {}  ({})", row.id, row.title, row.path)?;
                }
            }
            writeln!(out, "\n{} note(s)", rows.len())?;
        }
        QueryResults::Table(rows) => {
            let Some(first) = rows.first() else {
                out.push_str("No matching notes found.\n");
                return Ok(out);
            };
            let header: Vec<&str> = first.cells().map(|(name, _)| name).collect();
            writeln!(out, "{}", header.join(" | "))?;
            writeln!(
                out,
                "{}",
                header
                    .iter()
                    .map(|h| "-".repeat(h.chars().count().max(3)))
                    .collect::<Vec<_>>()
                    .join("-|-")
            )?;
            for row in rows {
                let cells: Vec<String> = row.cells().map(|(_, value)| cell(value)).collect();
                writeln!(out, "{}", cells.join(" | "))?;
            }
            writeln!(out, "\n{} row(s)", rows.len())?;
        }
        QueryResults::Task(rows) => {
            if rows.is_empty() {
                out.push_str("No notes with open tasks found.\n");
                return Ok(out);
            }
            for row in rows {
                writeln!(out, "{} ({})", row.title, row.id)?;
                for task in &row.tasks {
                    let mark = if task.checked { 'x' } else { ' ' };
                    writeln!(out, "  - [{}] {}", mark, task.content)?;
                }
            }
            writeln!(out, "\n{} note(s)", rows.len())?;
        }
        QueryResults::Count(count) => {
            writeln!(out, "{}", count.count)?;
        }
    }
    Ok(out)
}

fn cell(value: &Value) -> String {
    match value {
        Value::Null => "-".to_string(),
        other => truncate_str(&other.to_string(), 40),
    }
}
