//! CLI command definitions and handlers

pub mod config;
pub mod handlers;
pub mod logging;
pub mod output;

use clap::{ArgAction, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use output::OutputFormat;

/// notedex - index and query markdown notes by their metadata
#[derive(Parser, Debug)]
#[command(name = "notedex", version, about, long_about = None)]
pub struct Cli {
    /// Notes directory (overrides config file)
    #[arg(short = 'd', long, global = true, conflicts_with = "notes")]
    pub dir: Option<PathBuf>,

    /// Read notes from a JSON export instead of a directory
    #[arg(long, global = true)]
    pub notes: Option<PathBuf>,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the index, reusing the cached snapshot when it is current
    Index(IndexArgs),

    /// Run a query (LIST, TABLE, TASK or COUNT)
    Query(QueryArgs),

    /// Search note titles, tags and frontmatter
    Search(SearchArgs),

    /// List all tags
    Tags(TagsArgs),

    /// Show a note's metadata
    Show(ShowArgs),

    /// Show notes that link to a given note
    Backlinks(BacklinksArgs),

    /// Show notes whose wiki-links name a target
    Linking(LinkingArgs),

    /// List notes whose frontmatter key equals a value
    Where(WhereArgs),

    /// Check index consistency and unresolved links
    Check(CheckArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `index` command
#[derive(Parser, Debug)]
pub struct IndexArgs {
    /// Force full rebuild instead of seeding from the snapshot
    #[arg(long)]
    pub full: bool,
}

/// Arguments for the `query` command
#[derive(Parser, Debug)]
pub struct QueryArgs {
    /// Query text, e.g. 'LIST FROM #project WHERE status = "Active"'
    pub query: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `search` command
#[derive(Parser, Debug)]
pub struct SearchArgs {
    /// Search text
    pub query: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `tags` command
#[derive(Parser, Debug)]
pub struct TagsArgs {
    /// Show note counts for each tag
    #[arg(long)]
    pub counts: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `show` command
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Note ID or title
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `backlinks` command
#[derive(Parser, Debug)]
pub struct BacklinksArgs {
    /// Note ID or title
    pub note: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `linking` command
#[derive(Parser, Debug)]
pub struct LinkingArgs {
    /// Link target as written inside [[...]]
    pub target: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `where` command
#[derive(Parser, Debug)]
pub struct WhereArgs {
    /// Frontmatter key
    pub key: String,

    /// Value to match (parsed like a query literal)
    pub value: String,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Human)]
    pub format: OutputFormat,
}

/// Arguments for the `check` command
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// Hide warnings (unresolved links)
    #[arg(short, long)]
    pub quiet: bool,
}

/// Arguments for the `completions` command
#[derive(Parser, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for (bash, zsh, fish)
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_query_with_format() {
        let cli = Cli::try_parse_from(["notedex", "query", "COUNT", "-f", "json"]).unwrap();
        match cli.command {
            Command::Query(args) => {
                assert_eq!(args.query, "COUNT");
                assert!(matches!(args.format, OutputFormat::Json));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn dir_and_notes_conflict() {
        let result = Cli::try_parse_from([
            "notedex", "--dir", "vault", "--notes", "notes.json", "tags",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn verbosity_counts_flags() {
        let cli = Cli::try_parse_from(["notedex", "-vv", "check"]).unwrap();
        assert_eq!(cli.verbose, 2);
    }
}
