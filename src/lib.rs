//! notedex - a metadata index and query engine for markdown notes

pub mod cli;
pub mod domain;
pub mod index;
pub mod infra;
pub mod query;

use anyhow::Result;
use clap::{CommandFactory, Parser};

use cli::{
    Cli, Command,
    config::Config,
    handlers::{
        Workspace, handle_backlinks, handle_check, handle_index, handle_linking, handle_query,
        handle_search, handle_show, handle_tags, handle_where,
    },
    logging,
};

/// Main entry point for the CLI application.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    logging::init(cli.verbose, config.log_level.as_deref());

    let location = config.notes_location(cli.dir.as_ref(), cli.notes.as_ref());
    let workspace = Workspace::new(location, config.snapshot);
    let verbose = cli.verbose > 0;

    match &cli.command {
        Command::Index(args) => handle_index(args, &workspace, verbose),
        Command::Query(args) => handle_query(args, &workspace),
        Command::Search(args) => handle_search(args, &workspace),
        Command::Tags(args) => handle_tags(args, &workspace),
        Command::Show(args) => handle_show(args, &workspace),
        Command::Backlinks(args) => handle_backlinks(args, &workspace),
        Command::Linking(args) => handle_linking(args, &workspace),
        Command::Where(args) => handle_where(args, &workspace),
        Command::Check(args) => handle_check(args, &workspace),
        Command::Completions(args) => {
            let mut command = Cli::command();
            let name = command.get_name().to_string();
            clap_complete::generate(args.shell, &mut command, name, &mut std::io::stdout());
            Ok(())
        }
    }
}
