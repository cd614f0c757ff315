//! disambiguate: alias-aware link resolution for an Obsidian vault.
//!
//! One-shot commands print JSON to stdout. `serve` answers JSON-lines
//! requests on stdin while watching the vault for changes. Logs go to stderr.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use alias_index::NavigationRequest;
use disambiguate::{Config, FileWatcher, Request, Session, Vault};

#[derive(Parser, Debug)]
#[command(name = "disambiguate")]
#[command(about = "Alias-aware link resolution for Obsidian vaults")]
struct Args {
    /// Path to the vault directory (defaults to $DISAMBIGUATE_VAULT_PATH)
    #[arg(short, long, global = true)]
    vault: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decide what following a link would do
    Resolve {
        /// Note the link is written in
        #[arg(long)]
        from: String,
        /// Link text, e.g. "Meeting Notes" or "Note#Heading|shown"
        linktext: String,
        /// Open in a new pane
        #[arg(long)]
        new_leaf: bool,
    },
    /// Suggest notes for a query, best match first
    Search {
        /// Note the search is made from
        #[arg(long)]
        from: String,
        query: String,
    },
    /// Decide every wiki link in a note
    Links {
        note: String,
    },
    /// Answer JSON-lines requests on stdin until it closes
    Serve,
}

fn print_json(value: &impl Serialize) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up logging - respects RUST_LOG env var, defaults to info (or debug with --verbose)
    let default_filter = if args.verbose {
        "debug,disambiguate=debug"
    } else {
        "info,disambiguate=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = Config::load(args.vault)?;
    info!("Vault: {} ({})", config.vault_name, config.vault_path.display());

    let vault = Vault::open(&config.vault_path)
        .await
        .with_context(|| format!("Failed to scan vault {}", config.vault_path.display()))?;
    let mut session = Session::new(vault);

    match args.command {
        Command::Resolve {
            from,
            linktext,
            new_leaf,
        } => {
            let mut request =
                NavigationRequest::new(linktext, obsidian_fs::note_path_from_input(&from));
            request.new_leaf = new_leaf;
            print_json(&session.resolve(&request))?;
        }
        Command::Search { from, query } => {
            let response = session.handle(Request::Search {
                query,
                source_path: obsidian_fs::note_path_from_input(&from),
            });
            print_json(&response)?;
        }
        Command::Links { note } => {
            let note = obsidian_fs::note_path_from_input(&note);
            let report = session
                .link_report(&note)
                .await
                .with_context(|| format!("Failed to read note {}", note))?;
            print_json(&report)?;
        }
        Command::Serve => {
            let mut watcher = FileWatcher::new(session.vault().root().to_path_buf())?;
            info!("File watcher started, reading requests from stdin");

            let stdin = BufReader::new(tokio::io::stdin());
            session
                .run(stdin, tokio::io::stdout(), watcher.event_rx())
                .await?;
        }
    }

    Ok(())
}
