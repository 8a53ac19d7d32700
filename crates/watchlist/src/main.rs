//! Watchlist CLI application.
//!
//! Renders the watchlist page from local storage and applies removals.
//! Every command rewrites the page document so it reflects the stored list.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{Config, DataPaths, RecordView, SqliteStore, WATCHLIST_KEY};
use std::path::PathBuf;
use tracing::{info, warn};
use watchlist::{Watchlist, WatchlistPage};

#[derive(Parser, Debug)]
#[command(author, version, about = "Manage the saved anime watchlist", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List saved anime and render the watchlist page
    List,
    /// Open the detail view for the entry at INDEX
    Show {
        /// Position in the watchlist, starting at 0
        index: usize,
    },
    /// Remove the entry at INDEX
    Remove {
        /// Position in the watchlist, starting at 0
        index: usize,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = shared::LogConfig::from_config(&config, "watchlist");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    let data_paths = DataPaths::from_config(&config);
    data_paths
        .create_dirs()
        .context("Failed to create data directories")?;

    let storage_path = config.storage_path();
    info!(storage = %storage_path.display(), origin = %config.storage.origin, "Opening local storage");
    let store = SqliteStore::open(&storage_path, config.storage.origin.clone())
        .context("Failed to open local storage")?;

    let mut page = WatchlistPage::new(Watchlist::new(store));

    match args.command {
        Command::List => print_list(&page),
        Command::Show { index } => {
            if page.open(index)? {
                if let Some(record) = page.modal().selected() {
                    println!("{}", record.title());
                    println!("{}", record.info_line());
                    println!();
                    println!("{}", record.synopsis_label());
                }
            } else {
                println!("No saved anime at position {}.", index);
            }
        }
        Command::Remove { index } => match page.remove(index)? {
            Some(removed) => {
                println!("\"{}\" was removed from your watchlist.", removed.title);
                print_list(&page);
            }
            None => println!("No saved anime at position {}.", index),
        },
    }

    let page_path = data_paths.watchlist_page();
    data_paths.write_page(&page_path, &page.document())?;
    info!(page = %page_path.display(), "Watchlist page rendered");

    Ok(())
}

fn print_list(page: &WatchlistPage<SqliteStore>) {
    let list = page.watchlist().load();
    if list.is_empty() {
        println!("No saved anime!");
        return;
    }

    for (index, entry) in list.iter().enumerate() {
        println!("[{}] {}  ({})", index, entry.title(), entry.info_line());
    }

    match page.watchlist().store().updated_at(WATCHLIST_KEY) {
        Ok(Some(updated_at)) => println!("\nLast saved {}", updated_at.format("%Y-%m-%d %H:%M UTC")),
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Could not read watchlist timestamp"),
    }
}
