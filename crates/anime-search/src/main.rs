//! Anime search CLI application.
//!
//! One-shot searches, the provider's category list, or an interactive session
//! where every input line is a page event. The search page document is
//! rewritten after each event.

use anime_search::repl::{self, Command};
use anime_search::{
    build_provider, SearchController, SearchError, SearchOutcome, SearchProvider, SearchTicket,
};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use shared::{Config, DataPaths, RecordView, SearchResult, SqliteStore};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, info};
use watchlist::Watchlist;

#[derive(Parser, Debug)]
#[command(author, version, about = "Search anime and save favorites to a watchlist", long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Mode,
}

#[derive(Subcommand, Debug)]
enum Mode {
    /// Run one search and render the search page
    Search {
        /// Free-text query
        query: Vec<String>,

        /// Only show records of this genre or type
        #[arg(short = 'g', long)]
        category: Option<String>,

        /// Open the detail view for this card
        #[arg(short, long)]
        open: Option<usize>,

        /// Save the opened card to the watchlist
        #[arg(long, requires = "open")]
        save: bool,
    },
    /// List the categories the search provider knows about
    Categories,
    /// Interactive search session
    Interactive,
}

/// Everything a search-page handler needs
struct Session {
    provider: Arc<dyn SearchProvider>,
    controller: SearchController,
    watchlist: Watchlist<SqliteStore>,
    paths: DataPaths,
    categories: Vec<String>,
}

impl Session {
    fn write_page(&self) -> Result<()> {
        let path = self.paths.search_page();
        self.paths
            .write_page(&path, &self.controller.document(&self.categories))
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::from_file(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;

    // Initialize logging
    let mut log_config = shared::LogConfig::from_config(&config, "anime-search");
    if args.verbose {
        log_config.default_level = tracing::Level::DEBUG;
    }
    shared::logging::init(log_config)?;

    info!(provider = %config.search.provider, "Anime search starting");

    let paths = DataPaths::from_config(&config);
    paths
        .create_dirs()
        .context("Failed to create data directories")?;

    let provider = build_provider(&config.search).context("Failed to create search client")?;

    if let Mode::Categories = args.command {
        let categories = provider
            .categories()
            .await
            .context("Failed to fetch categories")?;
        for category in categories {
            println!("{}", category);
        }
        return Ok(());
    }

    let storage_path = config.storage_path();
    info!(storage = %storage_path.display(), "Opening local storage");
    let store = SqliteStore::open(&storage_path, config.storage.origin.clone())
        .context("Failed to open local storage")?;

    let mut session = Session {
        provider,
        controller: SearchController::new(config.search.page_size),
        watchlist: Watchlist::new(store),
        paths,
        categories: config.search.categories.clone(),
    };

    match args.command {
        Mode::Search {
            query,
            category,
            open,
            save,
        } => run_search(&mut session, &query.join(" "), category.as_deref(), open, save).await?,
        Mode::Interactive => run_interactive(&mut session).await?,
        Mode::Categories => {}
    }

    info!(page = %session.paths.search_page().display(), "Search page rendered");
    Ok(())
}

async fn run_search(
    session: &mut Session,
    query: &str,
    category: Option<&str>,
    open: Option<usize>,
    save: bool,
) -> Result<()> {
    let outcome = session
        .controller
        .submit_search(session.provider.as_ref(), query, category)
        .await;

    match outcome {
        Ok(outcome) => report(&session.controller, outcome),
        Err(notice) => println!("{}", notice),
    }

    if let Some(card_id) = open {
        if session.controller.select_card(card_id) {
            print_details(&session.controller);
            if save {
                let notice = session.controller.save_selected(&mut session.watchlist)?;
                println!("{}", notice);
            }
        } else {
            println!("No card {}.", card_id);
        }
    }

    session.write_page()
}

type SearchResponse = (SearchTicket, Result<Vec<SearchResult>, SearchError>);

async fn run_interactive(session: &mut Session) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<SearchResponse>();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("{}", repl::HELP);
    session.write_page()?;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read input")? else {
                    break;
                };

                match repl::parse(&line) {
                    Ok(Command::Quit) => break,
                    Ok(command) => handle_command(session, command, &tx)?,
                    Err(message) => println!("{}", message),
                }
            }
            Some((ticket, response)) = rx.recv() => {
                let outcome = session.controller.finish_search(ticket, response);
                report(&session.controller, outcome);
            }
        }

        session.write_page()?;
    }

    Ok(())
}

fn handle_command(
    session: &mut Session,
    command: Command,
    tx: &mpsc::UnboundedSender<SearchResponse>,
) -> Result<()> {
    match command {
        Command::Search(text) => {
            let category = session.controller.category().map(str::to_string);
            match session.controller.begin_search(&text, category.as_deref()) {
                Ok((ticket, query)) => {
                    println!("{}", shared::html::SEARCHING);
                    let provider = Arc::clone(&session.provider);
                    let tx = tx.clone();
                    tokio::spawn(async move {
                        let response = provider.search(&query).await;
                        // The receiver only goes away when the session ends
                        let _ = tx.send((ticket, response));
                    });
                }
                Err(notice) => println!("{}", notice),
            }
        }
        Command::Category(category) => {
            session.controller.set_category(category.as_deref());
            if !session.controller.is_pending() {
                print_cards(&session.controller);
            }
        }
        Command::Open(card_id) => {
            if session.controller.select_card(card_id) {
                print_details(&session.controller);
            } else {
                println!("No card {}.", card_id);
            }
        }
        Command::Save => {
            let notice = session.controller.save_selected(&mut session.watchlist)?;
            println!("{}", notice);
        }
        Command::Modal(event) => {
            if session.controller.handle_modal(&event) {
                println!("(closed)");
            }
        }
        Command::Cards => print_cards(&session.controller),
        Command::Help => println!("{}", repl::HELP),
        Command::Quit => {}
    }
    Ok(())
}

fn report(controller: &SearchController, outcome: SearchOutcome) {
    match outcome {
        SearchOutcome::Rendered { .. } => print_cards(controller),
        SearchOutcome::NoResults => println!("{}", shared::html::NO_RESULTS),
        SearchOutcome::Failed => println!("{}", shared::html::LOAD_ERROR),
        SearchOutcome::Stale => debug!("Stale response dropped"),
    }
}

fn print_cards(controller: &SearchController) {
    if controller.cards().is_empty() {
        println!("{}", shared::html::NO_RESULTS);
        return;
    }
    for (card_id, record) in controller.cards() {
        println!("[{}] {}  ({})", card_id, record.title(), record.info_line());
    }
}

fn print_details(controller: &SearchController) {
    if let Some(record) = controller.modal().selected() {
        println!();
        println!("{}", record.title());
        println!("{}", record.info_line());
        if let Some(image) = record.image() {
            println!("{}", image);
        }
        println!();
        println!("{}", record.synopsis_label());
        println!();
    }
}
