//! Binary entry point that glues the SQLite-backed store to the TUI. We bring
//! up the store, count the visit, warm the asset cache, and drive the Ratatui
//! event loop until the user exits. The `import` and `list` subcommands reuse
//! the same pieces without the terminal UI.
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};

use hymnal_viewer::config::{load_language_aliases, Config};
use hymnal_viewer::import::import_file;
use hymnal_viewer::offline::{HttpNetwork, Network, OfflineCache};
use hymnal_viewer::store::{ensure_schema, SONGS_PATH, VISITS_PATH};
use hymnal_viewer::visits::{count_visit_once, LocalFlags};
use hymnal_viewer::{filter, logging, project, run_app, App, LanguageFacet, RealtimeStore, SqliteStore, Viewer};

#[derive(Parser, Debug)]
#[command(name = "hymnal-viewer")]
#[command(about = "Browse, search, and read hymns in the terminal")]
#[command(version)]
struct Cli {
    /// Directory holding the database, flags, logs, and languages.toml
    #[arg(long, global = true, env = "HYMNAL_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Origin serving the web app assets
    #[arg(long, global = true, env = "HYMNAL_ORIGIN")]
    origin: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Load a realtime-database JSON export into the local store
    Import {
        /// Export file (whole database or just the songs tree)
        file: PathBuf,
    },
    /// Print the visible catalog without starting the TUI
    List {
        /// Substring matched against id, title, and display title
        #[arg(long, default_value = "")]
        search: String,
        /// Language facet name, or `All`
        #[arg(long, default_value = "All")]
        language: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.data_dir, cli.origin)?;

    match cli.command {
        Some(Command::Import { file }) => {
            logging::init_stderr()?;
            let store = open_store(&config)?;
            let count = import_file(&store, &file)?;
            println!("Imported {count} songs into {}.", config.db_path().display());
            Ok(())
        }
        Some(Command::List { search, language }) => {
            logging::init_stderr()?;
            let aliases = load_language_aliases(&config.languages_path())?;
            let store = open_store(&config)?;
            let songs = project(store.get(SONGS_PATH)?.as_ref());
            for song in filter(&songs, &search, &LanguageFacet::parse(&language), &aliases) {
                println!("{}", song.heading());
            }
            Ok(())
        }
        None => run_viewer(&config),
    }
}

fn open_store(config: &Config) -> Result<SqliteStore> {
    Ok(SqliteStore::new(ensure_schema(&config.db_path())?))
}

/// Initialize persistence, count the visit, and launch the Ratatui event loop.
fn run_viewer(config: &Config) -> Result<()> {
    logging::init_file(&config.log_path())?;
    info!(data_dir = %config.data_dir.display(), origin = %config.origin, "starting hymnal viewer");

    let aliases = load_language_aliases(&config.languages_path())?;
    let store = open_store(config)?;
    count_visit_once(&store, &LocalFlags::new(config.flags_dir()));

    let network = HttpNetwork::new(&config.origin).context("invalid asset origin")?;
    let assets = OfflineCache::new(ensure_schema(&config.db_path())?, network);
    prepare_asset_cache(&assets);

    let mut app = App::new(
        Viewer::new(aliases),
        store.subscribe(SONGS_PATH),
        store.subscribe(VISITS_PATH),
        assets,
        config.origin.clone(),
    );
    run_app(&mut app)
}

/// Install the root assets on first run and drop caches from older builds.
/// Failures only mean less works offline, so they are logged and ignored.
fn prepare_asset_cache<N: Network>(assets: &OfflineCache<N>) {
    match assets.is_installed() {
        Ok(true) => {}
        Ok(false) => {
            if let Err(err) = assets.install() {
                warn!(error = %err, "asset cache install failed");
            }
        }
        Err(err) => warn!(error = %err, "asset cache check failed"),
    }
    if let Err(err) = assets.activate() {
        warn!(error = %err, "asset cache activation failed");
    }
}
