//! MTGO Getter - card market data downloader
//!
//! Downloads Goatbots price history / card definitions (or any zip archive)
//! and decodes Scryfall bulk data exports.

use clap::{Parser, Subcommand};
use mtgogetter::router::default_data_dir;
use mtgogetter::scryfall::price_text;
use mtgogetter::{
    download, read_bulk_data, update_all, ArchiveFetcher, DownloadOutcome, Endpoints,
    GetterError, ScryfallCard, UpdateReport,
};
use std::path::PathBuf;
use std::time::Duration;

/// Fetch MTGO card market data
#[derive(Parser, Debug)]
#[command(name = "mtgogetter")]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download and extract an archive: price-history, card-definitions or custom
    #[command(visible_aliases = ["down", "dl"])]
    Download {
        /// Source to download
        source: String,

        /// Archive URL (custom downloads only)
        #[arg(long)]
        url: Option<String>,

        /// Directory to extract into (required for custom downloads)
        #[arg(long)]
        dest: Option<PathBuf>,

        /// Give up on the request after this many seconds
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: u64,
    },
    /// Decode a Scryfall bulk data JSON export that is already on disk
    Parse {
        /// Path to the bulk data file
        file: PathBuf,
    },
    /// Fetch every source that changed since the last update
    #[command(visible_alias = "up")]
    Update {
        /// Data directory (default: ~/.local/share/mtgogetter)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Give up on each request after this many seconds
        #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
        timeout_secs: u64,
    },
}

fn main() {
    // Set RUST_LOG to control log level, e.g. RUST_LOG=mtgogetter=debug
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        log::error!("{e}");
        eprintln!("Error: {e}");
        std::process::exit(e.exit_code());
    }
}

fn run(command: Command) -> Result<(), GetterError> {
    match command {
        Command::Download {
            source,
            url,
            dest,
            timeout_secs,
        } => {
            let outcome = download(
                &source,
                url.as_deref(),
                dest.as_deref(),
                Duration::from_secs(timeout_secs),
            )?;
            print_outcome(&outcome);
        }
        Command::Parse { file } => {
            let cards = read_bulk_data(&file)?;
            print_card_summary(&cards);
        }
        Command::Update { dir, timeout_secs } => {
            let dir = dir.unwrap_or_else(default_data_dir);
            let fetcher = ArchiveFetcher::new(Duration::from_secs(timeout_secs))?;
            let report = update_all(&dir, &fetcher, &Endpoints::default())?;
            print_update_report(&dir, &report);
        }
    }
    Ok(())
}

fn print_update_report(dir: &std::path::Path, report: &UpdateReport) {
    if !report.fetched_anything() {
        println!("Everything in {} is up to date", dir.display());
    }
    for file in &report.files {
        println!("  {}", file.display());
    }
    let next = &report.next_released_set;
    if let (Some(name), Some(released_at)) = (&next.name, next.released_at) {
        println!("Next MTGO set: {} ({})", name, released_at);
    }
}

fn print_outcome(outcome: &DownloadOutcome) {
    println!(
        "Downloaded {} from {}",
        outcome.spec.source, outcome.spec.url
    );
    for file in &outcome.files {
        println!("  {}", file.display());
    }
    if let Some(cards) = &outcome.cards {
        print_card_summary(cards);
    }
}

fn print_card_summary(cards: &[ScryfallCard]) {
    let foils = cards.iter().filter(|c| c.has_foil()).count();
    let tix_priced = cards.iter().filter(|c| c.prices.tix.is_some()).count();
    println!(
        "Decoded {} cards ({} with foil printings, {} with tix prices)",
        cards.len(),
        foils,
        tix_priced
    );
    if let Some(first) = cards.first() {
        println!(
            "  first: #{} {} ({}, {}) tix={}",
            first.mtgo_id,
            first.name,
            first.rarity,
            first.released_at,
            price_text(&first.prices.tix)
        );
    }
}
