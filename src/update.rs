//! Bring every data source up to date, skipping the ones that are current
//!
//! Freshness is tracked in `fetch_log.toml` inside the save directory. The
//! log is written after each source succeeds, so a failure part way
//! through doesn't redo finished downloads on the next run.

use crate::error::{GetterError, Result};
use crate::fetch_log::{self, FetchLog, NextReleasedMtgoSet};
use crate::fetcher::ArchiveFetcher;
use crate::router::{CARD_DEFINITIONS_URL, PRICE_HISTORY_URL};
use crate::scryfall::decode_bulk_data;
use crate::scryfall_api::{self, BulkDataInfo};
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};

/// File the Scryfall bulk data is saved as
pub const SCRYFALL_BULK_FILENAME: &str = "default-cards.json";

/// Where each source is fetched from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub price_history: String,
    pub card_definitions: String,
    pub scryfall_bulk_info: String,
    pub scryfall_sets: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            price_history: PRICE_HISTORY_URL.to_string(),
            card_definitions: CARD_DEFINITIONS_URL.to_string(),
            scryfall_bulk_info: scryfall_api::BULK_DATA_INFO_URL.to_string(),
            scryfall_sets: scryfall_api::SETS_URL.to_string(),
        }
    }
}

/// What an update run did
#[derive(Debug, Default)]
pub struct UpdateReport {
    /// Files written, in fetch order
    pub files: Vec<PathBuf>,
    pub scryfall_bulk_fetched: bool,
    pub card_definitions_fetched: bool,
    pub prices_fetched: bool,
    pub next_released_set: NextReleasedMtgoSet,
}

impl UpdateReport {
    pub fn fetched_anything(&self) -> bool {
        self.scryfall_bulk_fetched || self.card_definitions_fetched || self.prices_fetched
    }
}

/// Fetch every stale source into `save_dir`.
///
/// Card definitions staleness is decided against the next set as known
/// before this run, so a release that happened since the last run still
/// triggers a download after the set lookup moves on to the following set.
pub fn update_all(
    save_dir: &Path,
    fetcher: &ArchiveFetcher,
    endpoints: &Endpoints,
) -> Result<UpdateReport> {
    fs::create_dir_all(save_dir).map_err(|e| GetterError::io(save_dir, e))?;
    let log_path = save_dir.join(fetch_log::FILENAME);
    let mut state = FetchLog::load(&log_path)?;
    let mut report = UpdateReport::default();

    let now = Utc::now();
    let card_definitions_stale = !state.is_card_definitions_updated(now);

    if state.needs_next_set_refresh(now.date_naive()) {
        let sets = scryfall_api::fetch_mtgo_sets(fetcher, &endpoints.scryfall_sets)?;
        match scryfall_api::next_released_mtgo_set(now.date_naive(), &sets) {
            Some(next) => {
                log::info!("Next MTGO set: {} ({})", next.name, next.released_at);
                state.replace_next_released_set(next);
                state.save(&log_path)?;
            }
            None => log::warn!("No upcoming MTGO set announced"),
        }
    }
    report.next_released_set = state.scryfall().next_released_mtgo_set.clone();

    let bulk_info = BulkDataInfo::fetch(fetcher, &endpoints.scryfall_bulk_info)?;
    if state.is_scryfall_bulk_updated(bulk_info.updated_at()) {
        log::info!("Scryfall bulk data is up to date");
    } else {
        let bytes = fetcher.fetch_bytes(bulk_info.download_url().as_str())?;
        let cards = decode_bulk_data(&bytes)?;
        log::info!("Decoded {} cards", cards.len());
        let bulk_path = save_dir.join(SCRYFALL_BULK_FILENAME);
        fs::write(&bulk_path, &bytes).map_err(|e| GetterError::io(&bulk_path, e))?;
        state.refresh_scryfall_bulk_timestamp(Utc::now());
        state.save(&log_path)?;
        report.files.push(bulk_path);
        report.scryfall_bulk_fetched = true;
    }

    if card_definitions_stale {
        let files = fetcher.fetch_and_extract(&endpoints.card_definitions, save_dir)?;
        state.refresh_card_definitions_timestamp(Utc::now());
        state.save(&log_path)?;
        report.files.extend(files);
        report.card_definitions_fetched = true;
    } else {
        log::info!("Card definitions are up to date");
    }

    if state.is_goatbots_prices_updated(Utc::now()) {
        log::info!("Price history is up to date");
    } else {
        let files = fetcher.fetch_and_extract(&endpoints.price_history, save_dir)?;
        state.refresh_goatbots_prices_timestamp(Utc::now());
        state.save(&log_path)?;
        report.files.extend(files);
        report.prices_fetched = true;
    }

    Ok(report)
}
