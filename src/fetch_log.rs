//! Local record of when each data source was last fetched
//!
//! Persisted as `fetch_log.toml` next to the downloaded data so repeated
//! runs can skip sources that are still current.

use crate::error::{GetterError, Result};
use crate::scryfall_api::MtgoSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub mod goatbots_md;
pub mod scryfall_md;

pub use goatbots_md::GoatbotsMetaData;
pub use scryfall_md::{NextReleasedMtgoSet, ScryfallMetaData};

pub const FILENAME: &str = "fetch_log.toml";
const DESCRIPTION: &str = "log for MTGO Getter state, such as updated_at timestamps";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FetchLog {
    #[serde(default = "default_description")]
    description: String,
    #[serde(default)]
    goatbots: GoatbotsMetaData,
    #[serde(default)]
    scryfall: ScryfallMetaData,
}

fn default_description() -> String {
    DESCRIPTION.to_string()
}

impl Default for FetchLog {
    fn default() -> Self {
        Self::new()
    }
}

impl FetchLog {
    /// Empty log; every source counts as stale
    pub fn new() -> Self {
        Self {
            description: default_description(),
            goatbots: GoatbotsMetaData::default(),
            scryfall: ScryfallMetaData::default(),
        }
    }

    /// Load the log from `path`, or start a fresh one if it doesn't exist yet
    pub fn load(path: &Path) -> Result<Self> {
        match fs::read_to_string(path) {
            Ok(contents) => Self::from_toml(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("No fetch log at {}, starting fresh", path.display());
                Ok(Self::new())
            }
            Err(e) => Err(GetterError::io(path, e)),
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = self.to_toml()?;
        fs::write(path, contents).map_err(|e| GetterError::io(path, e))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn goatbots(&self) -> &GoatbotsMetaData {
        &self.goatbots
    }

    pub fn scryfall(&self) -> &ScryfallMetaData {
        &self.scryfall
    }

    pub fn is_goatbots_prices_updated(&self, now: DateTime<Utc>) -> bool {
        self.goatbots.is_prices_updated(now)
    }

    /// Card definitions only change when a new set is released on MTGO, so
    /// they are current if fetched on or after the last known release.
    /// Without a known next set there's no way to tell, so they're stale.
    pub fn is_card_definitions_updated(&self, now: DateTime<Utc>) -> bool {
        let Some(updated_at) = self.goatbots.card_definitions_updated_at else {
            return false;
        };
        let Some(released_at) = self.scryfall.next_released_mtgo_set.released_at else {
            return false;
        };
        released_at > now.date_naive() || updated_at.date_naive() >= released_at
    }

    /// True if the local bulk data is newer than what the API reports
    pub fn is_scryfall_bulk_updated(&self, api_updated_at: DateTime<Utc>) -> bool {
        self.scryfall
            .bulk_data_updated_at
            .is_some_and(|local| local > api_updated_at)
    }

    pub fn refresh_goatbots_prices_timestamp(&mut self, now: DateTime<Utc>) {
        self.goatbots.prices_updated_at = Some(now);
    }

    pub fn refresh_card_definitions_timestamp(&mut self, now: DateTime<Utc>) {
        self.goatbots.card_definitions_updated_at = Some(now);
    }

    pub fn refresh_scryfall_bulk_timestamp(&mut self, now: DateTime<Utc>) {
        self.scryfall.bulk_data_updated_at = Some(now);
    }

    /// The stored next set is missing or has already come out
    pub fn needs_next_set_refresh(&self, today: NaiveDate) -> bool {
        self.scryfall.next_released_mtgo_set.is_stale(today)
    }

    pub fn replace_next_released_set(&mut self, set: &MtgoSet) {
        self.scryfall.next_released_mtgo_set = NextReleasedMtgoSet::from(set);
    }
}

#[cfg(test)]
#[path = "fetch_log_tests.rs"]
mod tests;
