//! Scryfall API lookups used to decide what needs downloading
//!
//! The bulk data info endpoint tells where today's default-cards export
//! lives and when it was last rebuilt. The set list tells when the next
//! MTGO set comes out.

use crate::error::{GetterError, Result};
use crate::fetcher::ArchiveFetcher;
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Default cards bulk data info
pub const BULK_DATA_INFO_URL: &str =
    "https://api.scryfall.com/bulk-data/e2ef41e3-5778-4bc2-af3f-78eca4dd9c23";
/// All sets, newest first
pub const SETS_URL: &str = "https://api.scryfall.com/sets";

/// Where the current bulk data export is and how fresh it is
#[derive(Debug, Clone, PartialEq)]
pub struct BulkDataInfo {
    download_url: Url,
    updated_at: DateTime<Utc>,
}

#[derive(Deserialize)]
struct BulkDataInfoResponse {
    download_uri: String,
    updated_at: DateTime<Utc>,
}

impl BulkDataInfo {
    pub fn fetch(fetcher: &ArchiveFetcher, endpoint: &str) -> Result<Self> {
        Self::from_json(&fetcher.fetch_bytes(endpoint)?)
    }

    pub fn from_json(bytes: &[u8]) -> Result<Self> {
        let response: BulkDataInfoResponse = serde_json::from_slice(bytes)?;
        let download_url = Url::parse(&response.download_uri).map_err(|e| {
            GetterError::ApiResponse(format!(
                "invalid download_uri '{}': {}",
                response.download_uri, e
            ))
        })?;

        Ok(Self {
            download_url,
            updated_at: response.updated_at,
        })
    }

    pub fn download_url(&self) -> &Url {
        &self.download_url
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

/// A set that is (or will be) playable on MTGO
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MtgoSet {
    pub name: String,
    pub released_at: NaiveDate,
    pub mtgo_code: String,
}

#[derive(Deserialize)]
struct SetListResponse {
    data: Vec<SetEntry>,
}

#[derive(Deserialize)]
struct SetEntry {
    name: String,
    #[serde(default)]
    released_at: Option<NaiveDate>,
    #[serde(default)]
    mtgo_code: Option<String>,
}

/// Decode a Scryfall set list, keeping only sets with an MTGO code and a
/// release date
pub fn decode_mtgo_sets(bytes: &[u8]) -> Result<Vec<MtgoSet>> {
    let response: SetListResponse = serde_json::from_slice(bytes)?;
    Ok(response
        .data
        .into_iter()
        .filter_map(|set| {
            Some(MtgoSet {
                mtgo_code: set.mtgo_code?,
                released_at: set.released_at?,
                name: set.name,
            })
        })
        .collect())
}

pub fn fetch_mtgo_sets(fetcher: &ArchiveFetcher, endpoint: &str) -> Result<Vec<MtgoSet>> {
    decode_mtgo_sets(&fetcher.fetch_bytes(endpoint)?)
}

/// Earliest set releasing on or after `today`. Ties go to the first listed.
pub fn next_released_mtgo_set(today: NaiveDate, sets: &[MtgoSet]) -> Option<&MtgoSet> {
    sets.iter()
        .filter(|set| set.released_at >= today)
        .min_by_key(|set| set.released_at)
}

#[cfg(test)]
#[path = "scryfall_api_tests.rs"]
mod tests;
