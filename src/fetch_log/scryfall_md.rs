//! Scryfall section of the fetch log

use crate::scryfall_api::MtgoSet;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScryfallMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bulk_data_updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_released_mtgo_set: NextReleasedMtgoSet,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NextReleasedMtgoSet {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub released_at: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mtgo_code: Option<String>,
}

impl NextReleasedMtgoSet {
    pub fn is_any_none(&self) -> bool {
        self.name.is_none() || self.released_at.is_none() || self.mtgo_code.is_none()
    }

    /// Needs a fresh lookup once the stored set is incomplete or released
    pub fn is_stale(&self, today: NaiveDate) -> bool {
        match self.released_at {
            Some(released_at) => self.is_any_none() || released_at <= today,
            None => true,
        }
    }
}

impl From<&MtgoSet> for NextReleasedMtgoSet {
    fn from(set: &MtgoSet) -> Self {
        Self {
            name: Some(set.name.clone()),
            released_at: Some(set.released_at),
            mtgo_code: Some(set.mtgo_code.clone()),
        }
    }
}
