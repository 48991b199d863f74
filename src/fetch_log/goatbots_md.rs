//! Goatbots section of the fetch log

use chrono::{DateTime, NaiveDate, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

/// Goatbots rebuilds its price history once a day at this hour (UTC)
const PRICE_UPDATE_HOUR_UTC: i64 = 4;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GoatbotsMetaData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_definitions_updated_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prices_updated_at: Option<DateTime<Utc>>,
}

impl GoatbotsMetaData {
    /// Prices are current if they were fetched after the most recent daily
    /// rebuild
    pub fn is_prices_updated(&self, now: DateTime<Utc>) -> bool {
        self.prices_updated_at
            .is_some_and(|updated_at| price_day(updated_at) >= price_day(now))
    }
}

/// Day of the price snapshot that was live at `at`
fn price_day(at: DateTime<Utc>) -> NaiveDate {
    (at - TimeDelta::hours(PRICE_UPDATE_HOUR_UTC)).date_naive()
}
