//! Scryfall bulk data decoding
//!
//! Decoding is a pure function over bytes. Reading the export from disk is
//! a separate step (`read_bulk_data`) so the decoder can be tested without
//! a filesystem.

use crate::error::{GetterError, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// A price quote kept as the exact decimal text from the export.
///
/// Never converted to a float, so `"0.10"` stays `"0.10"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Price(String);

impl Price {
    /// The price exactly as it appeared in the source
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Price {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if is_decimal_literal(s) {
            Ok(Price(s.to_string()))
        } else {
            Err(format!("invalid decimal price '{}'", s))
        }
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// `digits` or `digits.digits`
fn is_decimal_literal(s: &str) -> bool {
    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, Some(frac)),
        None => (s, None),
    };
    let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
    all_digits(whole) && frac.map_or(true, all_digits)
}

/// Text view of an optional price, with the empty string for "no price"
pub fn price_text(price: &Option<Price>) -> &str {
    price.as_ref().map_or("", Price::as_str)
}

/// Prices at snapshot time. `None` means no price was quoted.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct ScryfallPrices {
    #[serde(default, deserialize_with = "deserialize_price")]
    pub usd: Option<Price>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub usd_foil: Option<Price>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub eur: Option<Price>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub eur_foil: Option<Price>,
    #[serde(default, deserialize_with = "deserialize_price")]
    pub tix: Option<Price>,
}

/// Card record from a Scryfall bulk data export
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ScryfallCard {
    pub mtgo_id: u32,
    /// 0 when no foil printing exists
    #[serde(default, deserialize_with = "deserialize_foil_id")]
    pub mtgo_foil_id: u32,
    pub name: String,
    pub released_at: String,
    pub rarity: String,
    /// A missing or `null` prices object means no prices at all
    #[serde(default, deserialize_with = "deserialize_prices")]
    pub prices: ScryfallPrices,
}

impl ScryfallCard {
    pub fn has_foil(&self) -> bool {
        self.mtgo_foil_id != 0
    }
}

fn deserialize_price<'de, D>(deserializer: D) -> std::result::Result<Option<Price>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        None => Ok(None),
        Some(text) if text.is_empty() => Ok(None),
        Some(text) => text.parse().map(Some).map_err(serde::de::Error::custom),
    }
}

fn deserialize_prices<'de, D>(deserializer: D) -> std::result::Result<ScryfallPrices, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ScryfallPrices>::deserialize(deserializer)?.unwrap_or_default())
}

fn deserialize_foil_id<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<u32>::deserialize(deserializer)?.unwrap_or(0))
}

/// Decode a bulk data export (a JSON array of card objects).
///
/// All or nothing: one malformed record fails the whole call. Record order
/// follows the source array.
pub fn decode_bulk_data(bytes: &[u8]) -> Result<Vec<ScryfallCard>> {
    let cards: Vec<ScryfallCard> = serde_json::from_slice(bytes)?;

    let mut seen = HashSet::with_capacity(cards.len());
    for card in &cards {
        if !seen.insert(card.mtgo_id) {
            return Err(GetterError::DuplicateMtgoId(card.mtgo_id));
        }
    }

    Ok(cards)
}

/// Read a bulk data export from disk and decode it
pub fn read_bulk_data(path: &Path) -> Result<Vec<ScryfallCard>> {
    let bytes = std::fs::read(path).map_err(|e| GetterError::io(path, e))?;
    decode_bulk_data(&bytes)
}

#[cfg(test)]
#[path = "scryfall_tests.rs"]
mod tests;
