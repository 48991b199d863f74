//! MTGO Getter - card market data downloader
//!
//! Downloads the price history and card definition archives, extracts them
//! and decodes Scryfall bulk data exports into typed card records. The
//! `update` flow keeps a local data directory current, using
//! `fetch_log.toml` to skip sources that haven't changed.

pub mod error;
pub mod fetch_log;
pub mod fetcher;
pub mod router;
pub mod scryfall;
pub mod scryfall_api;
pub mod update;

pub use error::{GetterError, Result};
pub use fetch_log::FetchLog;
pub use fetcher::{extract_archive, ArchiveFetcher, DEFAULT_TIMEOUT};
pub use router::{download, resolve, DownloadOutcome, DownloadSpec, Router, SourceTag};
pub use scryfall::{decode_bulk_data, read_bulk_data, Price, ScryfallCard, ScryfallPrices};
pub use scryfall_api::{BulkDataInfo, MtgoSet};
pub use update::{update_all, Endpoints, UpdateReport};
