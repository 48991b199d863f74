//! Download routing
//!
//! Turns a source tag plus optional `--url`/`--dest` into a `DownloadSpec`,
//! then runs it. All input validation happens in `resolve`, before any
//! network activity.

use crate::error::{GetterError, Result};
use crate::fetcher::ArchiveFetcher;
use crate::scryfall::{read_bulk_data, ScryfallCard};
use reqwest::Url;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Goatbots price history archive
pub const PRICE_HISTORY_URL: &str = "https://www.goatbots.com/download/price-history.zip";
/// Goatbots card definitions archive
pub const CARD_DEFINITIONS_URL: &str = "https://www.goatbots.com/download/card-definitions.zip";

/// Which archive to download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceTag {
    PriceHistory,
    CardDefinitions,
    Custom,
}

impl SourceTag {
    pub const ALL: [SourceTag; 3] = [
        SourceTag::PriceHistory,
        SourceTag::CardDefinitions,
        SourceTag::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceTag::PriceHistory => "price-history",
            SourceTag::CardDefinitions => "card-definitions",
            SourceTag::Custom => "custom",
        }
    }

    /// Compiled-in URL, `None` for custom downloads
    pub fn fixed_url(&self) -> Option<&'static str> {
        match self {
            SourceTag::PriceHistory => Some(PRICE_HISTORY_URL),
            SourceTag::CardDefinitions => Some(CARD_DEFINITIONS_URL),
            SourceTag::Custom => None,
        }
    }
}

impl FromStr for SourceTag {
    type Err = GetterError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "price-history" | "goatbots-price-history" => Ok(SourceTag::PriceHistory),
            "card-definitions" | "goatbots-card-definitions" => Ok(SourceTag::CardDefinitions),
            "custom" => Ok(SourceTag::Custom),
            other => Err(GetterError::Usage(format!(
                "unrecognized source '{}' (expected one of: {})",
                other,
                SourceTag::ALL.map(|tag| tag.as_str()).join(", ")
            ))),
        }
    }
}

impl fmt::Display for SourceTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fully resolved download: where to fetch from and where to extract to
#[derive(Debug, Clone, PartialEq)]
pub struct DownloadSpec {
    pub source: SourceTag,
    pub url: Url,
    pub destination: PathBuf,
}

/// Returns the default data directory: ~/.local/share/mtgogetter
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mtgogetter")
}

/// Returns the default destination: ~/.local/share/mtgogetter/<source>
pub fn default_destination(source: SourceTag) -> PathBuf {
    default_data_dir().join(source.as_str())
}

fn parse_download_url(url: &str) -> Result<Url> {
    let parsed = Url::parse(url)
        .map_err(|e| GetterError::Validation(format!("invalid URL '{}': {}", url, e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        scheme => Err(GetterError::Validation(format!(
            "unsupported URL scheme '{}' in '{}' (expected http or https)",
            scheme, url
        ))),
    }
}

/// Resolve a source tag and optional overrides into a `DownloadSpec`.
///
/// Named sources use their compiled-in URL and reject `--url`. Custom
/// downloads need both an absolute http(s) URL and a destination.
pub fn resolve(
    source: &str,
    url: Option<&str>,
    destination: Option<&Path>,
) -> Result<DownloadSpec> {
    let source: SourceTag = source.parse()?;

    let (url, destination) = match source.fixed_url() {
        Some(fixed) => {
            if url.is_some() {
                return Err(GetterError::Validation(format!(
                    "--url is only accepted for custom downloads, not {}",
                    source
                )));
            }
            let destination = destination
                .map(Path::to_path_buf)
                .unwrap_or_else(|| default_destination(source));
            (parse_download_url(fixed)?, destination)
        }
        None => {
            let url = url.ok_or_else(|| {
                GetterError::Validation("custom downloads require --url".to_string())
            })?;
            let destination = destination.ok_or_else(|| {
                GetterError::Validation("custom downloads require --dest".to_string())
            })?;
            (parse_download_url(url)?, destination.to_path_buf())
        }
    };

    Ok(DownloadSpec {
        source,
        url,
        destination,
    })
}

/// Result of running a download
#[derive(Debug)]
pub struct DownloadOutcome {
    pub spec: DownloadSpec,
    /// Extracted files in archive order
    pub files: Vec<PathBuf>,
    /// Decoded bulk data, only for card definitions
    pub cards: Option<Vec<ScryfallCard>>,
}

/// Runs resolved downloads
pub struct Router {
    fetcher: ArchiveFetcher,
}

impl Router {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self::with_fetcher(ArchiveFetcher::new(timeout)?))
    }

    pub fn with_fetcher(fetcher: ArchiveFetcher) -> Self {
        Self { fetcher }
    }

    /// Fetch and extract the archive; card definitions are also decoded
    pub fn execute(&self, spec: DownloadSpec) -> Result<DownloadOutcome> {
        log::info!(
            "Fetching {} into {}",
            spec.source,
            spec.destination.display()
        );
        let files = self
            .fetcher
            .fetch_and_extract(spec.url.as_str(), &spec.destination)?;

        let cards = match spec.source {
            SourceTag::CardDefinitions => {
                let bulk_file = find_bulk_file(&files).ok_or(GetterError::MissingBulkFile)?;
                log::info!("Decoding bulk data from {}", bulk_file.display());
                let cards = read_bulk_data(bulk_file)?;
                log::info!("Decoded {} cards", cards.len());
                Some(cards)
            }
            SourceTag::PriceHistory | SourceTag::Custom => None,
        };

        Ok(DownloadOutcome { spec, files, cards })
    }
}

/// First extracted `.json` file
fn find_bulk_file(files: &[PathBuf]) -> Option<&Path> {
    files
        .iter()
        .find(|path| {
            path.extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        })
        .map(PathBuf::as_path)
}

/// Resolve and run a single download. Input is fully validated before the
/// HTTP client is even built.
pub fn download(
    source: &str,
    url: Option<&str>,
    destination: Option<&Path>,
    timeout: Duration,
) -> Result<DownloadOutcome> {
    let spec = resolve(source, url, destination)?;
    Router::new(timeout)?.execute(spec)
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
