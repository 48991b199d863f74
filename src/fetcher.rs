//! Archive download and extraction
//!
//! Uses blocking reqwest: one invocation does one fetch and one extraction
//! pass, so there is nothing to gain from an async runtime here.

use crate::error::{GetterError, Result};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::time::Duration;
use zip::result::ZipError;
use zip::ZipArchive;

/// Request timeout used when the caller does not pick one
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT: &str = "mtgogetter/0.1";

/// Fetches a remote archive and unpacks it into a directory
pub struct ArchiveFetcher {
    client: reqwest::blocking::Client,
}

impl ArchiveFetcher {
    /// Create a fetcher whose requests give up after `timeout`
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self { client })
    }

    /// Download `url` and extract every entry into `dest_dir`.
    ///
    /// The body is fully received before anything touches the filesystem,
    /// so a failed request leaves `dest_dir` as it was. No retries.
    pub fn fetch_and_extract(&self, url: &str, dest_dir: &Path) -> Result<Vec<PathBuf>> {
        let bytes = self.fetch_bytes(url)?;
        extract_archive(&bytes, dest_dir)
    }

    /// GET `url` and return the whole body. Non-2xx is an error.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>> {
        log::info!("Downloading {}", url);

        let response = self.client.get(url).send()?;
        if !response.status().is_success() {
            return Err(GetterError::HttpStatus {
                url: url.to_string(),
                status: response.status(),
            });
        }

        let bytes = response.bytes()?;
        log::info!("Got {} bytes", bytes.len());
        Ok(bytes.to_vec())
    }
}

/// Extract a zip archive held in memory into `dest_dir`.
///
/// Every entry name is checked before the first write; one entry that
/// would land outside `dest_dir` rejects the whole archive. Existing files
/// are overwritten. Returns the written file paths in archive order.
pub fn extract_archive(bytes: &[u8], dest_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))?;

    let mut entries = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let entry = archive.by_index_raw(index)?;
        let relative = entry
            .enclosed_name()
            .ok_or_else(|| GetterError::UnsafeEntry(entry.name().to_string()))?;
        entries.push((index, dest_dir.join(relative), entry.is_dir()));
    }

    std::fs::create_dir_all(dest_dir).map_err(|e| GetterError::io(dest_dir, e))?;

    let mut extracted = Vec::new();
    for (index, out_path, is_dir) in entries {
        if is_dir {
            std::fs::create_dir_all(&out_path).map_err(|e| GetterError::io(&out_path, e))?;
            continue;
        }

        // Decompression failures mean a corrupt archive, not a disk problem.
        // The header's size claim is untrusted, so the buffer grows as read.
        let mut entry = archive.by_index(index)?;
        let mut contents = Vec::new();
        entry.read_to_end(&mut contents).map_err(ZipError::Io)?;

        if let Some(parent) = out_path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| GetterError::io(parent, e))?;
        }
        std::fs::write(&out_path, &contents).map_err(|e| GetterError::io(&out_path, e))?;
        log::debug!("Extracted {}", out_path.display());
        extracted.push(out_path);
    }

    log::info!(
        "Extracted {} file(s) into {}",
        extracted.len(),
        dest_dir.display()
    );
    Ok(extracted)
}

#[cfg(test)]
#[path = "fetcher_tests.rs"]
mod tests;
