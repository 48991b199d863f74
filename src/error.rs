//! Error types for mtgogetter

use std::path::PathBuf;
use thiserror::Error;

/// Unified error type for download, extraction and decode operations
#[derive(Debug, Error)]
pub enum GetterError {
    /// HTTP request failed (connection refused, timeout, etc.)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
    /// Server answered with a non-2xx status code
    #[error("HTTP error from {url}: {status}")]
    HttpStatus {
        url: String,
        status: reqwest::StatusCode,
    },
    /// Response body is not a readable archive
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Archive entry would be written outside the destination directory
    #[error("Archive error: unsafe entry path '{0}'")]
    UnsafeEntry(String),
    /// Card definitions archive did not contain a JSON document
    #[error("Archive error: no JSON document found in archive")]
    MissingBulkFile,
    /// Remote API answered with JSON we can't use
    #[error("Unexpected API response: {0}")]
    ApiResponse(String),
    /// `fetch_log.toml` could not be parsed
    #[error("Fetch log error: {0}")]
    FetchLog(#[from] toml::de::Error),
    /// Fetch log could not be serialized
    #[error("Fetch log error: {0}")]
    FetchLogWrite(#[from] toml::ser::Error),
    /// Malformed or missing command line input
    #[error("Validation error: {0}")]
    Validation(String),
    /// Bulk data JSON did not match the expected shape
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),
    /// Same MTGO id appeared twice in one bulk data snapshot
    #[error("Parse error: duplicate mtgo_id {0}")]
    DuplicateMtgoId(u32),
    /// Unrecognized source tag
    #[error("Usage error: {0}")]
    Usage(String),
    /// Reading or writing a file failed
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl GetterError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GetterError::Io {
            path: path.into(),
            source,
        }
    }

    /// Network failures are the only ones worth retrying; the caller owns
    /// the retry policy.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            GetterError::Network(_) | GetterError::HttpStatus { .. }
        )
    }

    /// Process exit code: 2 for bad input, 1 for everything else
    pub fn exit_code(&self) -> i32 {
        match self {
            GetterError::Validation(_) | GetterError::Usage(_) => 2,
            _ => 1,
        }
    }
}

/// Result alias for mtgogetter operations
pub type Result<T> = std::result::Result<T, GetterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_network_errors_are_retryable() {
        let status = GetterError::HttpStatus {
            url: "https://example.com".to_string(),
            status: reqwest::StatusCode::BAD_GATEWAY,
        };
        assert!(status.is_retryable());
        assert!(!GetterError::MissingBulkFile.is_retryable());
        assert!(!GetterError::Validation("missing --url".to_string()).is_retryable());
    }

    #[test]
    fn input_errors_exit_with_two() {
        assert_eq!(GetterError::Usage("bogus".to_string()).exit_code(), 2);
        assert_eq!(GetterError::Validation("x".to_string()).exit_code(), 2);
        assert_eq!(GetterError::UnsafeEntry("../x".to_string()).exit_code(), 1);
    }

    #[test]
    fn display_includes_entry_name() {
        let err = GetterError::UnsafeEntry("../../escape.txt".to_string());
        assert_eq!(
            err.to_string(),
            "Archive error: unsafe entry path '../../escape.txt'"
        );
    }
}
