//! Error types for candela.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for candela operations.
pub type Result<T> = std::result::Result<T, CandelaError>;

/// Errors that can occur during data download and storage.
#[derive(Error, Debug)]
pub enum CandelaError {
    /// HTTP request failed for a symbol or for the metadata endpoint.
    #[error("transport error for {symbol}: {message}")]
    Transport {
        /// The symbol being fetched, or `exchangeInfo` for metadata.
        symbol: String,
        /// Underlying failure description.
        message: String,
    },

    /// The exchange returned a non-2xx status.
    #[error("API error (status {status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body, truncated.
        body: String,
    },

    /// The candle endpoint returned zero rows for a symbol.
    #[error("no data returned for {0}")]
    EmptyData(String),

    /// A raw row could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),

    /// Symbol universe selection was invoked with an invalid limit.
    #[error("symbol limit must be positive")]
    ZeroLimit,

    /// An expected stored file is absent.
    #[error("data file not found: {}", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// Arrow/Parquet encode or decode error.
    #[error("parquet error: {0}")]
    Parquet(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CandelaError {
    /// Builds a transport error for the given symbol.
    pub fn transport(symbol: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Transport {
            symbol: symbol.into(),
            message: message.to_string(),
        }
    }
}
