//! Error types shared between the fetchers, the runner and the reporter.
//!
//! The `QuoteError` enum unifies transport, payload and input failures so that
//! every fetcher can hand back a single typed error. Fetch errors are captured
//! per symbol and never abort a run; only startup errors reach `main`.
use std::io;

use thiserror::Error;

/// Unified error type for the workspace.
#[derive(Error, Debug)]
pub enum QuoteError {
    /// I/O error originating from the standard library, files or the console.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport failure: connection refused, timeout, TLS or body decoding.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success HTTP status.
    #[error("HTTP {status}: {reason}")]
    HttpStatus {
        /// Numeric status code.
        status: u16,
        /// Canonical reason phrase, empty when unknown.
        reason: String,
    },

    /// The response body did not have the expected shape.
    #[error("Unexpected data format: {0}")]
    UnexpectedFormat(String),

    /// The bar series for the requested day is empty.
    #[error("No historical data available for {0}")]
    NoHistoricalData(String),

    /// Failure while encoding/decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// A symbol string could not be parsed.
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    /// Error while parsing a symbol file into `Symbol` values.
    #[error("Parse tickers file error: {0}")]
    ParseTickersFile(String),

    /// Generic formatting/validation error with a human-readable message.
    #[error("Format error: {0}")]
    Format(String),
}

impl QuoteError {
    /// Builds an `HttpStatus` error from a reqwest status code.
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        QuoteError::HttpStatus {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_message_carries_code_and_reason() {
        let err = QuoteError::from_status(reqwest::StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(err.to_string(), "HTTP 503: Service Unavailable");
    }

    #[test]
    fn io_errors_convert() {
        let err = QuoteError::from(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert!(matches!(err, QuoteError::Io(_)));
        assert_eq!(err.to_string(), "I/O error: slow");
    }
}
