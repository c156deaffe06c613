//! Command-line arguments for the comparison run.
//!
//! This module defines the CLI interface using `clap`. Every option has a
//! default, so running the binary without arguments compares the built-in
//! symbol list against a proxy on `localhost:8888`.
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use quote_common::comparison::ACCEPTABLE_DIFF_PCT;
use quote_common::net::{
    DEFAULT_BASE_URL, DEFAULT_DELAY_MS, DEFAULT_TIMEOUT_SECS, DEFAULT_YAHOO_URL,
};
use quote_common::summary::SummaryOptions;
use quote_common::tickers::TickerParser;
use quote_common::{QuoteError, Result, Symbol};

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Base URL of the Tiingo proxy.
    #[clap(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Base URL of the Yahoo Finance chart API.
    #[clap(long, default_value = DEFAULT_YAHOO_URL)]
    pub yahoo_url: String,

    /// Symbols to compare, e.g. `AAPL,BHP.AX`. Defaults to the built-in list.
    #[clap(long, conflicts_with = "path")]
    pub symbols: Option<String>,

    /// Path to a text file with symbols.
    /// Symbols may be separated by commas, spaces, or new lines.
    #[clap(long)]
    pub path: Option<String>,

    /// Pause after every fetch, in milliseconds.
    #[clap(long, default_value_t = DEFAULT_DELAY_MS)]
    pub delay_ms: u64,

    /// Per-request timeout, in seconds.
    #[clap(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Differences at or below this percentage count as accurate.
    #[clap(long, default_value_t = ACCEPTABLE_DIFF_PCT)]
    pub threshold: f64,

    /// Leave comparisons served from fallback data out of the statistics.
    #[clap(long)]
    pub exclude_fallback: bool,
}

impl Args {
    /// Symbols to run, from `--symbols`, `--path`, or the built-in list.
    pub fn symbols(&self) -> Result<Vec<Symbol>> {
        let symbols = match (&self.symbols, &self.path) {
            (Some(list), _) => Symbol::parse_list(list)?,
            (None, Some(path)) => {
                let file = File::open(normalize_path(path))?;
                Symbol::parse_from_file(BufReader::new(file))?
            }
            (None, None) => Symbol::defaults(),
        };
        if symbols.is_empty() {
            return Err(QuoteError::ParseTickersFile("no symbols given".to_string()));
        }
        Ok(symbols)
    }

    /// Pause after every fetch.
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    /// Per-request timeout.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Options for the run summary.
    pub fn summary_options(&self) -> SummaryOptions {
        SummaryOptions {
            threshold: self.threshold,
            exclude_fallback: self.exclude_fallback,
        }
    }
}

/// Normalize a CLI-provided path string by trimming whitespace and matching quotes.
///
/// This allows passing Windows paths in quotes without breaking parsing.
fn normalize_path(raw: &str) -> PathBuf {
    let trimmed = raw.trim();
    let no_quotes = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);
    PathBuf::from(no_quotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let args = Args::try_parse_from(["quote_compare"]).unwrap();
        assert_eq!(args.base_url, "http://localhost:8888");
        assert_eq!(args.delay(), Duration::from_millis(500));
        assert_eq!(args.timeout(), Duration::from_secs(10));
        assert_eq!(args.summary_options(), SummaryOptions::default());
        assert_eq!(args.symbols().unwrap().len(), 10);
    }

    #[test]
    fn inline_symbols() {
        let args = Args::try_parse_from([
            "quote_compare",
            "--symbols",
            "aapl, bhp.ax",
            "--threshold",
            "2.5",
            "--exclude-fallback",
        ])
        .unwrap();
        let symbols = args.symbols().unwrap();
        assert_eq!(symbols.len(), 2);
        assert_eq!(symbols[1].as_str(), "BHP.AX");
        assert_eq!(args.summary_options().threshold, 2.5);
        assert!(args.summary_options().exclude_fallback);
    }

    #[test]
    fn symbols_and_path_conflict() {
        let parsed = Args::try_parse_from([
            "quote_compare",
            "--symbols",
            "AAPL",
            "--path",
            "tickers.txt",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn empty_list_is_rejected() {
        let args = Args::try_parse_from(["quote_compare", "--symbols", " , "]).unwrap();
        assert!(matches!(
            args.symbols(),
            Err(QuoteError::ParseTickersFile(_))
        ));
    }

    #[test]
    fn quoted_paths_are_unwrapped() {
        assert_eq!(
            normalize_path("  \"C:\\data\\tickers.txt\" "),
            PathBuf::from("C:\\data\\tickers.txt")
        );
        assert_eq!(normalize_path("tickers.txt"), PathBuf::from("tickers.txt"));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let args =
            Args::try_parse_from(["quote_compare", "--path", "/nonexistent/tickers.txt"]).unwrap();
        assert!(matches!(args.symbols(), Err(QuoteError::Io(_))));
    }
}
