//! Normalized quote record produced by both fetchers.
//!
//! A `Quote` is built fresh per fetch and never mutated; the runner folds it
//! into a [`crate::comparison::ComparisonResult`] and drops it with the run.

use strum_macros::Display;

use crate::tickers::Symbol;

/// Where a quote came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Source {
    /// The local Tiingo proxy.
    #[strum(serialize = "tiingo")]
    Tiingo,
    /// The public Yahoo Finance chart API.
    #[strum(serialize = "yfinance")]
    Yahoo,
}

impl Source {
    /// Column/label name used by the console report.
    pub fn label(&self) -> &'static str {
        match self {
            Source::Tiingo => "Tiingo",
            Source::Yahoo => "YFinance",
        }
    }
}

/// Market quote for a single symbol, as reported by one source.
#[derive(Debug, Clone, PartialEq)]
pub struct Quote {
    /// Symbol as the source reported it.
    pub symbol: String,
    /// Last traded price.
    pub price: f64,
    /// Previous session close.
    pub previous_close: f64,
    /// Traded volume associated with the quote.
    pub volume: f64,
    /// Source-provided timestamp, kept as text.
    pub timestamp: String,
    /// Which source produced the quote.
    pub source: Source,
    /// Trading currency, when the source reports it.
    pub currency: Option<String>,
}

impl Quote {
    /// Minimal quote with only a price, mostly for tests and fakes.
    pub fn with_price(symbol: &Symbol, price: f64, source: Source) -> Self {
        Quote {
            symbol: symbol.to_string(),
            price,
            previous_close: 0.0,
            volume: 0.0,
            timestamp: String::new(),
            source,
            currency: None,
        }
    }
}
