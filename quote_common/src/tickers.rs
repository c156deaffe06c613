//! Ticker symbols and helpers shared by the fetchers and the runner.
//!
//! Symbols are kept in display format, which is also the format Yahoo Finance
//! expects: plain for US listings (`AAPL`) and suffixed for ASX listings
//! (`BHP.AX`). The Tiingo proxy wants the unsuffixed form, see
//! [`Symbol::to_tiingo`].

use std::fmt;
use std::io::BufRead;
use std::str::FromStr;

use strum_macros::{Display, EnumIter};

use crate::error::QuoteError;

/// Symbols compared when no list is given on the command line.
pub const DEFAULT_SYMBOLS: [&str; 10] = [
    "WOW.AX", // Woolworths Group
    "AAPL",   // Apple
    "MSFT",   // Microsoft
    "GOOGL",  // Alphabet
    "TSLA",   // Tesla
    "BHP.AX", // BHP Group
    "CBA.AX", // Commonwealth Bank
    "CSL.AX", // CSL Limited
    "WES.AX", // Wesfarmers
    "TLS.AX", // Telstra
];

/// Exchange a symbol is listed on, as far as its surface format tells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Exchange {
    /// Australian Securities Exchange, `.AX` suffix.
    #[strum(serialize = "ASX")]
    Asx,
    /// US listings carry no suffix.
    #[strum(serialize = "US")]
    Us,
}

impl Exchange {
    /// Display-format suffix, if the exchange has one.
    pub fn suffix(&self) -> Option<&'static str> {
        match self {
            Exchange::Asx => Some(".AX"),
            Exchange::Us => None,
        }
    }
}

/// A ticker symbol in display format.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol(String);

impl Symbol {
    /// Display/Yahoo form, e.g. `BHP.AX`.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Exchange inferred from the suffix.
    pub fn exchange(&self) -> Exchange {
        if convert(&self.0) != self.0 {
            Exchange::Asx
        } else {
            Exchange::Us
        }
    }

    /// Tiingo form: exactly one exchange suffix stripped, unchanged otherwise.
    pub fn to_tiingo(&self) -> String {
        convert(&self.0)
    }

    /// The built-in symbol list, in run order.
    pub fn defaults() -> Vec<Symbol> {
        DEFAULT_SYMBOLS
            .iter()
            .map(|s| Symbol(s.to_string()))
            .collect()
    }
}

/// Converts a display-format symbol to the form the Tiingo proxy expects.
///
/// `convert("BHP.AX") == "BHP"`, `convert("AAPL") == "AAPL"`.
pub fn convert(symbol: &str) -> String {
    Exchange::Asx
        .suffix()
        .and_then(|suffix| symbol.strip_suffix(suffix))
        .unwrap_or(symbol)
        .to_string()
}

impl FromStr for Symbol {
    type Err = QuoteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(QuoteError::InvalidSymbol("empty symbol".to_string()));
        }
        let valid = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '^' | '='));
        if !valid {
            return Err(QuoteError::InvalidSymbol(trimmed.to_string()));
        }
        Ok(Symbol(trimmed.to_ascii_uppercase()))
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Trait providing list parsing for symbols.
pub trait TickerParser: Sized {
    /// Parses symbols from a buffered reader.
    ///
    /// Symbols may be separated by commas, whitespace or new lines; empty
    /// entries are skipped. Returns an error if any entry cannot be parsed.
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError>;

    /// Parses a comma/whitespace separated list given inline.
    fn parse_list(list: &str) -> Result<Vec<Self>, QuoteError> {
        Self::parse_from_file(list.as_bytes())
    }
}

impl TickerParser for Symbol {
    fn parse_from_file<R: BufRead>(reader: R) -> Result<Vec<Self>, QuoteError> {
        let mut symbols = Vec::new();

        for line_result in reader.lines() {
            let line = line_result.map_err(QuoteError::Io)?;
            let entries = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|entry| !entry.is_empty());

            for entry in entries {
                match entry.parse::<Self>() {
                    Ok(symbol) => symbols.push(symbol),
                    Err(e) => return Err(QuoteError::ParseTickersFile(e.to_string())),
                }
            }
        }
        Ok(symbols)
    }
}
