//! Quote fetchers for the two sources.
//!
//! Both adapters sit behind [`QuoteFetcher`] so the runner can be driven by
//! in-process fakes in tests:
//! - `tiingo`: the local Tiingo proxy, returns header diagnostics.
//! - `yahoo`: the public Yahoo Finance chart API.
use quote_common::{Diagnostics, Quote, QuoteError, Source, Symbol};

pub mod tiingo;
pub mod yahoo;

pub use tiingo::TiingoClient;
pub use yahoo::YahooClient;

/// What a single fetch produced.
///
/// Diagnostics are always filled in, with sentinel values when the source
/// has none or the request never got a response.
#[derive(Debug)]
pub struct FetchOutcome {
    /// The normalized quote or the reason there is none.
    pub quote: Result<Quote, QuoteError>,
    /// Response metadata.
    pub diagnostics: Diagnostics,
}

impl FetchOutcome {
    /// Outcome without source diagnostics.
    pub fn plain(quote: Result<Quote, QuoteError>) -> Self {
        FetchOutcome {
            quote,
            diagnostics: Diagnostics::default(),
        }
    }
}

/// A source of quotes for one symbol at a time. Calls block.
pub trait QuoteFetcher {
    /// Which source this fetcher talks to.
    fn source(&self) -> Source;

    /// Fetches the latest quote for `symbol` (display format).
    ///
    /// Never panics and never returns early with `?`: every failure is folded
    /// into the outcome so the run can move on to the next symbol.
    fn fetch(&self, symbol: &Symbol) -> FetchOutcome;
}
