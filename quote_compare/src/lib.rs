//! Building blocks of the `quote_compare` binary.
//!
//! - `args`: command-line options.
//! - `fetcher`: the Tiingo proxy and Yahoo Finance clients behind `QuoteFetcher`.
//! - `runner`: sequential, paced run over a symbol list.
//! - `report`: console report sections.
#![warn(missing_docs)]
pub mod args;
pub mod fetcher;
pub mod report;
pub mod runner;

pub use fetcher::{FetchOutcome, QuoteFetcher, TiingoClient, YahooClient};
pub use report::Reporter;
pub use runner::Runner;
