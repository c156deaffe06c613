//!
//! Common types and utilities shared by the quote comparison tool.
//!
//! This crate aggregates:
//! - `error`: unified error type `QuoteError` used across the workspace.
//! - `result`: handy `Result<T, QuoteError>` alias.
//! - `tickers`: symbols, exchange suffixes and list parsing.
//! - `quote`: the normalized quote record and its source.
//! - `comparison`: comparator, diagnostics and per-symbol results.
//! - `summary`: run-level aggregate for the report.
//! - `net`: endpoint constants and small helpers.
#![warn(missing_docs)]
pub mod comparison;
pub mod error;
pub mod net;
pub mod quote;
pub mod result;
pub mod summary;
pub mod tickers;

pub use comparison::{ComparisonResult, Diagnostics, Status};
pub use error::QuoteError;
pub use quote::{Quote, Source};
pub use result::Result;
pub use tickers::Symbol;
