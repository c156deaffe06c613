//! Shared networking constants for the two quote sources.

/// Default base URL of the local Tiingo proxy.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8888";
/// Path of the proxy endpoint, relative to the base URL.
pub const TIINGO_PATH: &str = "/api/tiingo";
/// Value of the `kind` query parameter selecting the latest intraday quote.
pub const TIINGO_KIND: &str = "intraday_latest";

/// Header naming the upstream key the proxy used.
pub const HEADER_CHOSEN_KEY: &str = "x-tiingo-chosen-key";
/// Header telling whether synthetic/mock data was substituted.
pub const HEADER_FALLBACK: &str = "x-tiingo-fallback";
/// Header naming the upstream data source, when the proxy sets it.
pub const HEADER_SOURCE: &str = "x-tiingo-source";

/// Default base URL of the Yahoo Finance chart API.
pub const DEFAULT_YAHOO_URL: &str = "https://query1.finance.yahoo.com";
/// Range and interval requested from the chart API: one day of 1-minute bars.
pub const YAHOO_RANGE: &str = "1d";
/// See [`YAHOO_RANGE`].
pub const YAHOO_INTERVAL: &str = "1m";
/// Yahoo rejects requests without a browser-like agent.
pub const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36";

/// Default per-request timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
/// Default pause after every fetch, in milliseconds.
pub const DEFAULT_DELAY_MS: u64 = 500;

/// Helper to join a base URL and an absolute path without doubling the slash.
pub fn join_url(base: &str, path: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), path)
}
