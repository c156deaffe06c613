//! Client for the public Yahoo Finance chart API.
//!
//! One request returns a day of 1-minute bars plus chart metadata (currency,
//! previous close, exchange UTC offset). The most recent bar with a close
//! becomes the quote.
use std::time::Duration;

use chrono::{DateTime, FixedOffset};
use log::{debug, warn};
use reqwest::StatusCode;
use reqwest::blocking::Client;
use serde::Deserialize;

use quote_common::net::{USER_AGENT, YAHOO_INTERVAL, YAHOO_RANGE, join_url};
use quote_common::{Quote, QuoteError, Result, Source, Symbol};

use super::{FetchOutcome, QuoteFetcher};

/// Layout of the bar timestamp in the quote.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Top-level chart response.
#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    /// Payload wrapper.
    pub chart: Chart,
}

/// Either a result list or an error object.
#[derive(Debug, Deserialize)]
pub struct Chart {
    /// Present on success, usually a single element.
    pub result: Option<Vec<ChartResult>>,
    /// Present when Yahoo rejected the symbol.
    pub error: Option<ChartError>,
}

/// Error object Yahoo returns inside the chart wrapper.
#[derive(Debug, Deserialize)]
pub struct ChartError {
    /// Short code, e.g. `Not Found`.
    pub code: String,
    /// Human readable explanation.
    pub description: String,
}

/// Bars and metadata for one symbol.
#[derive(Debug, Deserialize)]
pub struct ChartResult {
    /// Static ticker metadata.
    pub meta: ChartMeta,
    /// Bar open times, seconds since the epoch. Missing when there are no bars.
    #[serde(default)]
    pub timestamp: Vec<i64>,
    /// Bar values, index-aligned with `timestamp`.
    pub indicators: Indicators,
}

/// Ticker metadata attached to the chart.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    /// Symbol as Yahoo knows it.
    pub symbol: Option<String>,
    /// Trading currency.
    pub currency: Option<String>,
    /// Previous session close.
    pub previous_close: Option<f64>,
    /// Exchange offset from UTC, in seconds.
    #[serde(default)]
    pub gmtoffset: i64,
}

/// Indicator block of the chart.
#[derive(Debug, Default, Deserialize)]
pub struct Indicators {
    /// OHLCV series; Yahoo sends exactly one.
    #[serde(default)]
    pub quote: Vec<Bars>,
}

/// OHLCV columns. Yahoo leaves holes as `null`.
#[derive(Debug, Default, Deserialize)]
pub struct Bars {
    /// Opening prices.
    #[serde(default)]
    pub open: Vec<Option<f64>>,
    /// Closing prices.
    #[serde(default)]
    pub close: Vec<Option<f64>>,
    /// Volumes.
    #[serde(default)]
    pub volume: Vec<Option<f64>>,
}

/// Blocking client for the chart endpoint.
pub struct YahooClient {
    client: Client,
    base_url: String,
}

impl YahooClient {
    /// Builds a client with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, symbol: &Symbol) -> Result<Quote> {
        let url = join_url(&self.base_url, &format!("/v8/finance/chart/{}", symbol));
        debug!("GET {} range={} interval={}", url, YAHOO_RANGE, YAHOO_INTERVAL);

        let response = self
            .client
            .get(&url)
            .query(&[("range", YAHOO_RANGE), ("interval", YAHOO_INTERVAL)])
            .send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(status_error(status, &response.text().unwrap_or_default()));
        }
        let chart: ChartResponse = serde_json::from_str(&response.text()?)?;
        latest_quote(chart, symbol)
    }
}

impl QuoteFetcher for YahooClient {
    fn source(&self) -> Source {
        Source::Yahoo
    }

    fn fetch(&self, symbol: &Symbol) -> FetchOutcome {
        let quote = self.request(symbol);
        if let Err(e) = &quote {
            warn!("Yahoo fetch for {} failed: {}", symbol, e);
        }
        FetchOutcome::plain(quote)
    }
}

/// Status error carrying Yahoo's own explanation when the body has one.
pub fn status_error(status: StatusCode, body: &str) -> QuoteError {
    match serde_json::from_str::<ChartResponse>(body) {
        Ok(ChartResponse {
            chart: Chart {
                error: Some(error), ..
            },
        }) => QuoteError::HttpStatus {
            status: status.as_u16(),
            reason: format!("{}: {}", error.code, error.description),
        },
        _ => QuoteError::from_status(status),
    }
}

/// Turns a chart response into a quote built from the most recent bar.
///
/// `previous_close` comes from the metadata, falling back to the bar's open.
pub fn latest_quote(response: ChartResponse, symbol: &Symbol) -> Result<Quote> {
    if let Some(error) = response.chart.error {
        return Err(QuoteError::UnexpectedFormat(format!(
            "{}: {}",
            error.code, error.description
        )));
    }
    let result = response
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| QuoteError::UnexpectedFormat("chart has no result".to_string()))?;

    let bars = result.indicators.quote.first();
    let latest = bars.and_then(|bars| {
        (0..result.timestamp.len())
            .rev()
            .find_map(|i| bars.close.get(i).copied().flatten().map(|close| (i, close)))
    });
    let (bars, (index, close)) = match (bars, latest) {
        (Some(bars), Some(latest)) => (bars, latest),
        _ => return Err(QuoteError::NoHistoricalData(symbol.to_string())),
    };

    let open = bars.open.get(index).copied().flatten();
    let volume = bars.volume.get(index).copied().flatten().unwrap_or(0.0);

    Ok(Quote {
        symbol: symbol.to_string(),
        price: close,
        previous_close: result
            .meta
            .previous_close
            .or(open)
            .unwrap_or_default(),
        volume,
        timestamp: format_bar_time(result.timestamp[index], result.meta.gmtoffset),
        source: Source::Yahoo,
        currency: result.meta.currency,
    })
}

/// Formats a bar time in the exchange's local offset.
pub fn format_bar_time(epoch_secs: i64, gmtoffset: i64) -> String {
    let Some(utc) = DateTime::from_timestamp(epoch_secs, 0) else {
        return epoch_secs.to_string();
    };
    match i32::try_from(gmtoffset).ok().and_then(FixedOffset::east_opt) {
        Some(offset) => utc.with_timezone(&offset).format(TIMESTAMP_FORMAT).to_string(),
        None => utc.format(TIMESTAMP_FORMAT).to_string(),
    }
}
