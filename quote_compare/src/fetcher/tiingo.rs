//! Client for the local Tiingo proxy.
//!
//! `GET {base}/api/tiingo?symbol={symbol}&kind=intraday_latest` answers with
//! either an array of quote objects or a single object. Two response headers
//! tell which upstream key was used and whether mock data was substituted;
//! they are read before the body so they survive body failures.
use std::time::Duration;

use log::{debug, warn};
use reqwest::blocking::Client;
use reqwest::header::HeaderMap;
use serde_json::{Map, Value};

use quote_common::comparison::{NO_FALLBACK, UNKNOWN_KEY};
use quote_common::net::{
    HEADER_CHOSEN_KEY, HEADER_FALLBACK, HEADER_SOURCE, TIINGO_KIND, TIINGO_PATH, join_url,
};
use quote_common::{Diagnostics, Quote, QuoteError, Result, Source, Symbol};

use super::{FetchOutcome, QuoteFetcher};

/// Blocking client for the proxy endpoint.
pub struct TiingoClient {
    client: Client,
    base_url: String,
}

impl TiingoClient {
    /// Builds a client with a per-request `timeout`.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, tiingo_symbol: &str) -> FetchOutcome {
        let url = join_url(&self.base_url, TIINGO_PATH);
        debug!("GET {} symbol={} kind={}", url, tiingo_symbol, TIINGO_KIND);

        let response = match self
            .client
            .get(&url)
            .query(&[("symbol", tiingo_symbol), ("kind", TIINGO_KIND)])
            .send()
        {
            Ok(response) => response,
            Err(e) => {
                return FetchOutcome {
                    quote: Err(e.into()),
                    diagnostics: Diagnostics::errored(),
                };
            }
        };

        let diagnostics = diagnostics_from_headers(response.headers());
        debug!(
            "{}: chosen key={} fallback={}",
            tiingo_symbol, diagnostics.chosen_key, diagnostics.fallback
        );

        let status = response.status();
        if !status.is_success() {
            return FetchOutcome {
                quote: Err(QuoteError::from_status(status)),
                diagnostics,
            };
        }

        let body = response
            .text()
            .map_err(QuoteError::from)
            .and_then(|text| serde_json::from_str::<Value>(&text).map_err(QuoteError::from));
        match body {
            Ok(body) => FetchOutcome {
                quote: parse_body(&body, tiingo_symbol),
                diagnostics,
            },
            Err(e) => FetchOutcome {
                quote: Err(e),
                diagnostics: Diagnostics::errored(),
            },
        }
    }
}

impl QuoteFetcher for TiingoClient {
    fn source(&self) -> Source {
        Source::Tiingo
    }

    fn fetch(&self, symbol: &Symbol) -> FetchOutcome {
        let outcome = self.request(&symbol.to_tiingo());
        if let Err(e) = &outcome.quote {
            warn!("Tiingo fetch for {} failed: {}", symbol, e);
        }
        outcome
    }
}

/// Reads the proxy diagnostics, defaulting missing headers.
pub fn diagnostics_from_headers(headers: &HeaderMap) -> Diagnostics {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    Diagnostics {
        chosen_key: header(HEADER_CHOSEN_KEY).unwrap_or_else(|| UNKNOWN_KEY.to_string()),
        fallback: header(HEADER_FALLBACK).unwrap_or_else(|| NO_FALLBACK.to_string()),
        source: header(HEADER_SOURCE),
    }
}

/// Normalizes a proxy response body into a quote.
///
/// A non-empty array contributes its first element, an object is used as is,
/// anything else is an unexpected format. The price prefers `lastPrice`, then
/// `last`, and is zero when both are missing.
pub fn parse_body(body: &Value, tiingo_symbol: &str) -> Result<Quote> {
    let record = match body {
        Value::Array(items) => items
            .first()
            .ok_or_else(|| QuoteError::UnexpectedFormat("empty array".to_string()))?,
        Value::Object(_) => body,
        other => {
            return Err(QuoteError::UnexpectedFormat(format!(
                "expected array or object, got {}",
                json_kind(other)
            )));
        }
    };
    let record = record.as_object().ok_or_else(|| {
        QuoteError::UnexpectedFormat(format!(
            "expected quote object, got {}",
            json_kind(record)
        ))
    })?;

    let price = number(record, "lastPrice")
        .or_else(|| number(record, "last"))
        .unwrap_or(0.0);

    Ok(Quote {
        symbol: text(record, "ticker").unwrap_or_else(|| tiingo_symbol.to_string()),
        price,
        previous_close: number(record, "prevClose").unwrap_or(0.0),
        volume: number(record, "volume").unwrap_or(0.0),
        timestamp: text(record, "timestamp").unwrap_or_default(),
        source: Source::Tiingo,
        currency: None,
    })
}

/// Numbers sometimes arrive quoted.
fn number(record: &Map<String, Value>, key: &str) -> Option<f64> {
    match record.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
