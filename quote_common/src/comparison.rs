//! Price comparison between the two sources.
//!
//! - [`percentage_difference`]: the comparator.
//! - [`AccuracyGrade`]: buckets a difference into a letter grade.
//! - [`Diagnostics`]: proxy header metadata, always present with sentinel defaults.
//! - [`ComparisonResult`]: one per symbol per run; success iff both quotes are present.

use strum_macros::{Display, EnumIter};

use crate::error::QuoteError;
use crate::quote::Quote;
use crate::tickers::Symbol;

/// Differences at or below this percentage count as accurate.
pub const ACCEPTABLE_DIFF_PCT: f64 = 5.0;
/// Differences at or below this percentage are professional grade.
pub const PROFESSIONAL_DIFF_PCT: f64 = 2.0;

/// `chosen_key` when the proxy did not send the header.
pub const UNKNOWN_KEY: &str = "unknown";
/// `fallback` when the proxy served live data or did not send the header.
pub const NO_FALLBACK: &str = "none";
/// Both diagnostic fields degrade to this when the request itself failed.
pub const ERROR_SENTINEL: &str = "error";

/// Absolute difference of `a` against `b`, in percent of `b`.
///
/// The second argument is always the denominator. A zero denominator yields
/// `f64::INFINITY` so the pair shows up as an outlier instead of failing.
pub fn percentage_difference(a: f64, b: f64) -> f64 {
    if b == 0.0 {
        return f64::INFINITY;
    }
    (a - b).abs() / b * 100.0
}

/// Letter grade for a price difference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, EnumIter)]
pub enum AccuracyGrade {
    /// Below 0.5%.
    #[strum(serialize = "A+")]
    APlus,
    /// 0.5% to 1%.
    #[strum(serialize = "A")]
    A,
    /// 1% to 2%.
    #[strum(serialize = "B+")]
    BPlus,
    /// 2% to 5%.
    #[strum(serialize = "B")]
    B,
    /// 5% to 10%.
    #[strum(serialize = "C")]
    C,
    /// 10% and above, or not computable.
    #[strum(serialize = "F")]
    F,
}

impl AccuracyGrade {
    /// Grades a difference given in percent.
    pub fn from_difference(pct: f64) -> Self {
        match pct {
            p if p < 0.5 => AccuracyGrade::APlus,
            p if p < 1.0 => AccuracyGrade::A,
            p if p < 2.0 => AccuracyGrade::BPlus,
            p if p < 5.0 => AccuracyGrade::B,
            p if p < 10.0 => AccuracyGrade::C,
            _ => AccuracyGrade::F,
        }
    }

    /// Human readable band, e.g. `Very Good (0.5-1%)`.
    pub fn band(&self) -> &'static str {
        match self {
            AccuracyGrade::APlus => "Excellent (<0.5%)",
            AccuracyGrade::A => "Very Good (0.5-1%)",
            AccuracyGrade::BPlus => "Good (1-2%)",
            AccuracyGrade::B => "Acceptable (2-5%)",
            AccuracyGrade::C => "Poor (5-10%)",
            AccuracyGrade::F => "Very Poor (>10%)",
        }
    }
}

/// Overall verdict on the share of professional-grade comparisons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum Assessment {
    /// 85% and above.
    #[strum(serialize = "EXCEPTIONAL")]
    Exceptional,
    /// 70% and above.
    #[strum(serialize = "PROFESSIONAL")]
    Professional,
    /// 50% and above.
    #[strum(serialize = "ACCEPTABLE")]
    Acceptable,
    /// Below 50%.
    #[strum(serialize = "NEEDS WORK")]
    NeedsWork,
}

impl Assessment {
    /// Verdict for a professional-grade rate given in percent.
    pub fn from_rate(rate: f64) -> Self {
        match rate {
            r if r >= 85.0 => Assessment::Exceptional,
            r if r >= 70.0 => Assessment::Professional,
            r if r >= 50.0 => Assessment::Acceptable,
            _ => Assessment::NeedsWork,
        }
    }

    /// Follow-up advice printed next to the verdict.
    pub fn advice(&self) -> &'static str {
        match self {
            Assessment::Exceptional => "Ready for enterprise deployment",
            Assessment::Professional => "Suitable for stakeholder presentation",
            Assessment::Acceptable => "May need minor improvements",
            Assessment::NeedsWork => "Requires investigation",
        }
    }
}

/// Metadata the Tiingo proxy returns in response headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostics {
    /// Which upstream key the proxy used.
    pub chosen_key: String,
    /// Fallback indicator; anything other than `none` means synthetic data.
    pub fallback: String,
    /// Upstream source name, when sent.
    pub source: Option<String>,
}

impl Default for Diagnostics {
    fn default() -> Self {
        Diagnostics {
            chosen_key: UNKNOWN_KEY.to_string(),
            fallback: NO_FALLBACK.to_string(),
            source: None,
        }
    }
}

impl Diagnostics {
    /// Diagnostics for a request that never produced a response.
    pub fn errored() -> Self {
        Diagnostics {
            chosen_key: ERROR_SENTINEL.to_string(),
            fallback: ERROR_SENTINEL.to_string(),
            source: None,
        }
    }

    /// True when the fallback indicator is anything but `none`.
    pub fn uses_fallback(&self) -> bool {
        self.fallback != NO_FALLBACK
    }
}

/// Status column of the results table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum Status {
    /// Both quotes present.
    Success,
    /// At least one fetch failed.
    Error,
}

/// What happened for one symbol.
#[derive(Debug)]
enum Outcome {
    /// Both sources answered.
    Success {
        /// Tiingo quote.
        proxy: Quote,
        /// Yahoo quote.
        market: Quote,
        /// `percentage_difference(proxy.price, market.price)`.
        difference_pct: f64,
    },
    /// At least one side failed; the other may still carry a quote.
    Error {
        /// Tiingo fetch outcome.
        proxy: Result<Quote, QuoteError>,
        /// Yahoo fetch outcome.
        market: Result<Quote, QuoteError>,
    },
}

/// Per-symbol comparison record. Immutable once built.
#[derive(Debug)]
pub struct ComparisonResult {
    /// Symbol in display format.
    pub symbol: Symbol,
    /// Proxy diagnostics, sentinel values when unavailable.
    pub diagnostics: Diagnostics,
    outcome: Outcome,
}

impl ComparisonResult {
    /// Folds both fetch outcomes into a result.
    ///
    /// The result is a success iff both quotes are present; only then is the
    /// difference computed.
    pub fn new(
        symbol: Symbol,
        proxy: Result<Quote, QuoteError>,
        market: Result<Quote, QuoteError>,
        diagnostics: Diagnostics,
    ) -> Self {
        let outcome = match (proxy, market) {
            (Ok(proxy), Ok(market)) => {
                let difference_pct = percentage_difference(proxy.price, market.price);
                Outcome::Success {
                    proxy,
                    market,
                    difference_pct,
                }
            }
            (proxy, market) => Outcome::Error { proxy, market },
        };
        ComparisonResult {
            symbol,
            diagnostics,
            outcome,
        }
    }

    /// `Success` iff both quotes are present.
    pub fn status(&self) -> Status {
        match self.outcome {
            Outcome::Success { .. } => Status::Success,
            Outcome::Error { .. } => Status::Error,
        }
    }

    /// Shorthand for `status() == Status::Success`.
    pub fn is_success(&self) -> bool {
        self.status() == Status::Success
    }

    /// Tiingo quote, if that fetch succeeded.
    pub fn tiingo_quote(&self) -> Option<&Quote> {
        match &self.outcome {
            Outcome::Success { proxy, .. } => Some(proxy),
            Outcome::Error { proxy, .. } => proxy.as_ref().ok(),
        }
    }

    /// Yahoo quote, if that fetch succeeded.
    pub fn yf_quote(&self) -> Option<&Quote> {
        match &self.outcome {
            Outcome::Success { market, .. } => Some(market),
            Outcome::Error { market, .. } => market.as_ref().ok(),
        }
    }

    /// Tiingo price, if any.
    pub fn tiingo_price(&self) -> Option<f64> {
        self.tiingo_quote().map(|q| q.price)
    }

    /// Yahoo price, if any.
    pub fn yf_price(&self) -> Option<f64> {
        self.yf_quote().map(|q| q.price)
    }

    /// Difference in percent; `Some` iff the result is a success.
    pub fn difference_pct(&self) -> Option<f64> {
        match self.outcome {
            Outcome::Success { difference_pct, .. } => Some(difference_pct),
            Outcome::Error { .. } => None,
        }
    }

    /// Tiingo error, if that fetch failed.
    pub fn tiingo_error(&self) -> Option<&QuoteError> {
        match &self.outcome {
            Outcome::Error { proxy: Err(e), .. } => Some(e),
            _ => None,
        }
    }

    /// Yahoo error, if that fetch failed.
    pub fn yf_error(&self) -> Option<&QuoteError> {
        match &self.outcome {
            Outcome::Error { market: Err(e), .. } => Some(e),
            _ => None,
        }
    }

    /// Grade of the difference, successes only.
    pub fn grade(&self) -> Option<AccuracyGrade> {
        self.difference_pct().map(AccuracyGrade::from_difference)
    }
}
