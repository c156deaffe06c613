//! Run-level aggregate over all comparison results.
//!
//! The summary is derived once per run from the result list and never stored.
//! Difference statistics only exist when at least one comparison succeeded.

use strum::IntoEnumIterator;

use crate::comparison::{AccuracyGrade, Assessment, ComparisonResult, PROFESSIONAL_DIFF_PCT};
use crate::error::QuoteError;
use crate::tickers::Exchange;

/// Difference statistics over the successful comparisons.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffStats {
    /// Number of differences the statistics were computed from.
    pub compared: usize,
    /// Mean difference, in percent.
    pub average: f64,
    /// Largest difference, in percent.
    pub max: f64,
    /// Smallest difference, in percent.
    pub min: f64,
    /// Differences at or below the threshold.
    pub within: usize,
    /// `within / compared * 100`.
    pub accuracy_rate: f64,
    /// Differences at or below [`PROFESSIONAL_DIFF_PCT`].
    pub professional: usize,
    /// `professional / compared * 100`.
    pub professional_rate: f64,
    /// Count per grade, every grade listed in order.
    pub grades: Vec<(AccuracyGrade, usize)>,
}

impl DiffStats {
    fn from_differences(differences: &[f64], threshold: f64) -> Option<Self> {
        if differences.is_empty() {
            return None;
        }
        let compared = differences.len();
        let average = differences.iter().sum::<f64>() / compared as f64;
        let max = differences.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let min = differences.iter().copied().fold(f64::INFINITY, f64::min);
        let within = differences.iter().filter(|d| **d <= threshold).count();
        let professional = differences
            .iter()
            .filter(|d| **d <= PROFESSIONAL_DIFF_PCT)
            .count();
        let grades = AccuracyGrade::iter()
            .map(|grade| {
                let count = differences
                    .iter()
                    .filter(|d| AccuracyGrade::from_difference(**d) == grade)
                    .count();
                (grade, count)
            })
            .collect();

        Some(DiffStats {
            compared,
            average,
            max,
            min,
            within,
            accuracy_rate: within as f64 / compared as f64 * 100.0,
            professional,
            professional_rate: professional as f64 / compared as f64 * 100.0,
            grades,
        })
    }

    /// Share of the compared differences that fall in a grade, in percent.
    pub fn grade_share(&self, count: usize) -> f64 {
        count as f64 / self.compared as f64 * 100.0
    }

    /// Verdict on [`DiffStats::professional_rate`].
    pub fn assessment(&self) -> Assessment {
        Assessment::from_rate(self.professional_rate)
    }
}

/// Accuracy of the comparisons for one exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketStats {
    /// Exchange the symbols are listed on.
    pub exchange: Exchange,
    /// Results for symbols on this exchange, failed ones included.
    pub total: usize,
    /// Differences counted in the statistics.
    pub compared: usize,
    /// Differences at or below the threshold.
    pub within: usize,
    /// Differences at or below [`PROFESSIONAL_DIFF_PCT`].
    pub professional: usize,
}

impl MarketStats {
    /// `within / compared * 100`, `None` when nothing was compared.
    pub fn accuracy_rate(&self) -> Option<f64> {
        rate(self.within, self.compared)
    }

    /// `professional / compared * 100`, `None` when nothing was compared.
    pub fn professional_rate(&self) -> Option<f64> {
        rate(self.professional, self.compared)
    }
}

fn rate(part: usize, whole: usize) -> Option<f64> {
    (whole > 0).then(|| part as f64 / whole as f64 * 100.0)
}

fn market_breakdown(
    results: &[ComparisonResult],
    counted: &[&ComparisonResult],
    threshold: f64,
) -> Vec<MarketStats> {
    Exchange::iter()
        .filter_map(|exchange| {
            let total = results
                .iter()
                .filter(|r| r.symbol.exchange() == exchange)
                .count();
            if total == 0 {
                return None;
            }
            let differences: Vec<f64> = counted
                .iter()
                .filter(|r| r.symbol.exchange() == exchange)
                .filter_map(|r| r.difference_pct())
                .collect();
            Some(MarketStats {
                exchange,
                total,
                compared: differences.len(),
                within: differences.iter().filter(|d| **d <= threshold).count(),
                professional: differences
                    .iter()
                    .filter(|d| **d <= PROFESSIONAL_DIFF_PCT)
                    .count(),
            })
        })
        .collect()
}

/// One distinct error message and how often it occurred.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorGroup {
    /// Rendered error message.
    pub message: String,
    /// Occurrences across the run.
    pub count: usize,
}

fn group_errors<'a>(errors: impl Iterator<Item = &'a QuoteError>) -> Vec<ErrorGroup> {
    let mut groups: Vec<ErrorGroup> = Vec::new();
    for error in errors {
        let message = error.to_string();
        match groups.iter_mut().find(|g| g.message == message) {
            Some(group) => group.count += 1,
            None => groups.push(ErrorGroup { message, count: 1 }),
        }
    }
    groups
}

/// Knobs for [`Summary::from_results`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SummaryOptions {
    /// Accuracy threshold, in percent.
    pub threshold: f64,
    /// Leave comparisons served from fallback data out of the statistics.
    pub exclude_fallback: bool,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        SummaryOptions {
            threshold: crate::comparison::ACCEPTABLE_DIFF_PCT,
            exclude_fallback: false,
        }
    }
}

/// Aggregate numbers the reporter prints after the run.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// All results.
    pub total: usize,
    /// Results where both sources answered.
    pub successful: usize,
    /// `total - successful`.
    pub failed: usize,
    /// Results with a Tiingo quote.
    pub tiingo_ok: usize,
    /// Results with a Yahoo quote.
    pub yahoo_ok: usize,
    /// Threshold used for `stats.within`.
    pub threshold: f64,
    /// `None` when nothing could be compared.
    pub stats: Option<DiffStats>,
    /// Successful comparisons left out because they used fallback data.
    pub excluded_fallback: usize,
    /// Per-exchange accuracy, exchanges without symbols omitted.
    pub markets: Vec<MarketStats>,
    /// Chosen key of the first successful result.
    pub chosen_key: Option<String>,
    /// Results whose fallback indicator is not `none`.
    pub fallback_count: usize,
    /// Tiingo errors grouped by message, first occurrence first.
    pub tiingo_errors: Vec<ErrorGroup>,
    /// Yahoo errors grouped by message, first occurrence first.
    pub yahoo_errors: Vec<ErrorGroup>,
}

impl Summary {
    /// Aggregates `results` in one pass per figure.
    pub fn from_results(results: &[ComparisonResult], options: SummaryOptions) -> Self {
        let total = results.len();
        let successes: Vec<&ComparisonResult> =
            results.iter().filter(|r| r.is_success()).collect();
        let successful = successes.len();

        let (counted, excluded): (Vec<&ComparisonResult>, Vec<&ComparisonResult>) = successes
            .iter()
            .copied()
            .partition(|r| !(options.exclude_fallback && r.diagnostics.uses_fallback()));
        let differences: Vec<f64> = counted.iter().filter_map(|r| r.difference_pct()).collect();

        Summary {
            total,
            successful,
            failed: total - successful,
            tiingo_ok: results.iter().filter(|r| r.tiingo_quote().is_some()).count(),
            yahoo_ok: results.iter().filter(|r| r.yf_quote().is_some()).count(),
            threshold: options.threshold,
            stats: DiffStats::from_differences(&differences, options.threshold),
            excluded_fallback: excluded.len(),
            markets: market_breakdown(results, &counted, options.threshold),
            chosen_key: successes.first().map(|r| r.diagnostics.chosen_key.clone()),
            fallback_count: results
                .iter()
                .filter(|r| r.diagnostics.uses_fallback())
                .count(),
            tiingo_errors: group_errors(results.iter().filter_map(|r| r.tiingo_error())),
            yahoo_errors: group_errors(results.iter().filter_map(|r| r.yf_error())),
        }
    }

    /// True when any result was served from fallback data.
    pub fn has_fallback(&self) -> bool {
        self.fallback_count > 0
    }
}
