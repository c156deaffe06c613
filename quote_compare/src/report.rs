//! Console report for a comparison run.
//!
//! The reporter writes to any `Write` so the output can be captured in tests.
//! Sections, in print order: header, per-symbol progress, summary, results
//! table, error analysis, environment info.
use std::io::Write;

use chrono::{DateTime, TimeZone};

use quote_common::comparison::{Assessment, PROFESSIONAL_DIFF_PCT};
use quote_common::summary::{ErrorGroup, MarketStats, Summary};
use quote_common::{ComparisonResult, Quote, QuoteError, Result, Source, Symbol};

const WIDE_RULE: usize = 80;
const RULE: usize = 60;
const NARROW_RULE: usize = 40;

/// Renders a price cell; missing prices read `ERROR`.
pub fn format_price(price: Option<f64>) -> String {
    match price {
        Some(p) => format!("${:.2}", p),
        None => "ERROR".to_string(),
    }
}

/// Renders a difference cell; missing differences read `N/A`.
pub fn format_diff(diff: Option<f64>) -> String {
    match diff {
        Some(d) => format!("{:.2}%", d),
        None => "N/A".to_string(),
    }
}

/// Renders a rate cell; rates over nothing read `N/A`.
pub fn format_rate(rate: Option<f64>) -> String {
    match rate {
        Some(r) => format!("{:.1}%", r),
        None => "N/A".to_string(),
    }
}

/// Renders a percentage bound as given, keeping at least one decimal.
pub fn format_bound(pct: f64) -> String {
    format!("{:?}", pct)
}

/// One fixed-width row of the results table.
pub fn table_row(result: &ComparisonResult) -> String {
    format!(
        "{:<10} {:<10} {:<10} {:<8} {:<10} {:<10}",
        result.symbol.as_str(),
        format_price(result.tiingo_price()),
        format_price(result.yf_price()),
        format_diff(result.difference_pct()),
        result.status().to_string(),
        result.diagnostics.fallback,
    )
}

/// Writes the report sections.
pub struct Reporter<W: Write> {
    out: W,
}

impl<W: Write> Reporter<W> {
    /// Wraps an output sink.
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Gives the sink back, e.g. to inspect captured output.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Title, symbol count, proxy URL and start time.
    pub fn header<Tz>(&mut self, count: usize, base_url: &str, at: DateTime<Tz>) -> Result<()>
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        writeln!(self.out, "🔍 TIINGO vs YAHOO FINANCE COMPARISON TEST")?;
        writeln!(self.out, "{}", "=".repeat(RULE))?;
        writeln!(self.out, "Testing {} stocks...", count)?;
        writeln!(self.out, "Base URL: {}", base_url)?;
        writeln!(self.out, "Test time: {}", at.format("%Y-%m-%d %H:%M:%S"))?;
        writeln!(self.out)?;
        Ok(())
    }

    /// Progress line printed before a symbol is fetched.
    pub fn symbol_started(&mut self, index: usize, total: usize, symbol: &Symbol) -> Result<()> {
        writeln!(self.out, "[{}/{}] Testing {}...", index, total, symbol)?;
        self.out.flush()?;
        Ok(())
    }

    /// Per-source lines, the difference and any fallback warning.
    pub fn symbol_finished(&mut self, result: &ComparisonResult) -> Result<()> {
        self.source_line(Source::Tiingo, result.tiingo_quote(), result.tiingo_error())?;
        if let Some(upstream) = &result.diagnostics.source {
            writeln!(self.out, "  🔗 Tiingo upstream: {}", upstream)?;
        }
        self.source_line(Source::Yahoo, result.yf_quote(), result.yf_error())?;

        if let Some(diff) = result.difference_pct() {
            writeln!(self.out, "  📊 Difference: {:.2}%", diff)?;
        }
        if result.is_success() && result.diagnostics.uses_fallback() {
            writeln!(
                self.out,
                "  ⚠️  Using fallback data: {}",
                result.diagnostics.fallback
            )?;
        }
        writeln!(self.out)?;
        Ok(())
    }

    fn source_line(
        &mut self,
        source: Source,
        quote: Option<&Quote>,
        error: Option<&QuoteError>,
    ) -> Result<()> {
        match (quote, error) {
            (Some(quote), _) => {
                let currency = quote
                    .currency
                    .as_deref()
                    .map(|c| format!(" {}", c))
                    .unwrap_or_default();
                writeln!(
                    self.out,
                    "  ✅ {}: ${:.2}{}",
                    source.label(),
                    quote.price,
                    currency
                )?;
            }
            (None, Some(error)) => {
                writeln!(self.out, "  ❌ {}: {}", source.label(), error)?;
            }
            (None, None) => {}
        }
        Ok(())
    }

    /// Everything printed after the last symbol.
    pub fn report(&mut self, results: &[ComparisonResult], summary: &Summary) -> Result<()> {
        self.summary(summary)?;
        self.table(results)?;
        self.errors(summary)?;
        self.environment(summary)?;
        self.out.flush()?;
        Ok(())
    }

    /// Counts, difference statistics and grade distribution.
    pub fn summary(&mut self, summary: &Summary) -> Result<()> {
        writeln!(self.out, "📊 SUMMARY REPORT")?;
        writeln!(self.out, "{}", "=".repeat(RULE))?;
        writeln!(self.out, "Total tests: {}", summary.total)?;
        writeln!(self.out, "Successful comparisons: {}", summary.successful)?;
        writeln!(self.out, "Failed tests: {}", summary.failed)?;
        writeln!(
            self.out,
            "Tiingo API success: {}/{}",
            summary.tiingo_ok, summary.total
        )?;
        writeln!(
            self.out,
            "Yahoo Finance success: {}/{}",
            summary.yahoo_ok, summary.total
        )?;

        let Some(stats) = &summary.stats else {
            if summary.excluded_fallback > 0 {
                writeln!(self.out)?;
                writeln!(self.out, "Price Accuracy Analysis:")?;
                self.excluded_line(summary)?;
                writeln!(
                    self.out,
                    "  No comparisons left after excluding fallback data"
                )?;
            }
            return Ok(());
        };
        writeln!(self.out)?;
        writeln!(self.out, "Price Accuracy Analysis:")?;
        writeln!(self.out, "  Average difference: {:.2}%", stats.average)?;
        writeln!(self.out, "  Maximum difference: {:.2}%", stats.max)?;
        writeln!(self.out, "  Minimum difference: {:.2}%", stats.min)?;
        writeln!(
            self.out,
            "  Tests within {}% difference: {}/{} ({:.1}%)",
            format_bound(summary.threshold),
            stats.within,
            stats.compared,
            stats.accuracy_rate
        )?;
        self.excluded_line(summary)?;

        writeln!(self.out)?;
        writeln!(self.out, "Accuracy Distribution:")?;
        for (grade, count) in &stats.grades {
            writeln!(
                self.out,
                "  {:<2} {}: {} ({:.1}%)",
                grade.to_string(),
                grade.band(),
                count,
                stats.grade_share(*count)
            )?;
        }

        let assessment = stats.assessment();
        let icon = match assessment {
            Assessment::Exceptional | Assessment::Professional => "✅",
            Assessment::Acceptable => "⚠️ ",
            Assessment::NeedsWork => "❌",
        };
        writeln!(self.out)?;
        writeln!(self.out, "💼 Professional Grade Assessment:")?;
        writeln!(
            self.out,
            "  Professional quality (≤{}% error): {}/{} ({:.1}%)",
            format_bound(PROFESSIONAL_DIFF_PCT),
            stats.professional,
            stats.compared,
            stats.professional_rate
        )?;
        writeln!(
            self.out,
            "  {} {} - {}",
            icon,
            assessment,
            assessment.advice()
        )?;

        self.markets(summary.threshold, &summary.markets)
    }

    fn excluded_line(&mut self, summary: &Summary) -> Result<()> {
        if summary.excluded_fallback > 0 {
            writeln!(
                self.out,
                "  Excluded fallback comparisons: {}",
                summary.excluded_fallback
            )?;
        }
        Ok(())
    }

    fn markets(&mut self, threshold: f64, markets: &[MarketStats]) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "🌍 Market Performance:")?;
        for market in markets {
            writeln!(
                self.out,
                "  {}: {} stocks, within {}%: {}/{} ({}), professional grade: {}",
                market.exchange,
                market.total,
                format_bound(threshold),
                market.within,
                market.compared,
                format_rate(market.accuracy_rate()),
                format_rate(market.professional_rate())
            )?;
        }
        Ok(())
    }

    /// Fixed-width results table.
    pub fn table(&mut self, results: &[ComparisonResult]) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "📋 DETAILED RESULTS")?;
        writeln!(self.out, "{}", "=".repeat(WIDE_RULE))?;
        writeln!(
            self.out,
            "{:<10} {:<10} {:<10} {:<8} {:<10} {:<10}",
            "Symbol", "Tiingo", "YFinance", "Diff%", "Status", "Fallback"
        )?;
        writeln!(self.out, "{}", "-".repeat(WIDE_RULE))?;
        for result in results {
            writeln!(self.out, "{}", table_row(result))?;
        }
        Ok(())
    }

    /// Distinct error messages per source; silent when there were none.
    pub fn errors(&mut self, summary: &Summary) -> Result<()> {
        if summary.tiingo_errors.is_empty() && summary.yahoo_errors.is_empty() {
            return Ok(());
        }
        writeln!(self.out)?;
        writeln!(self.out, "🔧 ERROR ANALYSIS")?;
        writeln!(self.out, "{}", "=".repeat(NARROW_RULE))?;
        self.error_groups(Source::Tiingo, &summary.tiingo_errors)?;
        self.error_groups(Source::Yahoo, &summary.yahoo_errors)?;
        Ok(())
    }

    fn error_groups(&mut self, source: Source, groups: &[ErrorGroup]) -> Result<()> {
        if groups.is_empty() {
            return Ok(());
        }
        let total: usize = groups.iter().map(|g| g.count).sum();
        writeln!(self.out, "{} errors ({}):", source.label(), total)?;
        for group in groups {
            writeln!(self.out, "   {}: {} occurrences", group.message, group.count)?;
        }
        Ok(())
    }

    /// Chosen key and fallback usage.
    pub fn environment(&mut self, summary: &Summary) -> Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "🔧 ENVIRONMENT INFO")?;
        writeln!(self.out, "{}", "=".repeat(NARROW_RULE))?;
        writeln!(
            self.out,
            "Tiingo API Key: {}",
            summary.chosen_key.as_deref().unwrap_or("Not detected")
        )?;
        writeln!(
            self.out,
            "Tests using fallback data: {}/{}",
            summary.fallback_count, summary.total
        )?;
        if summary.has_fallback() {
            writeln!(
                self.out,
                "⚠️  Some tests used mock/fallback data - check environment variables"
            )?;
        } else {
            writeln!(self.out, "✅ All tests used live data from Tiingo API")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quote_common::Diagnostics;
    use quote_common::summary::SummaryOptions;

    fn render<F>(f: F) -> String
    where
        F: FnOnce(&mut Reporter<Vec<u8>>) -> Result<()>,
    {
        let mut reporter = Reporter::new(Vec::new());
        f(&mut reporter).unwrap();
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    fn aapl() -> Symbol {
        "AAPL".parse().unwrap()
    }

    #[test]
    fn cells() {
        assert_eq!(format_price(Some(150.0)), "$150.00");
        assert_eq!(format_price(None), "ERROR");
        assert_eq!(format_diff(Some(0.990099)), "0.99%");
        assert_eq!(format_diff(Some(f64::INFINITY)), "inf%");
        assert_eq!(format_diff(None), "N/A");
    }

    #[test]
    fn row_for_failed_tiingo_fetch() {
        let symbol = aapl();
        let result = ComparisonResult::new(
            symbol.clone(),
            Err(QuoteError::Format("connection refused".into())),
            Ok(Quote::with_price(&symbol, 151.5, Source::Yahoo)),
            Diagnostics::errored(),
        );
        assert_eq!(
            table_row(&result),
            "AAPL       ERROR      $151.50    N/A      error      error     "
        );
    }

    #[test]
    fn header_mentions_count_and_url() {
        let at = chrono::Utc.with_ymd_and_hms(2025, 1, 2, 9, 30, 0).unwrap();
        let out = render(|r| r.header(10, "http://localhost:8888", at));
        assert!(out.contains("Testing 10 stocks..."));
        assert!(out.contains("Base URL: http://localhost:8888"));
        assert!(out.contains("Test time: 2025-01-02 09:30:00"));
    }

    #[test]
    fn progress_for_success_and_failure() {
        let symbol = aapl();
        let ok = ComparisonResult::new(
            symbol.clone(),
            Ok(Quote::with_price(&symbol, 150.0, Source::Tiingo)),
            Ok(Quote::with_price(&symbol, 151.5, Source::Yahoo)),
            Diagnostics {
                fallback: "mock".into(),
                ..Diagnostics::default()
            },
        );
        let out = render(|r| {
            r.symbol_started(1, 1, &symbol)?;
            r.symbol_finished(&ok)
        });
        assert!(out.starts_with("[1/1] Testing AAPL...\n"));
        assert!(out.contains("  ✅ Tiingo: $150.00\n"));
        assert!(out.contains("  ✅ YFinance: $151.50\n"));
        assert!(out.contains("  📊 Difference: 0.99%\n"));
        assert!(out.contains("Using fallback data: mock"));

        let failed = ComparisonResult::new(
            symbol.clone(),
            Ok(Quote::with_price(&symbol, 150.0, Source::Tiingo)),
            Err(QuoteError::NoHistoricalData("AAPL".into())),
            Diagnostics::default(),
        );
        let out = render(|r| r.symbol_finished(&failed));
        assert!(out.contains("  ✅ Tiingo: $150.00\n"));
        assert!(out.contains("  ❌ YFinance: No historical data available for AAPL\n"));
        assert!(!out.contains("Difference"));
    }

    fn compared(symbol: &str, tiingo: f64, yahoo: f64, fallback: &str) -> ComparisonResult {
        let symbol: Symbol = symbol.parse().unwrap();
        ComparisonResult::new(
            symbol.clone(),
            Ok(Quote::with_price(&symbol, tiingo, Source::Tiingo)),
            Ok(Quote::with_price(&symbol, yahoo, Source::Yahoo)),
            Diagnostics {
                fallback: fallback.into(),
                ..Diagnostics::default()
            },
        )
    }

    #[test]
    fn bounds_print_as_given() {
        assert_eq!(format_bound(5.0), "5.0");
        assert_eq!(format_bound(2.25), "2.25");
        assert_eq!(format_rate(None), "N/A");
        assert_eq!(format_rate(Some(66.666)), "66.7%");
    }

    #[test]
    fn fallback_warning_only_on_success() {
        let symbol = aapl();
        let half = ComparisonResult::new(
            symbol.clone(),
            Ok(Quote::with_price(&symbol, 150.0, Source::Tiingo)),
            Err(QuoteError::NoHistoricalData("AAPL".into())),
            Diagnostics {
                fallback: "mock".into(),
                source: Some("iex".into()),
                ..Diagnostics::default()
            },
        );
        let out = render(|r| r.symbol_finished(&half));
        assert!(out.contains("  ✅ Tiingo: $150.00\n  🔗 Tiingo upstream: iex\n"));
        assert!(out.contains("  ❌ YFinance:"));
        assert!(!out.contains("Using fallback data"));
    }

    #[test]
    fn custom_threshold_is_not_rounded() {
        let results = vec![compared("AAPL", 102.0, 100.0, "none")];
        let options = SummaryOptions {
            threshold: 2.25,
            ..SummaryOptions::default()
        };
        let summary = Summary::from_results(&results, options);
        let out = render(|r| r.summary(&summary));
        assert!(out.contains("Tests within 2.25% difference: 1/1 (100.0%)"));
    }

    #[test]
    fn all_fallback_excluded_still_explains_itself() {
        let results = vec![compared("AAPL", 150.0, 151.5, "mock")];
        let options = SummaryOptions {
            exclude_fallback: true,
            ..SummaryOptions::default()
        };
        let summary = Summary::from_results(&results, options);
        let out = render(|r| r.summary(&summary));
        assert!(out.contains("Successful comparisons: 1"));
        assert!(out.contains("  Excluded fallback comparisons: 1\n"));
        assert!(out.contains("No comparisons left after excluding fallback data"));
        assert!(!out.contains("Average difference"));
    }

    #[test]
    fn grade_shares_assessment_and_markets() {
        let results = vec![
            compared("BHP.AX", 40.0, 40.0, "none"),
            compared("CBA.AX", 110.0, 100.0, "none"),
            compared("AAPL", 100.5, 100.0, "none"),
            compared("MSFT", 103.0, 100.0, "none"),
        ];
        let summary = Summary::from_results(&results, SummaryOptions::default());
        let out = render(|r| r.summary(&summary));
        assert!(out.contains("  A+ Excellent (<0.5%): 1 (25.0%)\n"));
        assert!(out.contains("  C  Poor (5-10%): 0 (0.0%)\n"));
        assert!(out.contains("Professional quality (≤2.0% error): 2/4 (50.0%)"));
        assert!(out.contains("⚠️  ACCEPTABLE - May need minor improvements"));
        assert!(out.contains(
            "  ASX: 2 stocks, within 5.0%: 1/2 (50.0%), professional grade: 50.0%\n"
        ));
        assert!(out.contains(
            "  US: 2 stocks, within 5.0%: 2/2 (100.0%), professional grade: 50.0%\n"
        ));
    }

    #[test]
    fn summary_without_successes_skips_statistics() {
        let symbol = aapl();
        let results = vec![ComparisonResult::new(
            symbol.clone(),
            Err(QuoteError::Format("down".into())),
            Err(QuoteError::Format("down".into())),
            Diagnostics::errored(),
        )];
        let summary = Summary::from_results(&results, SummaryOptions::default());
        let out = render(|r| r.report(&results, &summary));
        assert!(out.contains("Total tests: 1"));
        assert!(out.contains("Successful comparisons: 0"));
        assert!(!out.contains("Price Accuracy Analysis"));
        assert!(out.contains("Tiingo errors (1):"));
        assert!(out.contains("   Format error: down: 1 occurrences"));
        assert!(out.contains("Tiingo API Key: Not detected"));
        assert!(out.contains("Tests using fallback data: 1/1"));
    }
}
