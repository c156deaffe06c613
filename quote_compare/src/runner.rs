//! Sequential comparison run.
//!
//! For every symbol, in order: fetch from the proxy, pause, fetch from Yahoo,
//! pause, fold both outcomes into a `ComparisonResult`. The pauses are fixed
//! and unconditional. A shutdown flag is checked before each symbol so Ctrl+C
//! still yields a report for what was fetched so far.
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use log::{info, warn};

use quote_common::{ComparisonResult, Result, Symbol};

use crate::fetcher::QuoteFetcher;
use crate::report::Reporter;

/// Drives both fetchers over a symbol list.
pub struct Runner<P, M> {
    proxy: P,
    market: M,
    delay: Duration,
    shutdown: Arc<AtomicBool>,
}

impl<P: QuoteFetcher, M: QuoteFetcher> Runner<P, M> {
    /// `proxy` is compared against `market`; `delay` follows every fetch.
    pub fn new(proxy: P, market: M, delay: Duration) -> Self {
        Self {
            proxy,
            market,
            delay,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Uses an external flag to stop between symbols.
    pub fn with_shutdown(mut self, shutdown: Arc<AtomicBool>) -> Self {
        self.shutdown = shutdown;
        self
    }

    /// Runs every symbol and reports progress as it goes.
    ///
    /// Fetch failures end up in the results; only a failing report sink
    /// makes this return an error.
    pub fn run<W: Write>(
        &self,
        symbols: &[Symbol],
        reporter: &mut Reporter<W>,
    ) -> Result<Vec<ComparisonResult>> {
        let total = symbols.len();
        let mut results = Vec::with_capacity(total);

        for (i, symbol) in symbols.iter().enumerate() {
            if self.shutdown.load(Ordering::Relaxed) {
                warn!("Run interrupted after {}/{} symbols", i, total);
                break;
            }
            reporter.symbol_started(i + 1, total, symbol)?;
            let result = self.compare(symbol);
            reporter.symbol_finished(&result)?;
            results.push(result);
        }

        info!(
            "Compared {} symbols, {} with quotes from both {} and {}",
            results.len(),
            results.iter().filter(|r| r.is_success()).count(),
            self.proxy.source(),
            self.market.source()
        );
        Ok(results)
    }

    /// Fetches one symbol from both sources.
    pub fn compare(&self, symbol: &Symbol) -> ComparisonResult {
        let proxy = self.proxy.fetch(symbol);
        self.pause();
        let market = self.market.fetch(symbol);
        self.pause();

        ComparisonResult::new(symbol.clone(), proxy.quote, market.quote, proxy.diagnostics)
    }

    fn pause(&self) {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
    }
}
