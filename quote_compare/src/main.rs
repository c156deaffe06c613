//! Quote Compare: fetches intraday quotes for a list of symbols from a local Tiingo
//! proxy and from Yahoo Finance, compares the prices, and prints an accuracy report.
//!
//! Usage example (CLI):
//! ```bash
//! quote_compare --base-url http://localhost:8888 --symbols AAPL,BHP.AX --delay-ms 500
//! ```
//!
//! Symbols are given in Yahoo format; ASX listings carry the `.AX` suffix, which is
//! stripped for the proxy. Without `--symbols` or `--path` the built-in list is used.
#![warn(missing_docs)]
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;
use clap::Parser;
use log::{error, info};

use quote_common::Result;
use quote_common::summary::Summary;
use quote_compare::args::Args;
use quote_compare::{Reporter, Runner, TiingoClient, YahooClient};

fn main() -> Result<()> {
    init_logger();
    let args = Args::parse();
    let shutdown = Arc::new(AtomicBool::new(false));
    {
        let shutdown = shutdown.clone();
        if let Err(e) = ctrlc::set_handler(move || {
            info!("Ctrl+C received. Finishing the report...");
            shutdown.store(true, Ordering::SeqCst);
        }) {
            error!("Failed to set Ctrl+C handler: {}", e);
        }
    }

    let symbols = args.symbols()?;
    info!("Symbols: {:?}", symbols.iter().map(|s| s.as_str()).collect::<Vec<_>>());

    let tiingo = TiingoClient::new(&args.base_url, args.timeout())?;
    let yahoo = YahooClient::new(&args.yahoo_url, args.timeout())?;

    let stdout = io::stdout();
    let mut reporter = Reporter::new(stdout.lock());
    reporter.header(symbols.len(), tiingo.base_url(), Local::now())?;

    let runner = Runner::new(tiingo, yahoo, args.delay()).with_shutdown(shutdown);
    let results = runner.run(&symbols, &mut reporter)?;

    let summary = Summary::from_results(&results, args.summary_options());
    reporter.report(&results, &summary)?;
    Ok(())
}

fn init_logger() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();
}
