//! Fetchers against a throwaway local HTTP server.
use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use quote_common::{QuoteError, Source, Symbol};
use quote_compare::{QuoteFetcher, TiingoClient, YahooClient};

/// Serves one canned response and hands back the request line.
fn serve_once(
    status: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> (String, mpsc::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let base_url = format!("http://{}", listener.local_addr().unwrap());
    let mut response = format!(
        "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
        status,
        body.len()
    );
    for (name, value) in headers {
        response.push_str(&format!("{}: {}\r\n", name, value));
    }
    response.push_str("\r\n");
    response.push_str(body);

    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());
        let mut request_line = String::new();
        reader.read_line(&mut request_line).unwrap();
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
        }
        stream.write_all(response.as_bytes()).unwrap();
        stream.flush().unwrap();
        let _ = tx.send(request_line.trim_end().to_string());
    });
    (base_url, rx)
}

fn symbol(s: &str) -> Symbol {
    s.parse().unwrap()
}

fn timeout() -> Duration {
    Duration::from_secs(5)
}

#[test]
fn tiingo_reads_body_and_headers() {
    let (base_url, request) = serve_once(
        "200 OK",
        &[("x-tiingo-chosen-key", "TIINGO_KEY_2"), ("x-tiingo-fallback", "none")],
        r#"[{"ticker": "BHP", "last": 40.25, "prevClose": 40.1, "volume": 12000, "timestamp": "2025-01-02T00:01:00+00:00"}]"#,
    );
    let client = TiingoClient::new(&base_url, timeout()).unwrap();
    assert_eq!(client.source(), Source::Tiingo);

    let outcome = client.fetch(&symbol("BHP.AX"));
    let quote = outcome.quote.unwrap();
    assert_eq!(quote.symbol, "BHP");
    assert_eq!(quote.price, 40.25);
    assert_eq!(outcome.diagnostics.chosen_key, "TIINGO_KEY_2");
    assert!(!outcome.diagnostics.uses_fallback());

    let request_line = request.recv_timeout(timeout()).unwrap();
    assert_eq!(
        request_line,
        "GET /api/tiingo?symbol=BHP&kind=intraday_latest HTTP/1.1"
    );
}

#[test]
fn tiingo_status_error_keeps_headers() {
    let (base_url, _request) = serve_once(
        "503 Service Unavailable",
        &[("x-tiingo-chosen-key", "TIINGO_KEY_1"), ("x-tiingo-fallback", "mock")],
        r#"{"error": "upstream down"}"#,
    );
    let client = TiingoClient::new(&base_url, timeout()).unwrap();
    let outcome = client.fetch(&symbol("AAPL"));

    assert!(matches!(
        outcome.quote,
        Err(QuoteError::HttpStatus { status: 503, .. })
    ));
    assert_eq!(outcome.diagnostics.chosen_key, "TIINGO_KEY_1");
    assert_eq!(outcome.diagnostics.fallback, "mock");
}

#[test]
fn tiingo_unexpected_shape() {
    let (base_url, _request) = serve_once("200 OK", &[], "[]");
    let client = TiingoClient::new(&base_url, timeout()).unwrap();
    let outcome = client.fetch(&symbol("AAPL"));

    assert!(matches!(outcome.quote, Err(QuoteError::UnexpectedFormat(_))));
    assert_eq!(outcome.diagnostics.chosen_key, "unknown");
    assert_eq!(outcome.diagnostics.fallback, "none");
}

#[test]
fn tiingo_connection_refused_degrades_diagnostics() {
    let base_url = {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        format!("http://{}", listener.local_addr().unwrap())
    };
    let client = TiingoClient::new(&base_url, timeout()).unwrap();
    let outcome = client.fetch(&symbol("AAPL"));

    let err = outcome.quote.unwrap_err();
    assert!(matches!(err, QuoteError::Http(_)), "{err:?}");
    assert_eq!(outcome.diagnostics.chosen_key, "error");
    assert_eq!(outcome.diagnostics.fallback, "error");
}

#[test]
fn yahoo_reads_latest_bar() {
    let (base_url, request) = serve_once(
        "200 OK",
        &[],
        r#"{"chart": {"result": [{
            "meta": {"currency": "USD", "symbol": "AAPL", "gmtoffset": -18000, "previousClose": 243.85},
            "timestamp": [1735830000, 1735830060],
            "indicators": {"quote": [{"open": [243.1, 243.5], "close": [243.4, 243.9], "volume": [1000, 2000]}]}
        }], "error": null}}"#,
    );
    let client = YahooClient::new(&base_url, timeout()).unwrap();
    assert_eq!(client.source(), Source::Yahoo);

    let outcome = client.fetch(&symbol("AAPL"));
    let quote = outcome.quote.unwrap();
    assert_eq!(quote.price, 243.9);
    assert_eq!(quote.previous_close, 243.85);
    assert_eq!(quote.volume, 2000.0);
    assert_eq!(quote.timestamp, "2025-01-02 10:01:00");
    assert_eq!(outcome.diagnostics.fallback, "none");

    let request_line = request.recv_timeout(timeout()).unwrap();
    assert_eq!(
        request_line,
        "GET /v8/finance/chart/AAPL?range=1d&interval=1m HTTP/1.1"
    );
}

#[test]
fn yahoo_not_found_is_status_error() {
    let (base_url, _request) = serve_once(
        "404 Not Found",
        &[],
        r#"{"chart": {"result": null, "error": {"code": "Not Found", "description": "No data found"}}}"#,
    );
    let client = YahooClient::new(&base_url, timeout()).unwrap();
    let outcome = client.fetch(&symbol("NOPE.AX"));
    match outcome.quote {
        Err(QuoteError::HttpStatus { status, reason }) => {
            assert_eq!(status, 404);
            assert_eq!(reason, "Not Found: No data found");
        }
        other => panic!("expected a status error, got {other:?}"),
    }
}
