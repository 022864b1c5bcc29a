//! Series loader boundary and concrete loaders
//!
//! A loader turns a ticker and a provider-specific period (such as `5y`)
//! into a daily price series. Loaders do not retry; a failed fetch is
//! reported as [`TradeIoError::DataUnavailable`] and handed to the caller
//! unchanged.

use crate::data::DataLoader;
use crate::error::{Result, TradeIoError};
use chrono::DateTime;
use month_trade::PriceRecord;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Supplier of daily price series
pub trait SeriesLoader {
    /// Human-readable name identifying this loader (e.g. `"yahoo"`)
    fn name(&self) -> &'static str;

    /// Fetch the daily series for `ticker` over `period`
    ///
    /// Records are returned in the order the source supplies them; the
    /// analysis sorts them.
    fn fetch(&self, ticker: &str, period: &str) -> Result<Vec<PriceRecord>>;
}

/// Loader reading a series from a local CSV file
#[derive(Debug, Clone)]
pub struct CsvSeriesLoader {
    path: PathBuf,
}

impl CsvSeriesLoader {
    /// Create a loader for the CSV file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SeriesLoader for CsvSeriesLoader {
    fn name(&self) -> &'static str {
        "csv"
    }

    fn fetch(&self, ticker: &str, period: &str) -> Result<Vec<PriceRecord>> {
        DataLoader::from_csv(&self.path).map_err(|e| match e {
            TradeIoError::IoError(io) => TradeIoError::unavailable(
                ticker,
                period,
                format!("cannot read {}: {}", self.path.display(), io),
            ),
            other => other,
        })
    }
}

const YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

/// Loader backed by the Yahoo Finance chart API
///
/// `period` is passed through as the API's `range` parameter (`1mo`, `1y`,
/// `5y`, `max`, ...).
#[derive(Debug, Clone)]
pub struct YahooChartLoader {
    http: reqwest::blocking::Client,
    base_url: String,
}

impl YahooChartLoader {
    /// Create a loader for the public Yahoo endpoint
    pub fn new() -> Result<Self> {
        Self::new_with_base_url(YAHOO_BASE_URL.to_string())
    }

    /// Create a loader for a custom endpoint
    pub fn new_with_base_url(base_url: String) -> Result<Self> {
        let http = reqwest::blocking::Client::builder()
            // The chart API rejects requests without a user agent
            .user_agent(concat!("best_days/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| TradeIoError::DataError(format!("http client setup failed: {}", e)))?;

        Ok(Self { http, base_url })
    }

    fn chart_url(&self, ticker: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            ticker
        )
    }
}

impl SeriesLoader for YahooChartLoader {
    fn name(&self) -> &'static str {
        "yahoo"
    }

    fn fetch(&self, ticker: &str, period: &str) -> Result<Vec<PriceRecord>> {
        let url = self.chart_url(ticker);
        info!(%url, ticker, period, "fetching daily series");

        let resp = self
            .http
            .get(&url)
            .query(&[("range", period), ("interval", "1d")])
            .send()
            .map_err(|e| TradeIoError::unavailable(ticker, period, format!("request failed: {}", e)))?;

        let status = resp.status();
        let body = resp
            .text()
            .map_err(|e| TradeIoError::unavailable(ticker, period, format!("read failed: {}", e)))?;

        if !status.is_success() {
            // Error payloads usually still carry a chart.error description
            let detail = serde_json::from_str::<ChartEnvelope>(&body)
                .ok()
                .and_then(|env| env.chart.error)
                .map(|err| err.to_string())
                .unwrap_or_else(|| "no error detail".to_string());
            return Err(TradeIoError::unavailable(
                ticker,
                period,
                format!("http status {}: {}", status.as_u16(), detail),
            ));
        }

        parse_chart_response(ticker, period, &body)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: ChartBody,
}

#[derive(Debug, Deserialize)]
struct ChartBody {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    #[serde(default)]
    description: String,
}

impl std::fmt::Display for ChartError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.code, self.description)
    }
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

fn value_at(column: &[Option<f64>], i: usize) -> Option<f64> {
    column.get(i).copied().flatten()
}

/// Decode a chart API response body into daily records
///
/// Timestamps are shifted by the exchange offset before taking the date so
/// that each bar keeps its local trading date. Bars without a close are
/// skipped.
pub fn parse_chart_response(ticker: &str, period: &str, body: &str) -> Result<Vec<PriceRecord>> {
    let envelope: ChartEnvelope = serde_json::from_str(body).map_err(|e| {
        TradeIoError::unavailable(ticker, period, format!("response decode failed: {}", e))
    })?;

    if let Some(err) = envelope.chart.error {
        return Err(TradeIoError::unavailable(ticker, period, err.to_string()));
    }

    let result = envelope
        .chart
        .result
        .and_then(|results| results.into_iter().next())
        .ok_or_else(|| TradeIoError::unavailable(ticker, period, "empty chart result"))?;

    let empty = ChartQuote::default();
    let quote = result.indicators.quote.first().unwrap_or(&empty);

    let mut records = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let Some(close) = value_at(&quote.close, i) else {
            continue;
        };
        let date = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0)
            .ok_or_else(|| {
                TradeIoError::unavailable(ticker, period, format!("invalid timestamp {}", ts))
            })?
            .date_naive();

        records.push(PriceRecord::new(
            date,
            value_at(&quote.open, i).unwrap_or(close),
            value_at(&quote.high, i).unwrap_or(close),
            value_at(&quote.low, i).unwrap_or(close),
            close,
            value_at(&quote.volume, i).map(|v| v.max(0.0) as u64).unwrap_or(0),
        ));
    }

    if records.is_empty() {
        return Err(TradeIoError::unavailable(
            ticker,
            period,
            "no price rows returned",
        ));
    }

    debug!(rows = records.len(), ticker, "decoded chart response");
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = r#"{
        "chart": {
            "result": [{
                "meta": { "symbol": "TEST", "gmtoffset": -18000 },
                "timestamp": [1672756200, 1672842600, 1672929000],
                "indicators": { "quote": [{
                    "open":   [130.28, null, 127.13],
                    "high":   [130.90, null, 127.77],
                    "low":    [124.17, null, 124.76],
                    "close":  [125.07, null, 126.36],
                    "volume": [112117500, null, 80962700]
                }]}
            }],
            "error": null
        }
    }"#;

    #[test]
    fn test_parse_chart_response() {
        let records = parse_chart_response("TEST", "1mo", SAMPLE).unwrap();

        // The null bar is skipped
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(records[0].close(), 125.07);
        assert_eq!(records[0].data.volume, 112117500);
        assert_eq!(records[1].date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[test]
    fn test_api_error_is_unavailable() {
        let body = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;
        let err = parse_chart_response("NOPE", "5y", body).unwrap_err();

        match err {
            TradeIoError::DataUnavailable {
                ticker,
                period,
                reason,
            } => {
                assert_eq!(ticker, "NOPE");
                assert_eq!(period, "5y");
                assert!(reason.contains("No data found"));
            }
            other => panic!("Expected DataUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_garbage_body_is_unavailable() {
        let err = parse_chart_response("TEST", "5y", "<html>rate limited</html>").unwrap_err();
        assert!(matches!(err, TradeIoError::DataUnavailable { .. }));
    }

    #[test]
    fn test_chart_url() {
        let loader = YahooChartLoader::new_with_base_url("http://localhost:9/".to_string()).unwrap();
        assert_eq!(loader.chart_url("AAPL"), "http://localhost:9/v8/finance/chart/AAPL");
        assert_eq!(loader.name(), "yahoo");
    }

    #[test]
    fn test_csv_loader_missing_file() {
        let loader = CsvSeriesLoader::new("/nonexistent/series.csv");
        let err = loader.fetch("AAPL", "5y").unwrap_err();
        assert!(matches!(err, TradeIoError::DataUnavailable { .. }));
    }
}
