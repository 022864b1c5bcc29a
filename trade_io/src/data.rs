//! Daily price series in CSV form

use crate::error::{Result, TradeIoError};
use chrono::NaiveDate;
use month_trade::PriceRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

/// Data loader for daily price series
#[derive(Debug)]
pub struct DataLoader;

/// Positions of the recognised columns in a CSV header
#[derive(Debug, Clone, Copy)]
struct ColumnIndex {
    date: usize,
    close: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    volume: Option<usize>,
}

impl DataLoader {
    /// Load a daily series from a CSV file
    pub fn from_csv<P: AsRef<Path>>(path: P) -> Result<Vec<PriceRecord>> {
        let file = File::open(path)?;
        Self::from_reader(file)
    }

    /// Load a daily series from any CSV source
    ///
    /// The header must name a date column and a close (or price) column;
    /// open, high, low and volume are optional. Missing prices default to
    /// the close and missing volume to zero. Rows without a close, such as
    /// the `null` rows some providers emit for holidays, are skipped.
    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<PriceRecord>> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns = Self::detect_columns(csv_reader.headers()?)?;

        let mut records = Vec::new();
        let mut skipped = 0usize;
        for (row, result) in csv_reader.records().enumerate() {
            let row_data = result?;
            // Header is line 1
            let line = row + 2;

            let close = match parse_price(row_data.get(columns.close), line, "close")? {
                Some(close) => close,
                None => {
                    skipped += 1;
                    continue;
                }
            };
            let date = parse_date(row_data.get(columns.date).unwrap_or_default(), line)?;

            let field = |idx: Option<usize>, name| -> Result<f64> {
                Ok(parse_price(idx.and_then(|i| row_data.get(i)), line, name)?.unwrap_or(close))
            };
            let open = field(columns.open, "open")?;
            let high = field(columns.high, "high")?;
            let low = field(columns.low, "low")?;
            let volume = parse_price(columns.volume.and_then(|i| row_data.get(i)), line, "volume")?
                .map(|v| v.max(0.0) as u64)
                .unwrap_or(0);

            records.push(PriceRecord::new(date, open, high, low, close, volume));
        }

        if skipped > 0 {
            warn!(skipped, "skipped CSV rows without a close price");
        }
        debug!(rows = records.len(), "loaded price series from CSV");

        Ok(records)
    }

    /// Detect the date and price columns of a header row
    fn detect_columns(headers: &csv::StringRecord) -> Result<ColumnIndex> {
        let names: Vec<String> = headers.iter().map(|h| h.to_lowercase()).collect();

        let exact = |wanted: &str| names.iter().position(|n| n == wanted);
        let containing = |wanted: &str| names.iter().position(|n| n.contains(wanted));

        let date = exact("date")
            .or_else(|| containing("date"))
            .or_else(|| containing("time"))
            .ok_or_else(|| TradeIoError::DataError("No date column found in data".to_string()))?;

        // "close" before "adj close"
        let close = exact("close")
            .or_else(|| containing("close"))
            .or_else(|| containing("price"))
            .ok_or_else(|| TradeIoError::DataError("No close column found in data".to_string()))?;

        Ok(ColumnIndex {
            date,
            close,
            open: exact("open").or_else(|| containing("open")),
            high: exact("high"),
            low: exact("low"),
            volume: exact("volume").or_else(|| containing("vol")),
        })
    }
}

fn parse_date(raw: &str, line: usize) -> Result<NaiveDate> {
    // Accept timestamps such as "2023-01-03 00:00:00-05:00" by keeping the date part
    let date_part = raw.get(..10).unwrap_or(raw);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").map_err(|e| {
        TradeIoError::DataError(format!("line {}: invalid date '{}': {}", line, raw, e))
    })
}

fn parse_price(raw: Option<&str>, line: usize, name: &str) -> Result<Option<f64>> {
    match raw {
        None => Ok(None),
        Some(s) if s.is_empty() || s.eq_ignore_ascii_case("null") || s.eq_ignore_ascii_case("nan") => {
            Ok(None)
        }
        Some(s) => s.parse::<f64>().map(Some).map_err(|e| {
            TradeIoError::DataError(format!("line {}: invalid {} '{}': {}", line, name, s, e))
        }),
    }
}

#[derive(Debug, Serialize)]
struct SeriesRow {
    date: NaiveDate,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: u64,
}

/// Write a daily series as `date,open,high,low,close,volume` rows
pub fn write_series<W: Write>(writer: W, records: &[PriceRecord]) -> Result<()> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    for record in records {
        csv_writer.serialize(SeriesRow {
            date: record.date,
            open: record.data.open,
            high: record.data.high,
            low: record.data.low,
            close: record.data.close,
            volume: record.data.volume,
        })?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Write a daily series to a CSV file
pub fn write_series_csv<P: AsRef<Path>>(path: P, records: &[PriceRecord]) -> Result<()> {
    write_series(File::create(path)?, records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_detects_mixed_case_headers() {
        let csv = "Date,Open,High,Low,Close,Adj Close,Volume\n\
                   2023-01-03,10,12,9,11,10.5,1500\n";
        let records = DataLoader::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].data.open, 10.0);
        assert_eq!(records[0].data.high, 12.0);
        assert_eq!(records[0].data.low, 9.0);
        // Plain close, not the adjusted close
        assert_eq!(records[0].close(), 11.0);
        assert_eq!(records[0].data.volume, 1500);
    }

    #[test]
    fn test_close_only_series() {
        let csv = "timestamp,price\n2023-01-03 00:00:00-05:00,42.5\n";
        let records = DataLoader::from_reader(csv.as_bytes()).unwrap();

        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 3).unwrap());
        assert_eq!(records[0].data.open, 42.5);
        assert_eq!(records[0].data.volume, 0);
    }

    #[test]
    fn test_null_rows_are_skipped() {
        let csv = "date,close\n2023-01-03,1.0\n2023-01-04,null\n2023-01-05,\n";
        let records = DataLoader::from_reader(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[rstest]
    #[case("date,close\n2023-01-03,1.0\n2023-13-04,2.0\n", "line 3: invalid date")]
    #[case("date,close\n2023-01-03,abc\n", "line 2: invalid close")]
    #[case("date,open,close\n2023-01-03,x,1.0\n", "line 2: invalid open")]
    fn test_bad_values_report_line(#[case] csv: &str, #[case] expected: &str) {
        let err = DataLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains(expected), "{}", err);
    }

    #[rstest]
    #[case("when,close\n2023-01-03,1.0\n", "No date column")]
    #[case("date,volume\n2023-01-03,1\n", "No close column")]
    fn test_missing_columns(#[case] csv: &str, #[case] expected: &str) {
        let err = DataLoader::from_reader(csv.as_bytes()).unwrap_err();
        assert!(err.to_string().contains(expected), "{}", err);
    }

    #[test]
    fn test_write_then_read_back() {
        let date = NaiveDate::from_ymd_opt(2023, 1, 3).unwrap();
        let records = vec![PriceRecord::new(date, 1.0, 2.0, 0.5, 1.5, 10)];

        let mut buffer = Vec::new();
        write_series(&mut buffer, &records).unwrap();
        let text = String::from_utf8(buffer.clone()).unwrap();
        assert!(text.starts_with("date,open,high,low,close,volume"));
        assert!(text.contains("2023-01-03,"));

        assert_eq!(DataLoader::from_reader(buffer.as_slice()).unwrap(), records);
    }
}
