use chrono::NaiveDate;
use month_trade::utils::generate_seasonal_data;
use month_trade::{run_analysis, AnalysisConfig, AnalysisReport, PriceBasis};
use pretty_assertions::assert_eq;
use std::fs;
use tempfile::tempdir;
use trade_io::{render_chart, write_report, write_series_csv, DataLoader, OutputPaths};

fn seasonal_report(horizon: i64) -> AnalysisReport {
    // Two full years, every month bottoming on the 10th and peaking on the 20th
    let start = NaiveDate::from_ymd_opt(2022, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2023, 12, 31).unwrap();
    let series = generate_seasonal_data(start, end, 10, 20);
    run_analysis(&series, &AnalysisConfig::new(horizon, PriceBasis::Close)).unwrap()
}

fn csv_rows(path: &std::path::Path) -> Vec<Vec<String>> {
    let mut reader = csv::Reader::from_path(path).unwrap();
    reader
        .records()
        .map(|r| r.unwrap().iter().map(str::to_string).collect())
        .collect()
}

#[test]
fn test_write_report_files() {
    let dir = tempdir().unwrap();
    let report = seasonal_report(3);
    let paths = OutputPaths::new(dir.path(), "TEST", "2y");

    write_report(&paths, "TEST", "2y", &report).unwrap();

    let historical = csv_rows(&paths.historical);
    // One buy and one sell row per historical month
    assert_eq!(historical.len(), 48);
    assert_eq!(historical[0][0], "2022-01");
    assert_eq!(historical[0][3], "BUY");
    assert_eq!(historical[1][0], "2022-01");
    assert_eq!(historical[1][3], "SELL");

    let predicted = csv_rows(&paths.predicted);
    assert_eq!(predicted.len(), 6);
    assert_eq!(predicted[0][0], "2024-01");
    assert_eq!(predicted[0][2], "BUY");
    assert_eq!(predicted[0][3], "false");
    assert_eq!(predicted[5][0], "2024-03");
    assert_eq!(predicted[5][2], "SELL");
}

#[test]
fn test_metadata_carries_disclaimer() {
    let dir = tempdir().unwrap();
    let report = seasonal_report(2);
    let paths = OutputPaths::new(dir.path(), "TEST", "2y");

    write_report(&paths, "TEST", "2y", &report).unwrap();

    let meta: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&paths.metadata).unwrap()).unwrap();
    assert_eq!(meta["ticker"], "TEST");
    assert_eq!(meta["period"], "2y");
    assert_eq!(meta["horizon"], 2);
    assert_eq!(meta["months_analyzed"], 24);
    assert_eq!(meta["first_predicted_month"], "2024-01");
    assert_eq!(meta["fallback_months"].as_array().unwrap().len(), 0);
    assert_eq!(meta["patterns"].as_array().unwrap().len(), 12);
    assert!(meta["disclaimer"]
        .as_str()
        .unwrap()
        .contains("no statistical confidence bounds"));
}

#[test]
fn test_render_chart_writes_svg() {
    let dir = tempdir().unwrap();
    let report = seasonal_report(2);
    let paths = OutputPaths::new(dir.path(), "TEST", "2y");

    render_chart(&paths.chart, "TEST", &report).unwrap();

    let svg = fs::read_to_string(&paths.chart).unwrap();
    assert!(svg.contains("<svg"));
}

#[test]
fn test_series_csv_round_trip() {
    let dir = tempdir().unwrap();
    let report = seasonal_report(1);
    let paths = OutputPaths::new(dir.path(), "TEST", "2y");

    write_series_csv(&paths.data, report.series()).unwrap();
    let loaded = DataLoader::from_csv(&paths.data).unwrap();

    assert_eq!(loaded.len(), report.series().len());
    assert_eq!(loaded.first(), report.series().first());
    assert_eq!(loaded.last(), report.series().last());
}
