use best_days::{run, CsvSeriesLoader, MonthTradeError, RunConfig, RunError, TradeIoError};
use chrono::NaiveDate;
use month_trade::utils::generate_seasonal_data;
use pretty_assertions::assert_eq;
use std::path::Path;
use tempfile::{tempdir, TempDir};

/// Two years of prices that bottom on the 8th and peak on the 22nd, saved as CSV
fn seasonal_csv() -> (TempDir, std::path::PathBuf) {
    let dir = tempdir().unwrap();
    let path = dir.path().join("input.csv");
    let series = generate_seasonal_data(
        NaiveDate::from_ymd_opt(2022, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2023, 12, 31).unwrap(),
        8,
        22,
    );
    trade_io::write_series_csv(&path, &series).unwrap();
    (dir, path)
}

fn config_in(out: &Path, horizon: i64) -> RunConfig {
    let mut config = RunConfig::new("SEAS", "2y", horizon);
    config.output_dir = out.to_path_buf();
    config
}

#[test]
fn test_run_writes_all_outputs() {
    let (_input_dir, input) = seasonal_csv();
    let out = tempdir().unwrap();
    let config = config_in(out.path(), 4);

    let report = run(&config, &CsvSeriesLoader::new(&input)).unwrap();

    assert_eq!(report.predictions().len(), 4);
    assert_eq!(report.start().to_string(), "2024-01");
    assert!(report.fallback_months().is_empty());

    let paths = config.output_paths();
    for path in [
        &paths.data,
        &paths.historical,
        &paths.predicted,
        &paths.metadata,
        &paths.chart,
    ] {
        assert!(path.exists(), "missing {}", path.display());
    }
}

#[test]
fn test_no_plot_skips_chart() {
    let (_input_dir, input) = seasonal_csv();
    let out = tempdir().unwrap();
    let mut config = config_in(out.path(), 1);
    config.plot = false;

    run(&config, &CsvSeriesLoader::new(&input)).unwrap();

    let paths = config.output_paths();
    assert!(paths.predicted.exists());
    assert!(!paths.chart.exists());
}

#[test]
fn test_failed_chart_removes_written_files() {
    let (_input_dir, input) = seasonal_csv();
    let out = tempdir().unwrap();
    let config = config_in(out.path(), 2);
    let paths = config.output_paths();

    // A directory in place of the chart file makes the last writer fail
    std::fs::create_dir(&paths.chart).unwrap();

    let err = run(&config, &CsvSeriesLoader::new(&input)).unwrap_err();
    assert!(
        matches!(err, RunError::Io(TradeIoError::PlotError(_))),
        "{:?}",
        err
    );

    let left: Vec<_> = std::fs::read_dir(out.path())
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect();
    assert_eq!(left, vec![paths.chart.clone()]);
    assert!(!paths.data.exists());
    assert!(!paths.historical.exists());
    assert!(!paths.predicted.exists());
    assert!(!paths.metadata.exists());
}

#[test]
fn test_invalid_horizon_writes_nothing() {
    let (_input_dir, input) = seasonal_csv();
    let out = tempdir().unwrap();

    for horizon in [0, -1, 1201] {
        let config = config_in(out.path(), horizon);
        match run(&config, &CsvSeriesLoader::new(&input)) {
            Err(RunError::Core(MonthTradeError::InvalidHorizon(n))) => assert_eq!(n, horizon),
            other => panic!("Expected InvalidHorizon, got {:?}", other.map(|_| ())),
        }
    }

    assert_eq!(std::fs::read_dir(out.path()).unwrap().count(), 0);
}

#[test]
fn test_empty_series_writes_nothing() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("empty.csv");
    std::fs::write(&input, "date,close\n").unwrap();
    let out = dir.path().join("out");

    let err = run(&config_in(&out, 3), &CsvSeriesLoader::new(&input)).unwrap_err();

    assert!(matches!(err, RunError::Core(MonthTradeError::EmptyInput)));
    assert!(!out.exists());
}

#[test]
fn test_missing_input_is_unavailable() {
    let out = tempdir().unwrap();
    let err = run(
        &config_in(out.path(), 3),
        &CsvSeriesLoader::new(out.path().join("absent.csv")),
    )
    .unwrap_err();

    assert!(err.to_string().starts_with("series loader:"), "{}", err);
}
