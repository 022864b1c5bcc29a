//! SVG chart of the price series with historical and predicted best days
//!
//! Price lines follow the analysis basis, so historical extrema (circles)
//! sit on a line: one line for close or open, a low and a high line for the
//! intraday basis. Predicted dates have no price, so they are drawn as
//! triangles at the last observed buy-side price. Buy points are green,
//! sell points red.

use crate::error::{Result, TradeIoError};
use chrono::NaiveDate;
use month_trade::{AnalysisReport, ExtremumKind, PriceBasis};
use plotters::prelude::*;
use std::path::Path;
use tracing::debug;

const CHART_SIZE: (u32, u32) = (1280, 640);
const ORANGE: RGBColor = RGBColor(230, 126, 34);

fn plot_err<E: std::fmt::Display>(err: E) -> TradeIoError {
    TradeIoError::PlotError(err.to_string())
}

fn kind_color(kind: ExtremumKind) -> RGBColor {
    match kind {
        ExtremumKind::Buy => GREEN,
        ExtremumKind::Sell => RED,
    }
}

type PriceLine = (&'static str, ExtremumKind);

const CLOSE_LINES: &[PriceLine] = &[("Close", ExtremumKind::Buy)];
const OPEN_LINES: &[PriceLine] = &[("Open", ExtremumKind::Buy)];
const INTRADAY_LINES: &[PriceLine] = &[("Low", ExtremumKind::Buy), ("High", ExtremumKind::Sell)];

/// Price lines drawn for a basis, with the side whose price each line shows
fn price_lines(basis: PriceBasis) -> &'static [PriceLine] {
    match basis {
        PriceBasis::Close => CLOSE_LINES,
        PriceBasis::Open => OPEN_LINES,
        PriceBasis::Intraday => INTRADAY_LINES,
    }
}

/// Render the chart of a finished analysis to an SVG file
pub fn render_chart(path: &Path, ticker: &str, report: &AnalysisReport) -> Result<()> {
    let series = report.series();
    let (first, last) = match (series.first(), series.last()) {
        (Some(first), Some(last)) => (first, last),
        _ => return Err(TradeIoError::DataError("Cannot plot an empty series".to_string())),
    };

    let end: NaiveDate = report
        .predictions()
        .iter()
        .flat_map(|m| m.points())
        .map(|p| p.date)
        .max()
        .unwrap_or(last.date)
        .max(last.date);

    let basis = report.config().basis;
    let lines = price_lines(basis);

    let prices = lines
        .iter()
        .flat_map(|&(_, kind)| series.iter().map(move |r| r.price(basis, kind)))
        .chain(report.extrema().iter().flat_map(|m| m.points()).map(|p| p.price));
    let (low, high) = prices.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
        (lo.min(p), hi.max(p))
    });
    let pad = ((high - low) * 0.05).max(1.0);

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Historical and predicted best buy/sell dates for {}", ticker),
            ("sans-serif", 22).into_font(),
        )
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(first.date..end, (low - pad)..(high + pad))
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_labels(10)
        .x_label_formatter(&|d: &NaiveDate| d.format("%Y-%m").to_string())
        .x_desc("Date")
        .y_desc(format!("Price ({})", basis))
        .draw()
        .map_err(plot_err)?;

    for &(label, kind) in lines {
        let color = match kind {
            ExtremumKind::Buy => BLACK.mix(0.6),
            ExtremumKind::Sell => BLUE.mix(0.5),
        };
        chart
            .draw_series(LineSeries::new(
                series.iter().map(|r| (r.date, r.price(basis, kind))),
                color,
            ))
            .map_err(plot_err)?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    for kind in [ExtremumKind::Buy, ExtremumKind::Sell] {
        let color = kind_color(kind);
        chart
            .draw_series(
                report
                    .extrema()
                    .iter()
                    .flat_map(|m| m.points())
                    .filter(|p| p.kind == kind)
                    .map(|p| Circle::new((p.date, p.price), 4, color.filled())),
            )
            .map_err(plot_err)?
            .label(format!("Historical {}", kind))
            .legend(move |(x, y)| Circle::new((x + 10, y), 4, color.filled()));
    }

    let anchor = last.price(basis, ExtremumKind::Buy);
    for kind in [ExtremumKind::Buy, ExtremumKind::Sell] {
        let color = kind_color(kind);
        chart
            .draw_series(
                report
                    .predictions()
                    .iter()
                    .flat_map(|m| m.points())
                    .filter(|p| p.kind == kind)
                    .map(|p| {
                        // Fallback days get an outlined marker
                        let style = if p.is_fallback {
                            ORANGE.stroke_width(2)
                        } else {
                            color.filled()
                        };
                        TriangleMarker::new((p.date, anchor), 7, style)
                    }),
            )
            .map_err(plot_err)?
            .label(format!("Predicted {}", kind))
            .legend(move |(x, y)| TriangleMarker::new((x + 10, y), 6, color.filled()));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;
    debug!(path = %path.display(), "rendered chart");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;
    use month_trade::utils::generate_seeded_data;
    use month_trade::{run_analysis, AnalysisConfig};

    #[test]
    fn test_extrema_lie_on_a_drawn_line() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 2).unwrap();
        let series = generate_seeded_data(3, start, 120, 100.0, 0.05);

        for basis in [PriceBasis::Close, PriceBasis::Open, PriceBasis::Intraday] {
            let report = run_analysis(&series, &AnalysisConfig::new(1, basis)).unwrap();
            let lines = price_lines(basis);

            for point in report.extrema().iter().flat_map(|m| m.points()) {
                let record = report
                    .series()
                    .iter()
                    .find(|r| r.date == point.date)
                    .unwrap();
                assert!(
                    lines
                        .iter()
                        .any(|&(_, kind)| record.price(basis, kind) == point.price),
                    "{} {} off every {} line",
                    point.kind,
                    point.date.day(),
                    basis
                );
            }
        }
    }

    #[test]
    fn test_intraday_draws_low_and_high() {
        let labels: Vec<&str> = price_lines(PriceBasis::Intraday)
            .iter()
            .map(|&(label, _)| label)
            .collect();
        assert_eq!(labels, vec!["Low", "High"]);
        assert_eq!(price_lines(PriceBasis::Open)[0].0, "Open");
    }
}
