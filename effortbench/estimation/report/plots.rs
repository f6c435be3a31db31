use std::path::Path;

use anyhow::{anyhow, Result};
use plotters::prelude::*;

use super::ModelReport;

const CHART_SIZE: (u32, u32) = (1400, 1000);

/// Renders the three comparison charts into one PNG: actual-vs-predicted
/// scatter, MAE/RMSE bars, and R² bars. `series` pairs each estimator name
/// with its test predictions, aligned with `reports`.
pub fn render_charts(
    path: &Path,
    actual: &[f64],
    series: &[(String, Vec<f64>)],
    reports: &[ModelReport],
) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    draw(path, actual, series, reports)
        .map_err(|err| anyhow!("rendering charts to {}: {err}", path.display()))
}

fn draw(
    path: &Path,
    actual: &[f64],
    series: &[(String, Vec<f64>)],
    reports: &[ModelReport],
) -> Result<(), Box<dyn std::error::Error>> {
    let root = BitMapBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;
    let areas = root.split_evenly((2, 2));

    draw_scatter(&areas[0], actual, series)?;
    draw_error_bars(&areas[1], reports)?;
    draw_r_squared_bars(&areas[2], reports)?;

    root.present()?;
    Ok(())
}

fn draw_scatter(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    actual: &[f64],
    series: &[(String, Vec<f64>)],
) -> Result<(), Box<dyn std::error::Error>> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for value in actual
        .iter()
        .chain(series.iter().flat_map(|(_, preds)| preds.iter()))
    {
        lo = lo.min(*value);
        hi = hi.max(*value);
    }
    let pad = ((hi - lo) * 0.05).max(0.5);
    let (lo, hi) = (lo - pad, hi + pad);

    let mut chart = ChartBuilder::on(area)
        .caption("Actual vs Predicted Effort (log scale)", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(50)
        .build_cartesian_2d(lo..hi, lo..hi)?;
    chart
        .configure_mesh()
        .x_desc("Actual log effort")
        .y_desc("Predicted log effort")
        .draw()?;

    // identity diagonal: a perfect estimator sits on this line
    chart.draw_series(LineSeries::new(vec![(lo, lo), (hi, hi)], BLACK.stroke_width(2)))?;

    for (idx, (name, predictions)) in series.iter().enumerate() {
        let color = Palette99::pick(idx).mix(0.7);
        chart
            .draw_series(
                actual
                    .iter()
                    .zip(predictions.iter())
                    .map(|(&x, &y)| Circle::new((x, y), 4, color.filled())),
            )?
            .label(name.clone())
            .legend(move |(x, y)| Circle::new((x, y), 4, color.filled()));
    }
    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;
    Ok(())
}

fn draw_error_bars(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    reports: &[ModelReport],
) -> Result<(), Box<dyn std::error::Error>> {
    let top = reports
        .iter()
        .flat_map(|report| [report.metrics.mae, report.metrics.rmse])
        .fold(0.0_f64, f64::max)
        .max(1e-6)
        * 1.2;
    let names: Vec<String> = reports.iter().map(|report| report.name.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption("MAE and RMSE by model", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..reports.len() as f64, 0.0..top)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(reports.len())
        .x_label_formatter(&|x| {
            names
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("Error (log effort)")
        .draw()?;

    chart
        .draw_series(reports.iter().enumerate().map(|(idx, report)| {
            let x = idx as f64;
            Rectangle::new([(x + 0.12, 0.0), (x + 0.46, report.metrics.mae)], BLUE.filled())
        }))?
        .label("MAE")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], BLUE.filled()));
    chart
        .draw_series(reports.iter().enumerate().map(|(idx, report)| {
            let x = idx as f64;
            Rectangle::new([(x + 0.54, 0.0), (x + 0.88, report.metrics.rmse)], RED.filled())
        }))?
        .label("RMSE")
        .legend(|(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], RED.filled()));

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .background_style(WHITE.mix(0.85))
        .draw()?;
    Ok(())
}

fn draw_r_squared_bars(
    area: &DrawingArea<BitMapBackend<'_>, plotters::coord::Shift>,
    reports: &[ModelReport],
) -> Result<(), Box<dyn std::error::Error>> {
    let scores: Vec<f64> = reports
        .iter()
        .map(|report| report.metrics.r_squared)
        .filter(|score| !score.is_nan())
        .collect();
    let floor = scores.iter().copied().fold(0.0_f64, f64::min) - 0.1;
    let names: Vec<String> = reports.iter().map(|report| report.name.clone()).collect();

    let mut chart = ChartBuilder::on(area)
        .caption("R² by model", ("sans-serif", 22))
        .margin(10)
        .x_label_area_size(60)
        .y_label_area_size(50)
        .build_cartesian_2d(0.0..reports.len() as f64, floor..1.05)?;
    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_labels(reports.len())
        .x_label_formatter(&|x| {
            names
                .get(x.floor() as usize)
                .cloned()
                .unwrap_or_default()
        })
        .y_desc("R²")
        .draw()?;

    // NaN-scored models get no bar; the report text flags them instead
    chart.draw_series(reports.iter().enumerate().filter_map(|(idx, report)| {
        let score = report.metrics.r_squared;
        if score.is_nan() {
            return None;
        }
        let x = idx as f64;
        Some(Rectangle::new(
            [(x + 0.2, 0.0), (x + 0.8, score)],
            GREEN.filled(),
        ))
    }))?;

    // zero line separates better-than-mean from worse-than-mean
    chart.draw_series(LineSeries::new(
        vec![(0.0, 0.0), (reports.len() as f64, 0.0)],
        RED.stroke_width(1),
    ))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::Metrics;
    use tempfile::tempdir;

    #[test]
    fn writes_a_png_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("charts").join("benchmark.png");
        let actual = vec![3.0, 4.0, 5.0, 6.0];
        let series = vec![
            ("COCOMO I".to_string(), vec![3.2, 3.9, 5.3, 5.8]),
            ("Linear Regression".to_string(), vec![2.9, 4.1, 5.1, 6.2]),
        ];
        let reports: Vec<ModelReport> = series
            .iter()
            .map(|(name, predictions)| ModelReport {
                name: name.clone(),
                metrics: crate::metrics::evaluate(&actual, predictions).unwrap(),
            })
            .collect();
        render_charts(&path, &actual, &series, &reports).unwrap();
        let metadata = std::fs::metadata(&path).unwrap();
        assert!(metadata.len() > 0);
    }

    #[test]
    fn nan_r_squared_does_not_break_rendering() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("benchmark.png");
        let actual = vec![3.0, 3.0, 3.0];
        let series = vec![("COCOMO I".to_string(), vec![3.1, 2.9, 3.0])];
        let reports = vec![ModelReport {
            name: "COCOMO I".to_string(),
            metrics: Metrics {
                mae: 0.066,
                rmse: 0.081,
                r_squared: f64::NAN,
            },
        }];
        render_charts(&path, &actual, &series, &reports).unwrap();
        assert!(path.exists());
    }
}
