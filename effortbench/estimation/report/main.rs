//! Benchmark reporting: console rendering, winner selection, plotting, and
//! artifact persistence.

/// Comparison-chart rendering.
pub mod plots;

/// Fitted model and scaler persistence.
pub mod persist;

use std::fmt::Write as _;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::Serialize;

use crate::dataset::ColumnSummary;
use crate::features::scale::FeatureStats;
use crate::metrics::Metrics;

/// Evaluation outcome for one estimator.
#[derive(Debug, Clone, Serialize)]
pub struct ModelReport {
    /// Estimator display name.
    pub name: String,
    /// Accuracy on the test partition.
    pub metrics: Metrics,
}

/// One head-of-results row: the held-out truth and each estimator's
/// prediction, in model order, on the log-effort scale.
#[derive(Debug, Clone, Serialize)]
pub struct HeadRow {
    /// Actual log effort for the test row.
    pub actual: f64,
    /// Per-model predictions aligned with [`BenchmarkReport::models`].
    pub predicted: Vec<f64>,
}

/// Everything one benchmark run produced, minus the artifacts on disk.
#[derive(Debug, Clone, Serialize)]
pub struct BenchmarkReport {
    /// When the run finished.
    pub generated_at: DateTime<Utc>,
    /// Descriptive statistics of the loaded table, in schema order.
    pub dataset: IndexMap<String, ColumnSummary>,
    /// Frozen scaler statistics (training partition only).
    pub scaler: Vec<FeatureStats>,
    /// Training partition size.
    pub train_rows: usize,
    /// Test partition size.
    pub test_rows: usize,
    /// Per-estimator evaluation, in presentation order.
    pub models: Vec<ModelReport>,
    /// First test rows with per-model predictions.
    pub head: Vec<HeadRow>,
    /// Name of the minimum-RMSE estimator.
    pub best: String,
    /// Where the comparison charts were written.
    pub image_path: PathBuf,
    /// Artifact directory when a learned model won and was persisted;
    /// `None` when the parametric formula won.
    pub artifact_dir: Option<PathBuf>,
}

impl BenchmarkReport {
    /// Renders the full console report.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::new();

        let _ = writeln!(out, "Descriptive statistics");
        let _ = writeln!(
            out,
            "{:<8} {:>6} {:>12} {:>12} {:>12} {:>12}",
            "column", "count", "mean", "std", "min", "max"
        );
        for (column, summary) in &self.dataset {
            let _ = writeln!(
                out,
                "{:<8} {:>6} {:>12.4} {:>12.4} {:>12.4} {:>12.4}",
                column, summary.count, summary.mean, summary.std, summary.min, summary.max
            );
        }

        let _ = writeln!(out, "\nScaler statistics (fit on training partition)");
        let _ = writeln!(out, "{:<8} {:>12} {:>12}", "feature", "mean", "std");
        for stat in &self.scaler {
            let _ = writeln!(out, "{:<8} {:>12.4} {:>12.4}", stat.name, stat.mean, stat.std);
        }

        let _ = writeln!(
            out,
            "\nPartitions: {} training rows, {} test rows",
            self.train_rows, self.test_rows
        );

        let _ = writeln!(out, "\nModel comparison (log effort scale)");
        let _ = writeln!(
            out,
            "{:<18} {:>10} {:>10} {:>10}",
            "model", "MAE", "RMSE", "R²"
        );
        for report in &self.models {
            let r2 = if report.metrics.r_squared.is_nan() {
                "undef".to_string()
            } else {
                format!("{:.4}", report.metrics.r_squared)
            };
            let _ = writeln!(
                out,
                "{:<18} {:>10.4} {:>10.4} {:>10}",
                report.name, report.metrics.mae, report.metrics.rmse, r2
            );
        }

        let _ = writeln!(out, "\nFirst {} test predictions", self.head.len());
        let mut header = format!("{:>10}", "actual");
        for report in &self.models {
            let _ = write!(header, " {:>18}", report.name);
        }
        let _ = writeln!(out, "{header}");
        for row in &self.head {
            let mut line = format!("{:>10.4}", row.actual);
            for value in &row.predicted {
                let _ = write!(line, " {value:>18.4}");
            }
            let _ = writeln!(out, "{line}");
        }

        let _ = writeln!(out, "\nBest model by RMSE: {}", self.best);
        let _ = writeln!(out, "Charts written to {}", self.image_path.display());
        match &self.artifact_dir {
            Some(dir) => {
                let _ = writeln!(out, "Model and scaler persisted under {}", dir.display());
            }
            None => {
                let _ = writeln!(
                    out,
                    "Parametric formula won; nothing to persist (it has no fitted state)"
                );
            }
        }
        out
    }
}

/// Index of the minimum-RMSE report. A `NaN` RMSE never wins; `None` when
/// every candidate is `NaN`-scored.
#[must_use]
pub fn select_best(reports: &[ModelReport]) -> Option<usize> {
    reports
        .iter()
        .enumerate()
        .filter(|(_, report)| !report.metrics.rmse.is_nan())
        .min_by(|(_, a), (_, b)| a.metrics.rmse.total_cmp(&b.metrics.rmse))
        .map(|(idx, _)| idx)
}
