use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while fitting or applying the scaler.
#[derive(Debug, Error)]
pub enum ScaleError {
    /// No rows to fit from.
    #[error("cannot fit a scaler on an empty reference population")]
    Empty,
    /// A feature is constant over the reference population, so the affine
    /// transform would divide by zero.
    #[error("feature {column:?} has zero standard deviation over the reference population")]
    ZeroVariance {
        /// Offending feature name.
        column: String,
    },
    /// A row handed to `transform` is narrower than the fitted layout.
    #[error("row has {found} features, expected at least {expected}")]
    WidthMismatch {
        /// Fitted numeric-block width.
        expected: usize,
        /// Actual row width.
        found: usize,
    },
}

/// Frozen per-feature statistics for one standardized column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureStats {
    /// Feature name.
    pub name: String,
    /// Mean over the reference population.
    pub mean: f64,
    /// Population standard deviation over the reference population.
    pub std: f64,
}

/// Standardizing scaler: `z = (x - mean) / std` per numeric feature, fitted
/// once on a reference population and replayable on any later rows. Only the
/// leading numeric block is touched; trailing one-hot indicators pass through
/// unchanged.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StandardScaler {
    stats: Vec<FeatureStats>,
}

impl StandardScaler {
    /// Fits per-feature mean and population standard deviation from the
    /// first `names.len()` columns of `rows`. A constant column is rejected
    /// rather than silently producing divisions by zero.
    pub fn fit(rows: &[Vec<f64>], names: &[&str]) -> Result<Self, ScaleError> {
        if rows.is_empty() {
            return Err(ScaleError::Empty);
        }
        let numeric = names.len();
        for row in rows {
            if row.len() < numeric {
                return Err(ScaleError::WidthMismatch {
                    expected: numeric,
                    found: row.len(),
                });
            }
        }

        let count = rows.len() as f64;
        let mut stats = Vec::with_capacity(numeric);
        for (idx, name) in names.iter().enumerate() {
            let mean = rows.iter().map(|row| row[idx]).sum::<f64>() / count;
            let variance = rows
                .iter()
                .map(|row| (row[idx] - mean).powi(2))
                .sum::<f64>()
                / count;
            let std = variance.sqrt();
            if std == 0.0 {
                return Err(ScaleError::ZeroVariance {
                    column: (*name).to_string(),
                });
            }
            stats.push(FeatureStats {
                name: (*name).to_string(),
                mean,
                std,
            });
        }
        Ok(Self { stats })
    }

    /// Applies the frozen transform to each row, standardizing the numeric
    /// block and copying the remainder verbatim.
    pub fn transform(&self, rows: &[Vec<f64>]) -> Result<Vec<Vec<f64>>, ScaleError> {
        rows.iter().map(|row| self.transform_row(row)).collect()
    }

    /// Applies the frozen transform to a single row.
    pub fn transform_row(&self, row: &[f64]) -> Result<Vec<f64>, ScaleError> {
        if row.len() < self.stats.len() {
            return Err(ScaleError::WidthMismatch {
                expected: self.stats.len(),
                found: row.len(),
            });
        }
        let mut scaled = row.to_vec();
        for (idx, stat) in self.stats.iter().enumerate() {
            scaled[idx] = (row[idx] - stat.mean) / stat.std;
        }
        Ok(scaled)
    }

    /// Frozen per-feature statistics, in feature order.
    #[must_use]
    pub fn stats(&self) -> &[FeatureStats] {
        &self.stats
    }

    /// Width of the standardized numeric block.
    #[must_use]
    pub fn numeric_width(&self) -> usize {
        self.stats.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NAMES: [&str; 2] = ["loc", "rely"];

    fn reference() -> Vec<Vec<f64>> {
        vec![
            vec![10.0, 0.8, 1.0],
            vec![20.0, 1.0, 0.0],
            vec![60.0, 1.2, 0.0],
        ]
    }

    #[test]
    fn round_trip_yields_zero_mean_unit_std() {
        let rows = reference();
        let scaler = StandardScaler::fit(&rows, &NAMES).unwrap();
        let scaled = scaler.transform(&rows).unwrap();
        for idx in 0..NAMES.len() {
            let mean = scaled.iter().map(|row| row[idx]).sum::<f64>() / scaled.len() as f64;
            let variance = scaled
                .iter()
                .map(|row| (row[idx] - mean).powi(2))
                .sum::<f64>()
                / scaled.len() as f64;
            assert!(mean.abs() < 1e-9, "column {idx} mean {mean}");
            assert!((variance.sqrt() - 1.0).abs() < 1e-9);
        }
        // trailing indicator column passes through untouched
        assert!((scaled[0][2] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn replay_on_new_rows_uses_frozen_stats() {
        let rows = reference();
        let scaler = StandardScaler::fit(&rows, &NAMES).unwrap();
        let new_row = scaler.transform_row(&[30.0, 1.0, 1.0]).unwrap();
        let stats = scaler.stats();
        assert!((new_row[0] - (30.0 - stats[0].mean) / stats[0].std).abs() < 1e-12);
        // mean rely is 1.0 over the reference, so it standardizes to zero
        assert!(new_row[1].abs() < 1e-9);
    }

    #[test]
    fn zero_variance_feature_is_rejected() {
        let rows = vec![vec![10.0, 1.0], vec![20.0, 1.0]];
        let err = StandardScaler::fit(&rows, &NAMES).unwrap_err();
        assert!(matches!(err, ScaleError::ZeroVariance { ref column } if column == "rely"));
    }

    #[test]
    fn empty_population_is_rejected() {
        let err = StandardScaler::fit(&[], &NAMES).unwrap_err();
        assert!(matches!(err, ScaleError::Empty));
    }

    #[test]
    fn narrow_row_is_rejected() {
        let rows = reference();
        let scaler = StandardScaler::fit(&rows, &NAMES).unwrap();
        let err = scaler.transform_row(&[1.0]).unwrap_err();
        assert!(matches!(
            err,
            ScaleError::WidthMismatch {
                expected: 2,
                found: 1
            }
        ));
    }

    #[test]
    fn serializes_and_reloads_identically() {
        let rows = reference();
        let scaler = StandardScaler::fit(&rows, &NAMES).unwrap();
        let json = serde_json::to_string(&scaler).unwrap();
        let reloaded: StandardScaler = serde_json::from_str(&json).unwrap();
        let row = [15.0, 0.9, 0.0];
        assert_eq!(
            scaler.transform_row(&row).unwrap(),
            reloaded.transform_row(&row).unwrap()
        );
    }
}
