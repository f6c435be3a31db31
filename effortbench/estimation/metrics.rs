use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while evaluating predictions.
#[derive(Debug, Error)]
pub enum MetricsError {
    /// Nothing to evaluate.
    #[error("cannot evaluate an empty prediction set")]
    Empty,
    /// True values and predictions disagree in length.
    #[error("true values ({truths}) and predictions ({predictions}) differ in length")]
    LengthMismatch {
        /// Number of true values.
        truths: usize,
        /// Number of predictions.
        predictions: usize,
    },
}

/// Regression accuracy triple for one estimator on the test partition.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Metrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root-mean-squared error.
    pub rmse: f64,
    /// Coefficient of determination. `NaN` when the true values have zero
    /// variance (the ratio of residual to total sum of squares is undefined
    /// there); callers must treat a `NaN` score as non-comparable.
    pub r_squared: f64,
}

/// Computes MAE, RMSE, and R² for equal-length true/predicted slices.
pub fn evaluate(y_true: &[f64], y_pred: &[f64]) -> Result<Metrics, MetricsError> {
    if y_true.is_empty() {
        return Err(MetricsError::Empty);
    }
    if y_true.len() != y_pred.len() {
        return Err(MetricsError::LengthMismatch {
            truths: y_true.len(),
            predictions: y_pred.len(),
        });
    }

    let count = y_true.len() as f64;
    let mae = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(truth, prediction)| (truth - prediction).abs())
        .sum::<f64>()
        / count;
    let mse = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(truth, prediction)| (truth - prediction).powi(2))
        .sum::<f64>()
        / count;

    let mean = y_true.iter().sum::<f64>() / count;
    let ss_total = y_true.iter().map(|truth| (truth - mean).powi(2)).sum::<f64>();
    let ss_residual = y_true
        .iter()
        .zip(y_pred.iter())
        .map(|(truth, prediction)| (truth - prediction).powi(2))
        .sum::<f64>();
    let r_squared = if ss_total == 0.0 {
        f64::NAN
    } else {
        1.0 - ss_residual / ss_total
    };

    Ok(Metrics {
        mae,
        rmse: mse.sqrt(),
        r_squared,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perfect_predictions_score_one() {
        let truth = [1.0, 2.0, 3.0, 4.0];
        let metrics = evaluate(&truth, &truth).unwrap();
        assert_eq!(metrics.mae, 0.0);
        assert_eq!(metrics.rmse, 0.0);
        assert!((metrics.r_squared - 1.0).abs() < 1e-12);
    }

    #[test]
    fn errors_are_non_negative_and_rmse_dominates_mae() {
        let truth = [1.0, 5.0, 2.0, 8.0, -3.0];
        let predictions = [0.5, 6.0, 2.0, 4.0, -1.0];
        let metrics = evaluate(&truth, &predictions).unwrap();
        assert!(metrics.mae >= 0.0);
        assert!(metrics.rmse >= 0.0);
        assert!(metrics.rmse >= metrics.mae);
    }

    #[test]
    fn known_values() {
        // residuals of +-1 everywhere: mae = rmse = 1
        let truth = [0.0, 2.0, 4.0, 6.0];
        let predictions = [1.0, 1.0, 5.0, 5.0];
        let metrics = evaluate(&truth, &predictions).unwrap();
        assert!((metrics.mae - 1.0).abs() < 1e-12);
        assert!((metrics.rmse - 1.0).abs() < 1e-12);
        // ss_total = 20, ss_res = 4
        assert!((metrics.r_squared - 0.8).abs() < 1e-12);
    }

    #[test]
    fn zero_variance_truth_yields_nan_r_squared() {
        let truth = [3.0, 3.0, 3.0];
        let predictions = [3.0, 2.0, 4.0];
        let metrics = evaluate(&truth, &predictions).unwrap();
        assert!(metrics.r_squared.is_nan());
        // the error metrics stay well defined
        assert!(metrics.mae > 0.0);
        assert!(metrics.rmse > 0.0);
    }

    #[test]
    fn empty_and_mismatched_inputs_are_rejected() {
        assert!(matches!(evaluate(&[], &[]), Err(MetricsError::Empty)));
        assert!(matches!(
            evaluate(&[1.0], &[1.0, 2.0]),
            Err(MetricsError::LengthMismatch {
                truths: 1,
                predictions: 2
            })
        ));
    }
}
