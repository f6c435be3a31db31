use serde::{Deserialize, Serialize};

use super::{check_training_set, ModelError, Regressor};

/// Display name used in reports and artifacts.
pub const MODEL_NAME: &str = "Linear Regression";

const DEFAULT_LEARNING_RATE: f64 = 0.05;
const DEFAULT_EPOCHS: usize = 2000;

/// Linear regression with bias, trained by full-batch gradient descent.
/// Weights start at zero, so fitting is deterministic for a given training
/// set. Assumes standardized numeric features; the learning-rate default is
/// tuned for that scale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    weights: Vec<f64>,
    bias: f64,
    learning_rate: f64,
    epochs: usize,
}

impl Default for LinearRegressionModel {
    fn default() -> Self {
        Self::new(DEFAULT_LEARNING_RATE, DEFAULT_EPOCHS)
    }
}

impl LinearRegressionModel {
    /// Creates an unfitted model with the given hyperparameters.
    #[must_use]
    pub const fn new(learning_rate: f64, epochs: usize) -> Self {
        Self {
            weights: Vec::new(),
            bias: 0.0,
            learning_rate,
            epochs,
        }
    }

    /// Fitted coefficients, one per feature (empty before fitting).
    #[must_use]
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Fitted intercept.
    #[must_use]
    pub const fn bias(&self) -> f64 {
        self.bias
    }

    fn predict_row(&self, row: &[f64]) -> f64 {
        row.iter()
            .zip(self.weights.iter())
            .map(|(feature, weight)| feature * weight)
            .sum::<f64>()
            + self.bias
    }
}

impl Regressor for LinearRegressionModel {
    fn name(&self) -> &'static str {
        MODEL_NAME
    }

    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<(), ModelError> {
        check_training_set(rows, targets)?;
        let count = rows.len() as f64;
        self.weights = vec![0.0; rows[0].len()];
        self.bias = 0.0;

        for _ in 0..self.epochs {
            let errors: Vec<f64> = rows
                .iter()
                .zip(targets.iter())
                .map(|(row, target)| self.predict_row(row) - target)
                .collect();

            let mut gradients = vec![0.0; self.weights.len()];
            for (error, row) in errors.iter().zip(rows.iter()) {
                for (gradient, feature) in gradients.iter_mut().zip(row.iter()) {
                    *gradient += error * feature;
                }
            }
            for (weight, gradient) in self.weights.iter_mut().zip(gradients.iter()) {
                *weight -= self.learning_rate * gradient / count;
            }

            let bias_gradient = errors.iter().sum::<f64>() / count;
            self.bias -= self.learning_rate * bias_gradient;
        }
        Ok(())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter().map(|row| self.predict_row(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recovers_a_linear_relationship() {
        // y = 2x + 1 over a standardized-scale input
        let rows: Vec<Vec<f64>> = (-5..=5).map(|x| vec![f64::from(x) / 5.0]).collect();
        let targets: Vec<f64> = rows.iter().map(|row| 2.0 * row[0] + 1.0).collect();
        let mut model = LinearRegressionModel::default();
        model.fit(&rows, &targets).unwrap();
        assert!((model.weights()[0] - 2.0).abs() < 1e-3);
        assert!((model.bias() - 1.0).abs() < 1e-3);
        let predictions = model.predict(&rows);
        for (prediction, target) in predictions.iter().zip(targets.iter()) {
            assert!((prediction - target).abs() < 1e-2);
        }
    }

    #[test]
    fn fitting_is_deterministic() {
        let rows = vec![vec![0.0, 1.0], vec![1.0, 0.0], vec![1.0, 1.0]];
        let targets = vec![1.0, 2.0, 3.0];
        let mut first = LinearRegressionModel::default();
        let mut second = LinearRegressionModel::default();
        first.fit(&rows, &targets).unwrap();
        second.fit(&rows, &targets).unwrap();
        assert_eq!(first.weights(), second.weights());
        assert_eq!(first.predict(&rows), second.predict(&rows));
    }

    #[test]
    fn unfitted_model_predicts_zero() {
        let model = LinearRegressionModel::default();
        assert_eq!(model.predict(&[vec![1.0, 2.0]]), vec![0.0]);
    }

    #[test]
    fn empty_training_set_is_rejected() {
        let mut model = LinearRegressionModel::default();
        assert!(matches!(
            model.fit(&[], &[]),
            Err(ModelError::EmptyTrainingSet)
        ));
    }
}
