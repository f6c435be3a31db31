//! Learned regression models sharing one training interface.

/// Gradient-descent linear regression.
pub mod linear;

/// Depth-bounded CART regression tree.
pub mod tree;

/// Bootstrap-aggregated tree ensemble.
pub mod forest;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use forest::RandomForestRegressor;
use linear::LinearRegressionModel;
use tree::DecisionTreeRegressor;

/// Errors produced while fitting a model.
#[derive(Debug, Error)]
pub enum ModelError {
    /// No training rows were provided.
    #[error("cannot fit on an empty training set")]
    EmptyTrainingSet,
    /// Features and targets disagree in length.
    #[error("feature rows ({rows}) and targets ({targets}) differ in length")]
    LengthMismatch {
        /// Number of feature rows.
        rows: usize,
        /// Number of targets.
        targets: usize,
    },
}

/// Common seam over the three learned estimators: `fit` mutates internal
/// state once, `predict` is pure and callable any number of times after.
/// An unfitted model predicts 0.0 for every row.
pub trait Regressor {
    /// Short display name used in reports.
    fn name(&self) -> &'static str;

    /// Fits internal parameters to the training data.
    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<(), ModelError>;

    /// Predicts one target value per input row.
    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64>;
}

pub(crate) fn check_training_set(rows: &[Vec<f64>], targets: &[f64]) -> Result<(), ModelError> {
    if rows.is_empty() {
        return Err(ModelError::EmptyTrainingSet);
    }
    if rows.len() != targets.len() {
        return Err(ModelError::LengthMismatch {
            rows: rows.len(),
            targets: targets.len(),
        });
    }
    Ok(())
}

/// A fitted estimator in a form that serializes to a flat JSON artifact and
/// reloads for later scoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SavedModel {
    /// Linear regression weights and bias.
    Linear(LinearRegressionModel),
    /// A single fitted decision tree.
    DecisionTree(DecisionTreeRegressor),
    /// The full fitted forest.
    RandomForest(RandomForestRegressor),
}

impl SavedModel {
    /// Display name matching the live model's.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Linear(_) => linear::MODEL_NAME,
            Self::DecisionTree(_) => tree::MODEL_NAME,
            Self::RandomForest(_) => forest::MODEL_NAME,
        }
    }

    /// Scores rows with the reloaded estimator.
    #[must_use]
    pub fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        match self {
            Self::Linear(model) => model.predict(rows),
            Self::DecisionTree(model) => model.predict(rows),
            Self::RandomForest(model) => model.predict(rows),
        }
    }
}
