use rand::{rngs::SmallRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::{check_training_set, tree::DecisionTreeRegressor, ModelError, Regressor};

/// Display name used in reports and artifacts.
pub const MODEL_NAME: &str = "Random Forest";

/// Ensemble size matching the reference benchmark configuration.
pub const DEFAULT_N_TREES: usize = 100;

/// Member trees grow deeper than the standalone tree; bagging controls the
/// variance instead of the depth bound.
const MEMBER_MAX_DEPTH: usize = 16;

/// Bootstrap-aggregated ensemble of regression trees. Each member fits a
/// bootstrap resample drawn from one seeded rng, so a fixed seed reproduces
/// the whole ensemble; predictions are the mean over members.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RandomForestRegressor {
    n_trees: usize,
    seed: u64,
    trees: Vec<DecisionTreeRegressor>,
}

impl Default for RandomForestRegressor {
    fn default() -> Self {
        Self::new(DEFAULT_N_TREES, 42)
    }
}

impl RandomForestRegressor {
    /// Creates an unfitted forest of `n_trees` members.
    #[must_use]
    pub const fn new(n_trees: usize, seed: u64) -> Self {
        Self {
            n_trees,
            seed,
            trees: Vec::new(),
        }
    }

    /// Number of fitted member trees.
    #[must_use]
    pub fn n_fitted(&self) -> usize {
        self.trees.len()
    }
}

impl Regressor for RandomForestRegressor {
    fn name(&self) -> &'static str {
        MODEL_NAME
    }

    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<(), ModelError> {
        check_training_set(rows, targets)?;
        let mut rng = SmallRng::seed_from_u64(self.seed);
        self.trees = Vec::with_capacity(self.n_trees);
        for _ in 0..self.n_trees {
            let sample: Vec<usize> = (0..rows.len())
                .map(|_| rng.gen_range(0..rows.len()))
                .collect();
            let boot_rows: Vec<Vec<f64>> = sample.iter().map(|&idx| rows[idx].clone()).collect();
            let boot_targets: Vec<f64> = sample.iter().map(|&idx| targets[idx]).collect();
            let mut tree = DecisionTreeRegressor::new(MEMBER_MAX_DEPTH);
            tree.fit(&boot_rows, &boot_targets)?;
            self.trees.push(tree);
        }
        Ok(())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        if self.trees.is_empty() {
            return vec![0.0; rows.len()];
        }
        let mut blended = vec![0.0; rows.len()];
        for tree in &self.trees {
            for (total, prediction) in blended.iter_mut().zip(tree.predict(rows)) {
                *total += prediction;
            }
        }
        let count = self.trees.len() as f64;
        for total in &mut blended {
            *total /= count;
        }
        blended
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noisy_line() -> (Vec<Vec<f64>>, Vec<f64>) {
        let rows: Vec<Vec<f64>> = (0..40).map(|x| vec![f64::from(x) / 4.0]).collect();
        let targets: Vec<f64> = rows
            .iter()
            .enumerate()
            .map(|(idx, row)| 3.0 * row[0] + if idx % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        (rows, targets)
    }

    #[test]
    fn fits_the_configured_number_of_trees() {
        let (rows, targets) = noisy_line();
        let mut forest = RandomForestRegressor::new(10, 42);
        forest.fit(&rows, &targets).unwrap();
        assert_eq!(forest.n_fitted(), 10);
    }

    #[test]
    fn same_seed_reproduces_predictions() {
        let (rows, targets) = noisy_line();
        let mut first = RandomForestRegressor::new(15, 42);
        let mut second = RandomForestRegressor::new(15, 42);
        first.fit(&rows, &targets).unwrap();
        second.fit(&rows, &targets).unwrap();
        assert_eq!(first.predict(&rows), second.predict(&rows));
    }

    #[test]
    fn tracks_the_underlying_signal() {
        let (rows, targets) = noisy_line();
        let mut forest = RandomForestRegressor::new(25, 7);
        forest.fit(&rows, &targets).unwrap();
        let predictions = forest.predict(&rows);
        let mse = predictions
            .iter()
            .zip(targets.iter())
            .map(|(prediction, target)| (prediction - target).powi(2))
            .sum::<f64>()
            / targets.len() as f64;
        assert!(mse < 1.0, "mse {mse} too high for a near-linear signal");
    }

    #[test]
    fn unfitted_forest_predicts_zero() {
        let forest = RandomForestRegressor::default();
        assert_eq!(forest.predict(&[vec![1.0], vec![2.0]]), vec![0.0, 0.0]);
    }
}
