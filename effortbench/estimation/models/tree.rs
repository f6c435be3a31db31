use serde::{Deserialize, Serialize};

use super::{check_training_set, ModelError, Regressor};

/// Display name used in reports and artifacts.
pub const MODEL_NAME: &str = "Decision Tree";

/// Depth bound matching the reference benchmark configuration.
pub const DEFAULT_MAX_DEPTH: usize = 5;

const MIN_SAMPLES_SPLIT: usize = 2;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
enum Node {
    Leaf {
        value: f64,
    },
    Split {
        feature: usize,
        threshold: f64,
        left: Box<Node>,
        right: Box<Node>,
    },
}

impl Node {
    fn predict(&self, row: &[f64]) -> f64 {
        match self {
            Self::Leaf { value } => *value,
            Self::Split {
                feature,
                threshold,
                left,
                right,
            } => {
                if row[*feature] <= *threshold {
                    left.predict(row)
                } else {
                    right.predict(row)
                }
            }
        }
    }

    fn depth(&self) -> usize {
        match self {
            Self::Leaf { .. } => 0,
            Self::Split { left, right, .. } => 1 + left.depth().max(right.depth()),
        }
    }

    fn leaves(&self) -> usize {
        match self {
            Self::Leaf { .. } => 1,
            Self::Split { left, right, .. } => left.leaves() + right.leaves(),
        }
    }
}

/// CART regression tree with depth-bounded, variance-reduction splits.
/// Thresholds sit midway between adjacent distinct feature values; leaves
/// predict the mean target of their training rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionTreeRegressor {
    max_depth: usize,
    root: Option<Node>,
}

impl Default for DecisionTreeRegressor {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl DecisionTreeRegressor {
    /// Creates an unfitted tree bounded at `max_depth` split levels.
    #[must_use]
    pub const fn new(max_depth: usize) -> Self {
        Self {
            max_depth,
            root: None,
        }
    }

    /// Actual depth of the fitted tree (0 for a single leaf or unfitted).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.root.as_ref().map_or(0, Node::depth)
    }

    /// Number of leaves in the fitted tree.
    #[must_use]
    pub fn n_leaves(&self) -> usize {
        self.root.as_ref().map_or(0, Node::leaves)
    }

    fn build(rows: &[Vec<f64>], targets: &[f64], indices: &[usize], depth_left: usize) -> Node {
        let count = indices.len() as f64;
        let mean = indices.iter().map(|&idx| targets[idx]).sum::<f64>() / count;

        let constant = indices
            .iter()
            .all(|&idx| (targets[idx] - targets[indices[0]]).abs() < f64::EPSILON);
        if depth_left == 0 || indices.len() < MIN_SAMPLES_SPLIT || constant {
            return Node::Leaf { value: mean };
        }

        match best_split(rows, targets, indices) {
            None => Node::Leaf { value: mean },
            Some(split) => {
                let left = Self::build(rows, targets, &split.left, depth_left - 1);
                let right = Self::build(rows, targets, &split.right, depth_left - 1);
                Node::Split {
                    feature: split.feature,
                    threshold: split.threshold,
                    left: Box::new(left),
                    right: Box::new(right),
                }
            }
        }
    }
}

struct BestSplit {
    feature: usize,
    threshold: f64,
    left: Vec<usize>,
    right: Vec<usize>,
}

/// Finds the split minimising the summed squared error of the two children,
/// scanning every feature and every boundary between adjacent distinct
/// values. `None` when all rows are identical on every feature.
fn best_split(rows: &[Vec<f64>], targets: &[f64], indices: &[usize]) -> Option<BestSplit> {
    let n_features = rows[indices[0]].len();
    let mut best: Option<(f64, usize, f64)> = None;

    for feature in 0..n_features {
        let mut order: Vec<usize> = indices.to_vec();
        order.sort_by(|&a, &b| rows[a][feature].total_cmp(&rows[b][feature]));

        // prefix sums of targets over the sorted order
        let mut sum = 0.0;
        let mut sum_sq = 0.0;
        let mut prefix = Vec::with_capacity(order.len() + 1);
        prefix.push((0.0, 0.0));
        for &idx in &order {
            sum += targets[idx];
            sum_sq += targets[idx] * targets[idx];
            prefix.push((sum, sum_sq));
        }
        let (total, total_sq) = prefix[order.len()];

        for boundary in 1..order.len() {
            let lo = rows[order[boundary - 1]][feature];
            let hi = rows[order[boundary]][feature];
            if lo >= hi {
                continue;
            }
            let (left_sum, left_sq) = prefix[boundary];
            let left_n = boundary as f64;
            let right_n = (order.len() - boundary) as f64;
            let right_sum = total - left_sum;
            let right_sq = total_sq - left_sq;
            let sse = (left_sq - left_sum * left_sum / left_n)
                + (right_sq - right_sum * right_sum / right_n);
            if best.is_none_or(|(best_sse, _, _)| sse < best_sse) {
                best = Some((sse, feature, (lo + hi) / 2.0));
            }
        }
    }

    best.map(|(_, feature, threshold)| {
        let (left, right): (Vec<usize>, Vec<usize>) = indices
            .iter()
            .partition(|&&idx| rows[idx][feature] <= threshold);
        BestSplit {
            feature,
            threshold,
            left,
            right,
        }
    })
}

impl Regressor for DecisionTreeRegressor {
    fn name(&self) -> &'static str {
        MODEL_NAME
    }

    fn fit(&mut self, rows: &[Vec<f64>], targets: &[f64]) -> Result<(), ModelError> {
        check_training_set(rows, targets)?;
        let indices: Vec<usize> = (0..rows.len()).collect();
        self.root = Some(Self::build(rows, targets, &indices, self.max_depth));
        Ok(())
    }

    fn predict(&self, rows: &[Vec<f64>]) -> Vec<f64> {
        rows.iter()
            .map(|row| self.root.as_ref().map_or(0.0, |root| root.predict(row)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_a_step_function_exactly() {
        let rows: Vec<Vec<f64>> = (0..10).map(|x| vec![f64::from(x)]).collect();
        let targets: Vec<f64> = (0..10).map(|x| if x < 5 { 1.0 } else { 9.0 }).collect();
        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&rows, &targets).unwrap();
        let predictions = tree.predict(&rows);
        assert_eq!(predictions, targets);
        assert_eq!(tree.depth(), 1);
        assert_eq!(tree.n_leaves(), 2);
    }

    #[test]
    fn depth_bound_is_respected() {
        let rows: Vec<Vec<f64>> = (0..64).map(|x| vec![f64::from(x)]).collect();
        // a target that would take depth 6 to memorise perfectly
        let targets: Vec<f64> = (0..64).map(f64::from).collect();
        let mut tree = DecisionTreeRegressor::new(3);
        tree.fit(&rows, &targets).unwrap();
        assert!(tree.depth() <= 3);
        assert!(tree.n_leaves() <= 8);
    }

    #[test]
    fn constant_targets_give_a_single_leaf() {
        let rows: Vec<Vec<f64>> = (0..8).map(|x| vec![f64::from(x)]).collect();
        let targets = vec![4.2; 8];
        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&rows, &targets).unwrap();
        assert_eq!(tree.n_leaves(), 1);
        assert!((tree.predict(&[vec![100.0]])[0] - 4.2).abs() < 1e-12);
    }

    #[test]
    fn identical_rows_cannot_split() {
        let rows = vec![vec![1.0, 1.0]; 5];
        let targets = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let mut tree = DecisionTreeRegressor::default();
        tree.fit(&rows, &targets).unwrap();
        assert_eq!(tree.n_leaves(), 1);
        assert!((tree.predict(&rows)[0] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn unfitted_tree_predicts_zero() {
        let tree = DecisionTreeRegressor::default();
        assert_eq!(tree.predict(&[vec![1.0]]), vec![0.0]);
    }
}
