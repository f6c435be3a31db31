use rand::{rngs::SmallRng, seq::SliceRandom, SeedableRng};
use thiserror::Error;

/// Errors produced while partitioning rows.
#[derive(Debug, Error)]
pub enum SplitError {
    /// Ratio must be strictly between 0 and 1.
    #[error("test ratio {0} is outside (0, 1)")]
    BadRatio(f64),
    /// Not enough rows to give both partitions at least one element.
    #[error("{rows} rows cannot be split with test ratio {ratio}")]
    TooFewRows {
        /// Total row count.
        rows: usize,
        /// Requested test ratio.
        ratio: f64,
    },
}

/// Partitions row indices `0..n_rows` into `(train, test)` with a seeded
/// shuffle. The test side takes `ceil(n_rows * test_ratio)` rows, so 100 rows
/// at ratio 0.2 split 80/20. Identical `(n_rows, test_ratio, seed)` inputs
/// always produce identical partitions.
pub fn train_test_split(
    n_rows: usize,
    test_ratio: f64,
    seed: u64,
) -> Result<(Vec<usize>, Vec<usize>), SplitError> {
    if !(test_ratio > 0.0 && test_ratio < 1.0) {
        return Err(SplitError::BadRatio(test_ratio));
    }
    let n_test = (n_rows as f64 * test_ratio).ceil() as usize;
    if n_test == 0 || n_test >= n_rows {
        return Err(SplitError::TooFewRows {
            rows: n_rows,
            ratio: test_ratio,
        });
    }

    let mut indices: Vec<usize> = (0..n_rows).collect();
    let mut rng = SmallRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let test = indices.split_off(n_rows - n_test);
    Ok((indices, test))
}
