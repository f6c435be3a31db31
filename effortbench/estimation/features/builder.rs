use crate::dataset::{CompleteRecord, DevMode, COST_DRIVERS};

/// One-hot indicator columns appended after the numeric block, in encoding
/// order.
pub const MODE_COLUMNS: [&str; 3] = ["mode_embedded", "mode_organic", "mode_semidetached"];

/// Width of the numeric block (`loc` plus the fifteen cost drivers); only
/// these columns are standardized.
pub const NUMERIC_WIDTH: usize = 16;

/// Total feature-vector width: numeric block plus mode indicators.
pub const FEATURE_WIDTH: usize = NUMERIC_WIDTH + MODE_COLUMNS.len();

/// Encodes a development mode as `[embedded, organic, semidetached]`
/// indicators. A known mode sets exactly one indicator; `None` (absent or
/// unrecognised category) yields all zeros, which callers must guard against
/// before training.
#[must_use]
pub const fn one_hot(mode: Option<DevMode>) -> [f64; 3] {
    match mode {
        Some(DevMode::Embedded) => [1.0, 0.0, 0.0],
        Some(DevMode::Organic) => [0.0, 1.0, 0.0],
        Some(DevMode::Semidetached) => [0.0, 0.0, 1.0],
        None => [0.0, 0.0, 0.0],
    }
}

/// Unscaled feature matrix plus the log-transformed target vector.
#[derive(Debug, Clone, Default)]
pub struct FeatureMatrix {
    /// Feature rows, each [`FEATURE_WIDTH`] wide.
    pub rows: Vec<Vec<f64>>,
    /// Per-row target: `ln(1 + actual_effort)`.
    pub targets: Vec<f64>,
}

impl FeatureMatrix {
    /// Assembles features and targets from fully-populated records. Pure
    /// transform; the input is not modified.
    #[must_use]
    pub fn from_records(records: &[CompleteRecord]) -> Self {
        let mut rows = Vec::with_capacity(records.len());
        let mut targets = Vec::with_capacity(records.len());
        for record in records {
            let mut row = Vec::with_capacity(FEATURE_WIDTH);
            row.push(record.loc);
            row.extend_from_slice(&record.drivers);
            row.extend_from_slice(&one_hot(Some(record.mode)));
            rows.push(row);
            targets.push(record.actual.ln_1p());
        }
        Self { rows, targets }
    }

    /// Column names in feature order.
    #[must_use]
    pub fn feature_names() -> Vec<&'static str> {
        let mut names = vec!["loc"];
        names.extend_from_slice(&COST_DRIVERS);
        names.extend_from_slice(&MODE_COLUMNS);
        names
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True when no rows were assembled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Selects the subset of rows and targets at the given indices.
    ///
    /// # Panics
    /// Panics if an index is out of bounds.
    #[must_use]
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            rows: indices.iter().map(|&idx| self.rows[idx].clone()).collect(),
            targets: indices.iter().map(|&idx| self.targets[idx]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(loc: f64, mode: DevMode, actual: f64) -> CompleteRecord {
        CompleteRecord {
            loc,
            drivers: [1.0; 15],
            mode,
            actual,
        }
    }

    #[test]
    fn one_hot_sets_exactly_one_indicator_for_known_modes() {
        for mode in [DevMode::Organic, DevMode::Semidetached, DevMode::Embedded] {
            let encoded = one_hot(Some(mode));
            let ones = encoded.iter().filter(|&&value| value == 1.0).count();
            let zeros = encoded.iter().filter(|&&value| value == 0.0).count();
            assert_eq!(ones, 1, "{mode} must set exactly one indicator");
            assert_eq!(zeros, 2);
        }
    }

    #[test]
    fn one_hot_is_all_zeros_for_unknown_mode() {
        assert_eq!(one_hot(None), [0.0, 0.0, 0.0]);
    }

    #[test]
    fn matrix_layout_and_log_target() {
        let records = vec![
            complete(113.0, DevMode::Embedded, 2040.0),
            complete(40.0, DevMode::Organic, 102.4),
        ];
        let matrix = FeatureMatrix::from_records(&records);
        assert_eq!(matrix.len(), 2);
        assert_eq!(matrix.rows[0].len(), FEATURE_WIDTH);
        assert!((matrix.rows[0][0] - 113.0).abs() < 1e-12);
        // embedded indicator first in the one-hot tail
        assert!((matrix.rows[0][NUMERIC_WIDTH] - 1.0).abs() < 1e-12);
        assert!((matrix.rows[1][NUMERIC_WIDTH + 1] - 1.0).abs() < 1e-12);
        assert!((matrix.targets[1] - 102.4_f64.ln_1p()).abs() < 1e-12);
    }

    #[test]
    fn feature_names_match_width() {
        let names = FeatureMatrix::feature_names();
        assert_eq!(names.len(), FEATURE_WIDTH);
        assert_eq!(names[0], "loc");
        assert_eq!(names[NUMERIC_WIDTH], "mode_embedded");
    }

    #[test]
    fn select_picks_rows_by_index() {
        let records = vec![
            complete(10.0, DevMode::Organic, 50.0),
            complete(20.0, DevMode::Organic, 60.0),
            complete(30.0, DevMode::Organic, 70.0),
        ];
        let matrix = FeatureMatrix::from_records(&records);
        let subset = matrix.select(&[2, 0]);
        assert_eq!(subset.len(), 2);
        assert!((subset.rows[0][0] - 30.0).abs() < 1e-12);
        assert!((subset.rows[1][0] - 10.0).abs() < 1e-12);
    }
}
