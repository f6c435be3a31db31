use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dataset::{CompleteRecord, DevMode, ProjectTable, COST_DRIVERS, NUMERIC_COLUMNS};

/// Errors produced while fitting fill values.
#[derive(Debug, Error)]
pub enum ImputeError {
    /// Every entry in the column is missing, so no fill value exists.
    #[error("column {column:?} has no observed values to impute from")]
    AllMissing {
        /// Offending column name.
        column: String,
    },
}

/// Column-wise imputer: median for numeric columns, most frequent value for
/// the categorical development mode. Fitted once, then applied to any table
/// with the same schema; serializable so scoring runs replay the training
/// fill values instead of refitting on the incoming batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Imputer {
    numeric_fills: IndexMap<String, f64>,
    mode_fill: DevMode,
}

impl Imputer {
    /// Fits fill values from the observed entries of each column.
    pub fn fit(table: &ProjectTable) -> Result<Self, ImputeError> {
        let mut numeric_fills = IndexMap::new();
        for column in NUMERIC_COLUMNS {
            let mut values: Vec<f64> = table
                .records
                .iter()
                .filter_map(|record| record.numeric_value(column))
                .collect();
            if values.is_empty() {
                return Err(ImputeError::AllMissing {
                    column: column.to_string(),
                });
            }
            values.sort_by(f64::total_cmp);
            numeric_fills.insert(column.to_string(), median_of_sorted(&values));
        }

        let mode_fill = most_frequent_mode(table).ok_or_else(|| ImputeError::AllMissing {
            column: "dev_mode".to_string(),
        })?;

        Ok(Self {
            numeric_fills,
            mode_fill,
        })
    }

    /// Fill value used for a numeric column, if the column is known.
    #[must_use]
    pub fn numeric_fill(&self, column: &str) -> Option<f64> {
        self.numeric_fills.get(column).copied()
    }

    /// Fill value used for a missing development mode.
    #[must_use]
    pub const fn mode_fill(&self) -> DevMode {
        self.mode_fill
    }

    /// Produces fully-populated records by substituting fitted fill values
    /// for every missing entry. Rows with an unparseable `dev_mode` must be
    /// rejected by [`ProjectTable::validate`] before this is called; here any
    /// unparsed mode is treated as missing.
    #[must_use]
    pub fn apply(&self, table: &ProjectTable) -> Vec<CompleteRecord> {
        table
            .records
            .iter()
            .map(|record| {
                let loc = record.loc.unwrap_or(self.numeric_fills["loc"]);
                let mut drivers = [0.0; 15];
                for (idx, (value, name)) in
                    record.drivers().iter().zip(COST_DRIVERS.iter()).enumerate()
                {
                    drivers[idx] = value.unwrap_or(self.numeric_fills[*name]);
                }
                CompleteRecord {
                    loc,
                    drivers,
                    mode: record.mode().unwrap_or(self.mode_fill),
                    actual: record.actual,
                }
            })
            .collect()
    }
}

fn median_of_sorted(values: &[f64]) -> f64 {
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    }
}

/// Most frequent observed mode; ties broken by first occurrence in the
/// column. `None` when no row carries a parseable mode.
fn most_frequent_mode(table: &ProjectTable) -> Option<DevMode> {
    let mut counts: IndexMap<DevMode, usize> = IndexMap::new();
    for record in &table.records {
        if let Some(mode) = record.mode() {
            *counts.entry(mode).or_insert(0) += 1;
        }
    }
    // strictly-greater comparison keeps the earliest-seen mode on ties
    let mut best: Option<(DevMode, usize)> = None;
    for (mode, count) in counts {
        if best.is_none_or(|(_, best_count)| count > best_count) {
            best = Some((mode, count));
        }
    }
    best.map(|(mode, _)| mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::ProjectRecord;

    fn record(loc: Option<f64>, rely: Option<f64>, mode: Option<&str>) -> ProjectRecord {
        ProjectRecord {
            loc,
            rely,
            data: Some(1.0),
            cplx: Some(1.0),
            time: Some(1.0),
            stor: Some(1.0),
            virt: Some(1.0),
            turn: Some(1.0),
            acap: Some(1.0),
            aexp: Some(1.0),
            pcap: Some(1.0),
            vexp: Some(1.0),
            lexp: Some(1.0),
            modp: Some(1.0),
            tool: Some(1.0),
            sced: Some(1.0),
            dev_mode: mode.map(str::to_string),
            actual: 100.0,
        }
    }

    #[test]
    fn median_fill_even_and_odd() {
        let table = ProjectTable {
            records: vec![
                record(Some(10.0), Some(0.8), Some("organic")),
                record(Some(20.0), Some(1.0), Some("organic")),
                record(Some(40.0), Some(1.2), Some("embedded")),
                record(None, None, Some("organic")),
            ],
        };
        let imputer = Imputer::fit(&table).unwrap();
        // three observed loc values: median is the middle one
        assert!((imputer.numeric_fill("loc").unwrap() - 20.0).abs() < 1e-12);
        // three observed rely values
        assert!((imputer.numeric_fill("rely").unwrap() - 1.0).abs() < 1e-12);

        let complete = imputer.apply(&table);
        assert!((complete[3].loc - 20.0).abs() < 1e-12);
        assert!((complete[3].drivers[0] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn mode_fill_is_most_frequent() {
        let table = ProjectTable {
            records: vec![
                record(Some(10.0), Some(1.0), Some("embedded")),
                record(Some(10.0), Some(1.0), Some("organic")),
                record(Some(10.0), Some(1.0), Some("organic")),
                record(Some(10.0), Some(1.0), None),
            ],
        };
        let imputer = Imputer::fit(&table).unwrap();
        assert_eq!(imputer.mode_fill(), DevMode::Organic);
        let complete = imputer.apply(&table);
        assert_eq!(complete[3].mode, DevMode::Organic);
    }

    #[test]
    fn mode_tie_breaks_by_first_occurrence() {
        let table = ProjectTable {
            records: vec![
                record(Some(10.0), Some(1.0), Some("embedded")),
                record(Some(10.0), Some(1.0), Some("organic")),
            ],
        };
        let imputer = Imputer::fit(&table).unwrap();
        assert_eq!(imputer.mode_fill(), DevMode::Embedded);
    }

    #[test]
    fn serialized_imputer_replays_training_fills() {
        let train = ProjectTable {
            records: vec![
                record(Some(10.0), Some(0.8), Some("organic")),
                record(Some(30.0), Some(1.2), Some("organic")),
            ],
        };
        let imputer = Imputer::fit(&train).unwrap();
        let json = serde_json::to_string(&imputer).unwrap();
        let reloaded: Imputer = serde_json::from_str(&json).unwrap();

        // a scoring batch with loc and mode entirely missing still fills
        // from the training medians, without refitting or erroring
        let batch = ProjectTable {
            records: vec![record(None, None, None)],
        };
        let complete = reloaded.apply(&batch);
        assert!((complete[0].loc - 20.0).abs() < 1e-12);
        assert!((complete[0].drivers[0] - 1.0).abs() < 1e-12);
        assert_eq!(complete[0].mode, DevMode::Organic);
    }

    #[test]
    fn all_missing_column_is_an_error() {
        let table = ProjectTable {
            records: vec![
                record(None, Some(1.0), Some("organic")),
                record(None, Some(1.0), Some("organic")),
            ],
        };
        let err = Imputer::fit(&table).unwrap_err();
        assert!(matches!(err, ImputeError::AllMissing { ref column } if column == "loc"));
    }

    #[test]
    fn all_missing_mode_is_an_error() {
        let table = ProjectTable {
            records: vec![record(Some(10.0), Some(1.0), None)],
        };
        let err = Imputer::fit(&table).unwrap_err();
        assert!(matches!(err, ImputeError::AllMissing { ref column } if column == "dev_mode"));
    }
}
