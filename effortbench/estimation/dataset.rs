use std::{fmt, path::Path};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The fifteen COCOMO-81 cost-driver columns, in schema order.
pub const COST_DRIVERS: [&str; 15] = [
    "rely", "data", "cplx", "time", "stor", "virt", "turn", "acap", "aexp", "pcap", "vexp", "lexp",
    "modp", "tool", "sced",
];

/// Numeric feature columns: project size followed by the cost drivers.
pub const NUMERIC_COLUMNS: [&str; 16] = [
    "loc", "rely", "data", "cplx", "time", "stor", "virt", "turn", "acap", "aexp", "pcap", "vexp",
    "lexp", "modp", "tool", "sced",
];

/// Errors produced while loading or validating the project dataset.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// CSV could not be opened or a row failed to parse.
    #[error(transparent)]
    Csv(#[from] csv::Error),
    /// The file parsed but contained no data rows.
    #[error("dataset {path} contains no rows")]
    Empty {
        /// Offending file path.
        path: String,
    },
    /// A row carried a `dev_mode` value outside the three known categories.
    #[error("row {row}: unknown dev_mode {value:?} (expected organic|semidetached|embedded)")]
    UnknownMode {
        /// Zero-based data-row index.
        row: usize,
        /// The unrecognised category string.
        value: String,
    },
}

/// Project development mode, the categorical profile selecting the COCOMO
/// coefficient pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DevMode {
    /// Small teams, familiar problem domain.
    Organic,
    /// Intermediate size and constraints.
    Semidetached,
    /// Tight hardware/operational constraints.
    Embedded,
}

impl DevMode {
    /// Parses a raw category string; returns `None` for anything outside the
    /// three known modes so callers can decide whether that is an error.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "organic" => Some(Self::Organic),
            "semidetached" => Some(Self::Semidetached),
            "embedded" => Some(Self::Embedded),
            _ => None,
        }
    }

    /// Canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Organic => "organic",
            Self::Semidetached => "semidetached",
            Self::Embedded => "embedded",
        }
    }
}

impl fmt::Display for DevMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One historical project record as it appears in the CSV. Every feature
/// column may be empty; only the observed effort is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectRecord {
    /// Size in thousands of lines of code.
    pub loc: Option<f64>,
    /// Required reliability.
    pub rely: Option<f64>,
    /// Database size.
    pub data: Option<f64>,
    /// Product complexity.
    pub cplx: Option<f64>,
    /// Execution time constraint.
    pub time: Option<f64>,
    /// Main storage constraint.
    pub stor: Option<f64>,
    /// Virtual machine volatility.
    pub virt: Option<f64>,
    /// Computer turnaround time.
    pub turn: Option<f64>,
    /// Analyst capability.
    pub acap: Option<f64>,
    /// Applications experience.
    pub aexp: Option<f64>,
    /// Programmer capability.
    pub pcap: Option<f64>,
    /// Virtual machine experience.
    pub vexp: Option<f64>,
    /// Language experience.
    pub lexp: Option<f64>,
    /// Modern programming practices.
    pub modp: Option<f64>,
    /// Use of software tools.
    pub tool: Option<f64>,
    /// Required development schedule.
    pub sced: Option<f64>,
    /// Development mode category, raw string from the file.
    pub dev_mode: Option<String>,
    /// Observed actual effort in person-months.
    pub actual: f64,
}

impl ProjectRecord {
    /// Cost-driver ratings in [`COST_DRIVERS`] order.
    #[must_use]
    pub const fn drivers(&self) -> [Option<f64>; 15] {
        [
            self.rely, self.data, self.cplx, self.time, self.stor, self.virt, self.turn, self.acap,
            self.aexp, self.pcap, self.vexp, self.lexp, self.modp, self.tool, self.sced,
        ]
    }

    /// Looks up a numeric column by schema name (`actual` included).
    #[must_use]
    pub fn numeric_value(&self, column: &str) -> Option<f64> {
        match column {
            "loc" => self.loc,
            "rely" => self.rely,
            "data" => self.data,
            "cplx" => self.cplx,
            "time" => self.time,
            "stor" => self.stor,
            "virt" => self.virt,
            "turn" => self.turn,
            "acap" => self.acap,
            "aexp" => self.aexp,
            "pcap" => self.pcap,
            "vexp" => self.vexp,
            "lexp" => self.lexp,
            "modp" => self.modp,
            "tool" => self.tool,
            "sced" => self.sced,
            "actual" => Some(self.actual),
            _ => None,
        }
    }

    /// Parsed development mode; `None` when the column is empty or the value
    /// is not one of the three known categories.
    #[must_use]
    pub fn mode(&self) -> Option<DevMode> {
        self.dev_mode.as_deref().and_then(DevMode::parse)
    }
}

/// A fully-populated record produced by the imputer; no missing values remain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompleteRecord {
    /// Size in KLOC.
    pub loc: f64,
    /// The fifteen cost-driver ratings in [`COST_DRIVERS`] order.
    pub drivers: [f64; 15],
    /// Development mode.
    pub mode: DevMode,
    /// Observed actual effort in person-months.
    pub actual: f64,
}

/// Summary statistics for one numeric column.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnSummary {
    /// Number of observed (non-missing) values.
    pub count: usize,
    /// Arithmetic mean of observed values.
    pub mean: f64,
    /// Population standard deviation of observed values.
    pub std: f64,
    /// Minimum observed value.
    pub min: f64,
    /// Maximum observed value.
    pub max: f64,
}

/// In-memory project table in file order.
#[derive(Debug, Clone, Default)]
pub struct ProjectTable {
    /// Rows as loaded.
    pub records: Vec<ProjectRecord>,
}

impl ProjectTable {
    /// Loads the table from a CSV file with the fixed COCOMO-81 header.
    pub fn from_csv(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(path)?;
        let mut records = Vec::new();
        for row in reader.deserialize() {
            let record: ProjectRecord = row?;
            records.push(record);
        }
        if records.is_empty() {
            return Err(DatasetError::Empty {
                path: path.display().to_string(),
            });
        }
        Ok(Self { records })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when the table holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rejects rows whose `dev_mode` is present but not one of the three
    /// known categories. A missing mode is fine here; the imputer fills it.
    pub fn validate(&self) -> Result<(), DatasetError> {
        for (row, record) in self.records.iter().enumerate() {
            if let Some(raw) = record.dev_mode.as_deref() {
                if DevMode::parse(raw).is_none() {
                    return Err(DatasetError::UnknownMode {
                        row,
                        value: raw.to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Per-column descriptive statistics over observed values, in schema
    /// order (`loc`, the cost drivers, then `actual`).
    #[must_use]
    pub fn describe(&self) -> IndexMap<String, ColumnSummary> {
        let mut summaries = IndexMap::new();
        for column in NUMERIC_COLUMNS.iter().chain(std::iter::once(&"actual")) {
            let values: Vec<f64> = self
                .records
                .iter()
                .filter_map(|record| record.numeric_value(column))
                .collect();
            if values.is_empty() {
                continue;
            }
            let count = values.len();
            let mean = values.iter().sum::<f64>() / count as f64;
            let variance =
                values.iter().map(|value| (value - mean).powi(2)).sum::<f64>() / count as f64;
            let min = values.iter().copied().fold(f64::INFINITY, f64::min);
            let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
            summaries.insert(
                (*column).to_string(),
                ColumnSummary {
                    count,
                    mean,
                    std: variance.sqrt(),
                    min,
                    max,
                },
            );
        }
        summaries
    }
}
