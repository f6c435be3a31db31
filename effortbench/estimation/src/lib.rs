#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![deny(missing_docs, rust_2018_idioms)]
#![allow(clippy::cast_precision_loss)]

//! EffortBench estimation pipeline: COCOMO-81 dataset handling, feature
//! engineering, three learned regressors, the COCOMO I parametric baseline,
//! evaluation, and reporting.

/// Dataset schema, CSV loading, and descriptive statistics.
#[path = "../dataset.rs"]
pub mod dataset;

/// Feature engineering: imputation, matrix assembly, scaling, splitting.
#[path = "../features/main.rs"]
pub mod features;

/// Learned regression models.
#[path = "../models/main.rs"]
pub mod models;

/// COCOMO I closed-form effort estimator.
#[path = "../cocomo.rs"]
pub mod cocomo;

/// Regression accuracy metrics.
#[path = "../metrics.rs"]
pub mod metrics;

/// Reporting, winner selection, plotting, and artifact persistence.
#[path = "../report/main.rs"]
pub mod report;

/// End-to-end benchmark orchestration.
#[path = "../pipeline.rs"]
pub mod pipeline;

/// Run-scoped logging over the shared JSONL logger.
#[path = "../telemetry.rs"]
pub mod telemetry;

pub use cocomo::{CocomoError, COST_DRIVER_COUNT};
pub use dataset::{
    ColumnSummary, CompleteRecord, DatasetError, DevMode, ProjectRecord, ProjectTable,
    COST_DRIVERS, NUMERIC_COLUMNS,
};
pub use features::builder::{one_hot, FeatureMatrix, FEATURE_WIDTH, MODE_COLUMNS, NUMERIC_WIDTH};
pub use features::impute::{ImputeError, Imputer};
pub use features::scale::{FeatureStats, ScaleError, StandardScaler};
pub use features::split::{train_test_split, SplitError};
pub use metrics::{evaluate, Metrics, MetricsError};
pub use models::{
    forest::RandomForestRegressor, linear::LinearRegressionModel, tree::DecisionTreeRegressor,
    ModelError, Regressor, SavedModel,
};
pub use pipeline::{BenchmarkConfig, BenchmarkPipeline};
pub use report::{select_best, BenchmarkReport, HeadRow, ModelReport};
pub use telemetry::RunTelemetry;
