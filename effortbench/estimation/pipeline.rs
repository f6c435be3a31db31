use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::json;
use shared_logging::LogLevel;

use crate::cocomo;
use crate::dataset::{ProjectTable, NUMERIC_COLUMNS};
use crate::features::builder::FeatureMatrix;
use crate::features::impute::Imputer;
use crate::features::scale::StandardScaler;
use crate::features::split::train_test_split;
use crate::metrics::evaluate;
use crate::models::{
    forest::{self, RandomForestRegressor},
    linear::{self, LinearRegressionModel},
    tree::{self, DecisionTreeRegressor},
    Regressor, SavedModel,
};
use crate::report::{persist, plots, select_best, BenchmarkReport, HeadRow, ModelReport};
use crate::telemetry::{log_stage, RunTelemetry};

const HEAD_ROWS: usize = 10;

/// Everything one benchmark run needs to know up front.
#[derive(Debug, Clone)]
pub struct BenchmarkConfig {
    /// Input CSV in the COCOMO-81 schema.
    pub data_path: PathBuf,
    /// Where the comparison-chart PNG is written.
    pub image_path: PathBuf,
    /// Where the winning model and scaler are persisted (learned winners only).
    pub artifact_dir: PathBuf,
    /// Seed driving the split shuffle and the forest bootstraps.
    pub seed: u64,
    /// Fraction of rows held out for testing.
    pub test_ratio: f64,
    /// Depth bound for the standalone decision tree.
    pub tree_depth: usize,
    /// Member count for the random forest.
    pub forest_trees: usize,
}

impl BenchmarkConfig {
    /// Config with the reference benchmark defaults: seed 42, 80/20 split,
    /// tree depth 5, 100 forest members.
    #[must_use]
    pub const fn new(data_path: PathBuf, image_path: PathBuf, artifact_dir: PathBuf) -> Self {
        Self {
            data_path,
            image_path,
            artifact_dir,
            seed: 42,
            test_ratio: 0.2,
            tree_depth: tree::DEFAULT_MAX_DEPTH,
            forest_trees: forest::DEFAULT_N_TREES,
        }
    }
}

/// Single-pass benchmark orchestrator. Steps run strictly forward exactly
/// once; any failure aborts the run. Identical input and seed reproduce
/// identical partitions, fits, and metrics.
#[derive(Debug)]
pub struct BenchmarkPipeline {
    config: BenchmarkConfig,
}

impl BenchmarkPipeline {
    /// Wraps a config.
    #[must_use]
    pub const fn new(config: BenchmarkConfig) -> Self {
        Self { config }
    }

    /// Runs the benchmark without telemetry.
    pub fn run(&self) -> Result<BenchmarkReport> {
        self.run_with_telemetry(None)
    }

    /// Runs the benchmark, logging one record per stage when telemetry is
    /// provided.
    pub fn run_with_telemetry(
        &self,
        telemetry: Option<&RunTelemetry>,
    ) -> Result<BenchmarkReport> {
        // 1. load and validate
        let table = ProjectTable::from_csv(&self.config.data_path)
            .with_context(|| format!("loading {}", self.config.data_path.display()))?;
        table.validate().context("validating dev_mode categories")?;
        let dataset_summary = table.describe();
        log_stage(
            telemetry,
            LogLevel::Info,
            "load",
            "dataset loaded",
            json!({ "rows": table.len(), "path": self.config.data_path.display().to_string() }),
        );

        // 2. impute missing values
        let imputer = Imputer::fit(&table).context("fitting imputer")?;
        let complete = imputer.apply(&table);
        log_stage(
            telemetry,
            LogLevel::Debug,
            "impute",
            "missing values filled",
            json!({ "mode_fill": imputer.mode_fill().as_str() }),
        );

        // 3. assemble features and the log target
        let matrix = FeatureMatrix::from_records(&complete);

        // 4. split before scaling, so test statistics never leak into the
        // scaler parameters
        let (train_idx, test_idx) =
            train_test_split(matrix.len(), self.config.test_ratio, self.config.seed)
                .context("partitioning rows")?;
        let train = matrix.select(&train_idx);
        let test = matrix.select(&test_idx);
        log_stage(
            telemetry,
            LogLevel::Info,
            "split",
            "rows partitioned",
            json!({ "train": train.len(), "test": test.len(), "seed": self.config.seed }),
        );

        // 5. standardize the numeric block from training statistics only
        let scaler =
            StandardScaler::fit(&train.rows, &NUMERIC_COLUMNS).context("fitting scaler")?;
        let train_rows = scaler.transform(&train.rows).context("scaling train rows")?;
        let test_rows = scaler.transform(&test.rows).context("scaling test rows")?;
        log_stage(
            telemetry,
            LogLevel::Debug,
            "scale",
            "scaler fitted on training partition",
            json!({ "features": scaler.numeric_width() }),
        );

        // 6. fit the three learned estimators on the same training data
        let mut linear_model = LinearRegressionModel::default();
        linear_model
            .fit(&train_rows, &train.targets)
            .context("fitting linear regression")?;
        let mut tree_model = DecisionTreeRegressor::new(self.config.tree_depth);
        tree_model
            .fit(&train_rows, &train.targets)
            .context("fitting decision tree")?;
        let mut forest_model = RandomForestRegressor::new(self.config.forest_trees, self.config.seed);
        forest_model
            .fit(&train_rows, &train.targets)
            .context("fitting random forest")?;
        log_stage(
            telemetry,
            LogLevel::Info,
            "train",
            "models fitted",
            json!({
                "tree_depth": tree_model.depth(),
                "tree_leaves": tree_model.n_leaves(),
                "forest_trees": forest_model.n_fitted(),
            }),
        );

        // 7. closed-form baseline on the raw test rows
        let cocomo_predictions: Vec<f64> = test_idx
            .iter()
            .map(|&idx| {
                cocomo::log_estimate(&table.records[idx])
                    .with_context(|| format!("COCOMO estimate for row {idx}"))
            })
            .collect::<Result<_>>()?;

        // 8. evaluate all four candidates against the held-out targets
        let series: Vec<(String, Vec<f64>)> = vec![
            (cocomo::MODEL_NAME.to_string(), cocomo_predictions),
            (linear_model.name().to_string(), linear_model.predict(&test_rows)),
            (tree_model.name().to_string(), tree_model.predict(&test_rows)),
            (forest_model.name().to_string(), forest_model.predict(&test_rows)),
        ];
        let models: Vec<ModelReport> = series
            .iter()
            .map(|(name, predictions)| {
                Ok(ModelReport {
                    name: name.clone(),
                    metrics: evaluate(&test.targets, predictions)
                        .with_context(|| format!("evaluating {name}"))?,
                })
            })
            .collect::<Result<_>>()?;
        for report in &models {
            log_stage(
                telemetry,
                LogLevel::Info,
                "evaluate",
                "model scored",
                json!({
                    "model": report.name,
                    "mae": report.metrics.mae,
                    "rmse": report.metrics.rmse,
                    "r_squared": report.metrics.r_squared,
                }),
            );
        }

        // 9. report: pick a winner, render charts, persist if learned
        let best_idx = select_best(&models)
            .context("no model produced a comparable RMSE (all scores undefined)")?;
        let best = models[best_idx].name.clone();

        plots::render_charts(&self.config.image_path, &test.targets, &series, &models)
            .context("rendering comparison charts")?;

        let artifact_dir = if best == cocomo::MODEL_NAME {
            None
        } else {
            let saved = match best.as_str() {
                linear::MODEL_NAME => SavedModel::Linear(linear_model),
                tree::MODEL_NAME => SavedModel::DecisionTree(tree_model),
                _ => SavedModel::RandomForest(forest_model),
            };
            persist::save_artifacts(&self.config.artifact_dir, &saved, &imputer, &scaler)
                .context("persisting winning model, imputer, and scaler")?;
            Some(self.config.artifact_dir.clone())
        };
        log_stage(
            telemetry,
            LogLevel::Info,
            "report",
            "benchmark complete",
            json!({ "best": best, "persisted": artifact_dir.is_some() }),
        );

        let head = (0..HEAD_ROWS.min(test.len()))
            .map(|row| HeadRow {
                actual: test.targets[row],
                predicted: series.iter().map(|(_, predictions)| predictions[row]).collect(),
            })
            .collect();

        Ok(BenchmarkReport {
            generated_at: chrono::Utc::now(),
            dataset: dataset_summary,
            scaler: scaler.stats().to_vec(),
            train_rows: train.len(),
            test_rows: test.len(),
            models,
            head,
            best,
            image_path: self.config.image_path.clone(),
            artifact_dir,
        })
    }
}
