use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use serde_json::json;
use shared_logging::LogLevel;

use effortbench_estimation::{
    report::persist, BenchmarkConfig, BenchmarkPipeline, FeatureMatrix, ProjectTable, RunTelemetry,
};

#[derive(Parser, Debug)]
#[command(name = "efb", version, about = "COCOMO-81 effort-estimation benchmark")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Runs the full benchmark and reports the winning estimator.
    Run(RunArgs),
    /// Scores a dataset with a previously persisted model and scaler.
    Predict(PredictArgs),
}

#[derive(Parser, Debug)]
struct RunArgs {
    /// Input CSV in the COCOMO-81 schema.
    #[arg(long)]
    data: PathBuf,
    /// Output PNG with the comparison charts.
    #[arg(long, default_value = "out/benchmark.png")]
    image: PathBuf,
    /// Directory for the winning model and scaler (learned winners only).
    #[arg(long, default_value = "out/artifacts")]
    artifacts: PathBuf,
    /// Seed for the split shuffle and forest bootstraps.
    #[arg(long, default_value_t = 42)]
    seed: u64,
    /// Fraction of rows held out for testing.
    #[arg(long, default_value_t = 0.2)]
    test_ratio: f64,
    /// Optional JSONL file receiving one record per pipeline stage.
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[derive(Parser, Debug)]
struct PredictArgs {
    /// Directory holding trained_model.json and scaler.json from a run.
    #[arg(long)]
    artifacts: PathBuf,
    /// CSV of rows to score, in the same schema as the training data.
    #[arg(long)]
    data: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Run(args) => handle_run(args),
        Commands::Predict(args) => handle_predict(args),
    }
}

fn handle_run(args: RunArgs) -> Result<()> {
    anyhow::ensure!(args.data.exists(), "data file {:?} not found", args.data);

    let telemetry = match &args.log_file {
        Some(path) => Some(RunTelemetry::create(path)?),
        None => None,
    };

    let mut config = BenchmarkConfig::new(args.data, args.image, args.artifacts);
    config.seed = args.seed;
    config.test_ratio = args.test_ratio;

    if let Some(telemetry) = &telemetry {
        let event = json!({
            "event": "benchmark_started",
            "run_id": telemetry.run_id(),
            "data": config.data_path,
            "seed": config.seed,
            "test_ratio": config.test_ratio,
            "submitted_at": Utc::now(),
        });
        println!("{}", serde_json::to_string_pretty(&event)?);
    }

    let report = BenchmarkPipeline::new(config)
        .run_with_telemetry(telemetry.as_ref())
        .context("benchmark run failed")?;
    print!("{}", report.render());

    if let Some(telemetry) = &telemetry {
        telemetry.log(
            LogLevel::Info,
            "cli",
            "report printed",
            json!({
                "best": report.best,
                "image": report.image_path,
                "finished_at": Utc::now(),
            }),
        )?;
    }
    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<()> {
    let (model, imputer, scaler) = persist::load_artifacts(&args.artifacts)
        .with_context(|| format!("loading artifacts from {}", args.artifacts.display()))?;

    let table = ProjectTable::from_csv(&args.data)
        .with_context(|| format!("loading {}", args.data.display()))?;
    table.validate()?;
    // training-time fill values, replayed on the scoring batch
    let complete = imputer.apply(&table);
    let matrix = FeatureMatrix::from_records(&complete);
    let rows = scaler.transform(&matrix.rows)?;
    let predictions = model.predict(&rows);

    println!("Scoring {} rows with {}", table.len(), model.name());
    println!(
        "{:>5} {:>10} {:>16} {:>14}",
        "row", "loc", "predicted (pm)", "actual (pm)"
    );
    for (idx, (record, prediction)) in complete.iter().zip(predictions.iter()).enumerate() {
        println!(
            "{:>5} {:>10.1} {:>16.1} {:>14.1}",
            idx,
            record.loc,
            prediction.exp_m1(),
            record.actual
        );
    }
    Ok(())
}
