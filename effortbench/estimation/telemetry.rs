use std::path::Path;

use anyhow::Result;
use serde_json::Value;
use shared_logging::{JsonLogger, LogLevel, LogRecord};
use uuid::Uuid;

/// Run-scoped telemetry: every record carries the same generated run id so a
/// JSONL sink shared across runs stays attributable.
#[derive(Debug)]
pub struct RunTelemetry {
    run_id: String,
    logger: JsonLogger,
}

impl RunTelemetry {
    /// Opens (or creates) the JSONL sink and mints a fresh run id.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        Ok(Self {
            run_id: format!("run-{}", Uuid::new_v4()),
            logger: JsonLogger::new(path)?,
        })
    }

    /// The run identifier stamped on every record.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Appends one stage record.
    pub fn log(&self, level: LogLevel, stage: &str, message: &str, metadata: Value) -> Result<()> {
        let record = LogRecord::new(stage, level, message)
            .with_run_id(self.run_id.clone())
            .with_metadata(metadata);
        self.logger.log(&record)
    }
}

/// Best-effort stage logging: telemetry is optional and a failed write never
/// aborts the benchmark.
pub(crate) fn log_stage(
    telemetry: Option<&RunTelemetry>,
    level: LogLevel,
    stage: &str,
    message: &str,
    metadata: Value,
) {
    if let Some(telemetry) = telemetry {
        let _ = telemetry.log(level, stage, message, metadata);
    }
}
