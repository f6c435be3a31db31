use std::{fs, path::Path};

use thiserror::Error;

use crate::features::impute::Imputer;
use crate::features::scale::StandardScaler;
use crate::models::SavedModel;

/// File name of the persisted winning estimator.
pub const MODEL_FILE: &str = "trained_model.json";

/// File name of the persisted imputation fill values.
pub const IMPUTER_FILE: &str = "imputer.json";

/// File name of the persisted scaler statistics.
pub const SCALER_FILE: &str = "scaler.json";

/// Errors produced while writing or reloading artifacts.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Filesystem failure.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Artifact JSON failed to encode or decode.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Writes the winning model with its imputer and scaler side by side so
/// future raw inputs can be filled, transformed, and scored identically.
pub fn save_artifacts(
    dir: &Path,
    model: &SavedModel,
    imputer: &Imputer,
    scaler: &StandardScaler,
) -> Result<(), PersistError> {
    fs::create_dir_all(dir)?;
    fs::write(
        dir.join(MODEL_FILE),
        serde_json::to_string_pretty(model)?,
    )?;
    fs::write(
        dir.join(IMPUTER_FILE),
        serde_json::to_string_pretty(imputer)?,
    )?;
    fs::write(
        dir.join(SCALER_FILE),
        serde_json::to_string_pretty(scaler)?,
    )?;
    Ok(())
}

/// Reloads a persisted model/imputer/scaler triple.
pub fn load_artifacts(dir: &Path) -> Result<(SavedModel, Imputer, StandardScaler), PersistError> {
    let model: SavedModel = serde_json::from_str(&fs::read_to_string(dir.join(MODEL_FILE))?)?;
    let imputer: Imputer = serde_json::from_str(&fs::read_to_string(dir.join(IMPUTER_FILE))?)?;
    let scaler: StandardScaler = serde_json::from_str(&fs::read_to_string(dir.join(SCALER_FILE))?)?;
    Ok((model, imputer, scaler))
}
