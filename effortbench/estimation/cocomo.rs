use thiserror::Error;

use crate::dataset::{DevMode, ProjectRecord};

/// Display name used in reports, alongside the learned models'.
pub const MODEL_NAME: &str = "COCOMO I";

/// Number of multiplicative cost-driver ratings in the COCOMO I model.
pub const COST_DRIVER_COUNT: usize = 15;

/// Errors produced while evaluating the closed-form estimate.
#[derive(Debug, Error)]
pub enum CocomoError {
    /// Every cost driver on the row is missing; the effort multiplier would
    /// silently collapse to 1.0.
    #[error("all {COST_DRIVER_COUNT} cost drivers are missing; refusing a neutral multiplier")]
    NoCostDrivers,
    /// The row carries no size measurement.
    #[error("loc (size in KLOC) is missing")]
    MissingSize,
}

/// COCOMO I coefficient pair `(a, b)` for a development mode. An unknown or
/// absent mode falls back to the embedded coefficients, matching the
/// reference behaviour.
#[must_use]
pub const fn coefficients(mode: Option<DevMode>) -> (f64, f64) {
    match mode {
        Some(DevMode::Organic) => (2.4, 1.05),
        Some(DevMode::Semidetached) => (3.0, 1.12),
        Some(DevMode::Embedded) | None => (3.6, 1.20),
    }
}

/// Product of the rated cost drivers. A missing driver contributes a neutral
/// 1.0 factor (explicitly, rather than by silent exclusion); a row with every
/// driver missing is an error instead of a fabricated multiplier of 1.0.
pub fn effort_multiplier(drivers: &[Option<f64>; COST_DRIVER_COUNT]) -> Result<f64, CocomoError> {
    if drivers.iter().all(Option::is_none) {
        return Err(CocomoError::NoCostDrivers);
    }
    Ok(drivers
        .iter()
        .map(|driver| driver.unwrap_or(1.0))
        .product())
}

/// Closed-form COCOMO I effort in person-months:
/// `a * KLOC^b * effort_multiplier`. Deterministic; no fitted state.
pub fn estimate(record: &ProjectRecord) -> Result<f64, CocomoError> {
    let kloc = record.loc.ok_or(CocomoError::MissingSize)?;
    let (a, b) = coefficients(record.mode());
    let em = effort_multiplier(&record.drivers())?;
    Ok(a * kloc.powf(b) * em)
}

/// The estimate on the learned models' target scale: `ln(1 + effort)`.
pub fn log_estimate(record: &ProjectRecord) -> Result<f64, CocomoError> {
    Ok(estimate(record)?.ln_1p())
}
