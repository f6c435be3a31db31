//! Feature engineering stages between the raw table and the model inputs.

/// Column-wise missing-value imputation.
pub mod impute;

/// Feature matrix and target assembly.
pub mod builder;

/// Replayable standardization.
pub mod scale;

/// Seeded train/test partitioning.
pub mod split;
