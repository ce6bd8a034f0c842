// src/error.rs

use std::{io, path::PathBuf};
use thiserror::Error;

/// Everything that can go wrong while loading or reshaping the dataset.
///
/// All but [`DashError::Cancelled`] are fatal for the session: the dataset is
/// loaded once, so the fix is to correct the input file and restart.
#[derive(Debug, Error)]
pub enum DashError {
    #[error("data source not found: {path:?}")]
    SourceNotFound { path: PathBuf },

    #[error("failed to open data source {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read data source: {0}")]
    Csv(#[from] csv::Error),

    #[error("data source is missing required column `{column}`")]
    MissingColumn { column: String },

    #[error("data source has no totals row (no location containing \"total\")")]
    MissingTotalsRow,

    #[error("data source has no `Gen <numeral> Born` / `Gen <numeral> Died` columns")]
    NoGenerationsFound,

    #[error("generation `{label}` is missing its `{missing}` column")]
    IncompleteGeneration { label: String, missing: String },

    #[error("`{numeral}` is not a roman numeral")]
    InvalidNumeral { numeral: String },

    #[error("unknown generation `{label}`")]
    UnknownGeneration { label: String },

    /// A newer selection superseded the build before it finished.
    #[error("view build cancelled")]
    Cancelled,
}

pub type Result<T> = std::result::Result<T, DashError>;
