//! FILENAME: core/report-engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReportError {
    #[error("Invalid report configuration: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown report field: {0}")]
    UnknownField(String),
}
