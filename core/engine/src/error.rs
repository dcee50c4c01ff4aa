//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid scenario document: {0}")]
    Json(#[from] serde_json::Error),
}
