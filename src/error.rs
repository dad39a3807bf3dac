use thiserror::Error;

/// Errors raised around the reconciliation pipeline.
///
/// The pipeline itself never fails; these cover reading inputs and writing
/// reports. The in-memory Record Store cannot fail, so it has no variant here.
#[derive(Error, Debug)]
pub enum ReconcileError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ReconcileError>;
