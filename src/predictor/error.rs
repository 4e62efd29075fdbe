//! Failure categories of a predictor invocation.

use thiserror::Error;

/// Why an invocation produced no result.
///
/// Each variant carries the diagnostic text that is shown to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PredictorError {
    /// None of the launch candidates could be started.
    #[error("no predictor runtime could be started: {0}")]
    SpawnFailure(String),

    /// The OS refused to launch or supervise the process.
    #[error("predictor process error: {0}")]
    ProcessError(String),

    /// The predictor ran and exited unsuccessfully.
    #[error("predictor execution failed: {0}")]
    ExecutionFailure(String),

    /// The predictor exited cleanly but its output was not a JSON object.
    #[error("predictor output was malformed: {0}")]
    MalformedOutput(String),
}

impl PredictorError {
    /// Stable category name reported in the error envelope and metrics.
    pub fn category(&self) -> &'static str {
        match self {
            PredictorError::SpawnFailure(_) => "SpawnFailure",
            PredictorError::ProcessError(_) => "ProcessError",
            PredictorError::ExecutionFailure(_) => "ExecutionFailure",
            PredictorError::MalformedOutput(_) => "MalformedOutput",
        }
    }

    pub fn details(&self) -> &str {
        match self {
            PredictorError::SpawnFailure(d)
            | PredictorError::ProcessError(d)
            | PredictorError::ExecutionFailure(d)
            | PredictorError::MalformedOutput(d) => d,
        }
    }
}

/// Result type for predictor invocations.
pub type PredictorResult<T> = Result<T, PredictorError>;
