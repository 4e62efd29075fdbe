//! Predictor invocation subsystem.
//!
//! # Data Flow
//! ```text
//! PredictionRequest
//!     → types.rs (canonical JSON)
//!     → process.rs (launch candidate, drain stdout/stderr, wait)
//!     → interpret exit status + output
//!     → PredictionResult (internal fields stripped) | PredictorError
//! ```
//!
//! # Design Decisions
//! - The gateway only sees the [`Predictor`] trait; an in-process model can
//!   replace the child process without touching HTTP code
//! - One invocation per request, no retries, no partial results
//! - Failures are categorized, never panics

pub mod error;
pub mod process;
pub mod samples;
pub mod types;

use async_trait::async_trait;

pub use error::{PredictorError, PredictorResult};
pub use process::ProcessPredictor;
pub use samples::{sample_cases, SampleCase};
pub use types::{Classification, PredictionRequest, PredictionResult};

/// Maps patient measurements to a risk classification.
#[async_trait]
pub trait Predictor: Send + Sync {
    async fn predict(&self, request: &PredictionRequest) -> PredictorResult<PredictionResult>;
}
