//! Heart disease risk gateway.
//!
//! Accepts patient measurements over HTTP and classifies them by running an
//! external predictor program once per request.
//!
//! ```text
//!  Browser ──POST /api/predict──▶ http (CORS, request ID, routing)
//!                                     │
//!                                     ▼
//!                                 predictor ──argv──▶ child process
//!                                     │      ◀─stdout/stderr/exit──
//!                                     ▼
//!  Browser ◀──── 200 result | 500 {status, message, details}
//! ```

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod predictor;
pub mod security;

pub use config::GatewayConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use predictor::{Predictor, ProcessPredictor};
