//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Gateway and predictor produce:
//!     → logging.rs (structured log events)
//!     → metrics.rs (counters, histograms)
//!
//! Consumers:
//!     → Log aggregation (stdout)
//!     → Metrics endpoint (Prometheus scrape)
//! ```
//!
//! # Design Decisions
//! - Request ID flows into every request span
//! - Metrics are cheap (atomic increments) and optional

pub mod logging;
pub mod metrics;
