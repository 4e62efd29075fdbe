//! Security-related response handling.
//!
//! Only cross-origin headers today; the gateway has no authentication.

pub mod headers;

pub use headers::cors_middleware;
