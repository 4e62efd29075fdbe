//! Typed client for the heart risk gateway.

mod client;

pub use client::{
    ClientError, ErrorEnvelope, GatewayClient, Prediction, ServiceStatus, DEFAULT_PREDICT_PATH,
    DEFAULT_STATUS_PATH,
};
