//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// How the predictor process is launched.
    pub predictor: PredictorConfig,

    /// Route paths served by the gateway.
    pub routes: RoutesConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}

/// Predictor process configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PredictorConfig {
    /// Launch candidates, tried in order until one can be started.
    pub candidates: Vec<LaunchSpec>,

    /// Working directory for the child process. Inherited when unset.
    pub working_dir: Option<String>,
}

impl Default for PredictorConfig {
    fn default() -> Self {
        Self {
            candidates: vec![
                LaunchSpec::new("python3", ["predict.py"]),
                LaunchSpec::new("python", ["predict.py"]),
            ],
            working_dir: None,
        }
    }
}

/// One way of starting the predictor.
///
/// The serialized request is appended after `args` as the final argument.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct LaunchSpec {
    /// Executable name or path.
    pub program: String,

    /// Leading arguments (typically the script path).
    #[serde(default)]
    pub args: Vec<String>,
}

impl LaunchSpec {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Route paths.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Prediction endpoint.
    pub predict_path: String,

    /// Liveness endpoint.
    pub status_path: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            predict_path: "/api/predict".to_string(),
            status_path: "/api/status".to_string(),
        }
    }
}

/// Log output format.
#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error). `RUST_LOG` takes precedence.
    pub log_level: String,

    /// Pretty output for development, JSON for log aggregation.
    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
