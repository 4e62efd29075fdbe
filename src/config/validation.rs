//! Configuration validation.
//!
//! Serde handles syntax; this module checks values that parse but cannot work
//! (unparseable addresses, no launch candidates, overlapping routes). All
//! problems are reported together rather than stopping at the first.

use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::GatewayConfig;

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("{field}: invalid socket address {value:?}")]
    InvalidAddress { field: &'static str, value: String },

    #[error("predictor.candidates: at least one launch candidate is required")]
    NoCandidates,

    #[error("predictor.candidates[{0}]: program must not be empty")]
    EmptyProgram(usize),

    #[error("{field}: route path {value:?} {reason}")]
    InvalidPath {
        field: &'static str,
        value: String,
        reason: &'static str,
    },

    #[error("routes: predict_path and status_path are both {0:?}")]
    DuplicatePath(String),

    #[error("observability.log_level: unknown level {0:?}")]
    InvalidLogLevel(String),
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];

/// Validate a parsed configuration, returning every problem found.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    check_address(
        "listener.bind_address",
        &config.listener.bind_address,
        &mut errors,
    );
    if config.observability.metrics_enabled {
        check_address(
            "observability.metrics_address",
            &config.observability.metrics_address,
            &mut errors,
        );
    }

    if config.predictor.candidates.is_empty() {
        errors.push(ValidationError::NoCandidates);
    }
    for (i, candidate) in config.predictor.candidates.iter().enumerate() {
        if candidate.program.trim().is_empty() {
            errors.push(ValidationError::EmptyProgram(i));
        }
    }

    let routes = &config.routes;
    check_path("routes.predict_path", &routes.predict_path, &mut errors);
    check_path("routes.status_path", &routes.status_path, &mut errors);
    if routes.predict_path == routes.status_path {
        errors.push(ValidationError::DuplicatePath(routes.predict_path.clone()));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_address(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if value.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::InvalidAddress {
            field,
            value: value.to_string(),
        });
    }
}

fn check_path(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    if let Some(reason) = path_problem(value) {
        errors.push(ValidationError::InvalidPath {
            field,
            value: value.to_string(),
            reason,
        });
    }
}

/// Why `path` cannot be registered as a route, if it cannot.
fn path_problem(path: &str) -> Option<&'static str> {
    let Some(rest) = path.strip_prefix('/') else {
        return Some("must start with '/'");
    };
    if rest.is_empty() {
        return None;
    }

    for segment in rest.split('/') {
        if segment.is_empty() {
            return Some("must not contain empty segments");
        }
        if segment.starts_with(':') || segment.starts_with('*') {
            return Some("must not use ':' or '*' segments; captures are written {name}");
        }
        let mut depth = 0i32;
        for c in segment.chars() {
            match c {
                '{' => depth += 1,
                '}' => depth -= 1,
                _ => {}
            }
            if !(0..=1).contains(&depth) {
                return Some("has unbalanced '{' or '}'");
            }
        }
        if depth != 0 {
            return Some("has unbalanced '{' or '}'");
        }
    }
    None
}
