//! Predictor executed as a child process.
//!
//! # Responsibilities
//! - Launch the first available candidate with the request as its argument
//! - Drain stdout and stderr until the process exits
//! - Turn exit status and output into a result or a categorized failure
//!
//! # Design Decisions
//! - A candidate that is not found is skipped; any other spawn error is final
//! - Both pipes are read to EOF before the exit status is interpreted
//! - Children are killed if the waiting request is dropped

use std::io;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use serde_json::Value;
use tokio::process::{Child, Command};

use crate::config::{LaunchSpec, PredictorConfig};
use crate::predictor::error::{PredictorError, PredictorResult};
use crate::predictor::types::{PredictionRequest, PredictionResult};
use crate::predictor::Predictor;

/// Runs the predictor as an external program, one process per request.
#[derive(Debug, Clone)]
pub struct ProcessPredictor {
    candidates: Vec<LaunchSpec>,
    working_dir: Option<PathBuf>,
}

impl ProcessPredictor {
    pub fn new(candidates: Vec<LaunchSpec>) -> Self {
        Self {
            candidates,
            working_dir: None,
        }
    }

    pub fn from_config(config: &PredictorConfig) -> Self {
        Self {
            candidates: config.candidates.clone(),
            working_dir: config.working_dir.as_ref().map(PathBuf::from),
        }
    }

    pub fn with_working_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn candidates(&self) -> &[LaunchSpec] {
        &self.candidates
    }

    /// Start the first candidate that exists.
    fn spawn(&self, payload: &str) -> PredictorResult<(Child, &LaunchSpec)> {
        // A missing cwd also surfaces as NotFound from spawn; report it as itself.
        if let Some(dir) = &self.working_dir {
            if !dir.is_dir() {
                tracing::error!(working_dir = %dir.display(), "Predictor working directory unavailable");
                return Err(PredictorError::ProcessError(format!(
                    "working directory {} is not a directory",
                    dir.display()
                )));
            }
        }

        let mut failures = Vec::new();

        for spec in &self.candidates {
            let mut cmd = Command::new(&spec.program);
            cmd.args(&spec.args)
                .arg(payload)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            if let Some(dir) = &self.working_dir {
                cmd.current_dir(dir);
            }

            match cmd.spawn() {
                Ok(child) => return Ok((child, spec)),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    tracing::debug!(candidate = %spec, error = %e, "Predictor candidate unavailable");
                    failures.push(format!("Failed to spawn {}: {}", spec.program, e));
                }
                Err(e) => {
                    tracing::error!(candidate = %spec, error = %e, "Predictor launch failed");
                    return Err(PredictorError::ProcessError(e.to_string()));
                }
            }
        }

        Err(PredictorError::SpawnFailure(format!(
            "Could not find a predictor runtime. Errors: {}",
            failures.join("; ")
        )))
    }
}

#[async_trait]
impl Predictor for ProcessPredictor {
    async fn predict(&self, request: &PredictionRequest) -> PredictorResult<PredictionResult> {
        let payload = request
            .to_canonical_json()
            .map_err(|e| PredictorError::ProcessError(e.to_string()))?;

        let start = Instant::now();
        let (child, spec) = self.spawn(&payload)?;
        tracing::debug!(candidate = %spec, pid = ?child.id(), "Predictor started");

        // Reads both pipes to EOF concurrently, then reaps the child.
        let output = child
            .wait_with_output()
            .await
            .map_err(|e| PredictorError::ProcessError(e.to_string()))?;

        let outcome = interpret_output(output.status.code(), &output.stdout, &output.stderr);
        match &outcome {
            Ok(_) => tracing::debug!(
                candidate = %spec,
                elapsed_ms = start.elapsed().as_millis() as u64,
                "Predictor finished"
            ),
            Err(e) => tracing::warn!(
                candidate = %spec,
                category = e.category(),
                exit_code = ?output.status.code(),
                details = e.details(),
                "Predictor invocation failed"
            ),
        }
        outcome
    }
}

/// Map a finished process to an outcome.
///
/// `code` is `None` when the process was terminated by a signal.
pub fn interpret_output(
    code: Option<i32>,
    stdout: &[u8],
    stderr: &[u8],
) -> PredictorResult<PredictionResult> {
    let diagnostic = String::from_utf8_lossy(stderr).trim_end().to_string();

    match code {
        Some(0) => {}
        Some(code) => {
            return Err(PredictorError::ExecutionFailure(or_else(
                diagnostic,
                format!("Process exited with code {}", code),
            )))
        }
        None => {
            return Err(PredictorError::ExecutionFailure(or_else(
                diagnostic,
                "Process terminated by signal".to_string(),
            )))
        }
    }

    match serde_json::from_slice::<Value>(stdout) {
        Ok(Value::Object(object)) => Ok(PredictionResult::from_output(object)),
        Ok(other) => Err(PredictorError::MalformedOutput(or_else(
            diagnostic,
            format!("expected a JSON object, got {}", json_kind(&other)),
        ))),
        Err(e) => Err(PredictorError::MalformedOutput(or_else(
            diagnostic,
            e.to_string(),
        ))),
    }
}

fn or_else(diagnostic: String, fallback: String) -> String {
    if diagnostic.is_empty() {
        fallback
    } else {
        diagnostic
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
