use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;

/// Successful prediction as returned by the gateway.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub status: String,
    pub prediction: u8,
    pub probability: f64,
    pub classification: String,
    /// Any additional keys the predictor emitted.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body of a gateway 400/500 response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ErrorEnvelope {
    pub status: String,
    pub message: String,
    pub details: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceStatus {
    pub service: String,
    pub version: String,
    pub status: String,
}

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with its error envelope.
    #[error("gateway returned {status}: {} ({})", .envelope.message, .envelope.details)]
    Gateway {
        status: StatusCode,
        envelope: ErrorEnvelope,
    },

    #[error("unexpected response {status}: {body}")]
    Unexpected { status: StatusCode, body: String },
}

pub const DEFAULT_PREDICT_PATH: &str = "/api/predict";
pub const DEFAULT_STATUS_PATH: &str = "/api/status";

pub struct GatewayClient {
    client: Client,
    base_url: String,
    predict_path: String,
    status_path: String,
}

impl GatewayClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            predict_path: DEFAULT_PREDICT_PATH.to_string(),
            status_path: DEFAULT_STATUS_PATH.to_string(),
        }
    }

    /// Use a gateway whose `routes.predict_path` is not the default.
    pub fn with_predict_path(mut self, path: &str) -> Self {
        self.predict_path = path.to_string();
        self
    }

    /// Use a gateway whose `routes.status_path` is not the default.
    pub fn with_status_path(mut self, path: &str) -> Self {
        self.status_path = path.to_string();
        self
    }

    /// Submit measurements for classification.
    ///
    /// Accepts anything that serializes to the thirteen-field request object.
    pub async fn predict<T: Serialize + ?Sized>(
        &self,
        measurements: &T,
    ) -> Result<Prediction, ClientError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, self.predict_path))
            .json(measurements)
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            return serde_json::from_str(&text)
                .map_err(|_| ClientError::Unexpected { status, body: text });
        }

        match serde_json::from_str::<ErrorEnvelope>(&text) {
            Ok(envelope) => Err(ClientError::Gateway { status, envelope }),
            Err(_) => Err(ClientError::Unexpected { status, body: text }),
        }
    }

    pub async fn status(&self) -> Result<ServiceStatus, ClientError> {
        let resp = self
            .client
            .get(format!("{}{}", self.base_url, self.status_path))
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await?;
            return Err(ClientError::Unexpected { status, body });
        }
        Ok(resp.json().await?)
    }
}
