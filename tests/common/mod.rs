//! Shared utilities for integration tests.

use heart_risk_gateway::config::{GatewayConfig, LaunchSpec};
use heart_risk_gateway::http::HttpServer;
use heart_risk_gateway::lifecycle::Shutdown;
use serde_json::{json, Value};
use tokio::net::TcpListener;

/// Gateway bound to an ephemeral port. Shuts down when dropped.
pub struct TestGateway {
    pub base_url: String,
    shutdown: Shutdown,
}

impl Drop for TestGateway {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start a gateway whose predictor is launched from `candidates`.
pub async fn start_gateway(candidates: Vec<LaunchSpec>) -> TestGateway {
    let mut config = GatewayConfig::default();
    config.predictor.candidates = candidates;
    start_gateway_with(config).await
}

/// Start a gateway from `config`, overriding only the bind address.
pub async fn start_gateway_with(mut config: GatewayConfig) -> TestGateway {
    config.listener.bind_address = "127.0.0.1:0".to_string();

    let listener = TcpListener::bind(&config.listener.bind_address).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    let server = HttpServer::new(config);
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    TestGateway {
        base_url: format!("http://{}", addr),
        shutdown,
    }
}

/// Predictor candidate running `script` under `sh`; `$1` is the request JSON.
pub fn shell(script: &str) -> LaunchSpec {
    LaunchSpec::new("sh", ["-c", script, "predictor"])
}

/// Predictor that always prints `output` and exits 0.
pub fn fixed_output(output: &Value) -> LaunchSpec {
    shell(&format!("cat <<'PREDICTION'\n{}\nPREDICTION", output))
}

pub fn sample_request() -> Value {
    json!({
        "age": 52, "sex": 1, "cp": 0, "trestbps": 125, "chol": 212,
        "fbs": 0, "restecg": 1, "thalach": 168, "exang": 0,
        "oldpeak": 1.0, "slope": 2, "ca": 2, "thal": 3
    })
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
