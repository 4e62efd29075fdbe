//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, CORS, metrics)
//! - Bind server to listener
//! - Hand prediction requests to the predictor
//!
//! # Middleware order (outermost first)
//! ```text
//! SetRequestId → Trace → PropagateRequestId → metrics → CORS → handler
//! ```

use std::sync::Arc;
use std::time::Instant;

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};

use crate::config::GatewayConfig;
use crate::http::request::{request_id, UuidRequestId};
use crate::http::response::ApiError;
use crate::observability::metrics;
use crate::predictor::{PredictionRequest, PredictionResult, Predictor, ProcessPredictor};
use crate::security::headers::cors_middleware;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub predictor: Arc<dyn Predictor>,
}

/// HTTP server for the gateway.
pub struct HttpServer {
    router: Router,
    config: GatewayConfig,
}

impl HttpServer {
    /// Create a server that runs the predictor as a child process.
    pub fn new(config: GatewayConfig) -> Self {
        let predictor = Arc::new(ProcessPredictor::from_config(&config.predictor));
        Self::with_predictor(config, predictor)
    }

    /// Create a server around any predictor implementation.
    pub fn with_predictor(config: GatewayConfig, predictor: Arc<dyn Predictor>) -> Self {
        let state = AppState { predictor };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route(
                &config.routes.predict_path,
                post(predict_handler).fallback(method_not_allowed),
            )
            .route(&config.routes.status_path, get(status_handler))
            .fallback(not_found)
            .with_state(state)
            .layer(middleware::from_fn(cors_middleware))
            .layer(middleware::from_fn(track_requests))
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(
                TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id(request),
                    )
                }),
            )
            .layer(SetRequestIdLayer::x_request_id(UuidRequestId))
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            predict_path = %self.config.routes.predict_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The fully layered router, for driving requests without a socket.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

/// Runs one prediction for one request.
async fn predict_handler(
    State(state): State<AppState>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected prediction body");
        ApiError::InvalidRequest(rejection.body_text())
    })?;

    let start = Instant::now();
    let outcome = state.predictor.predict(&request).await;
    metrics::record_invocation(
        outcome.as_ref().map_or_else(|e| e.category(), |_| "success"),
        start,
    );

    let result = outcome?;
    tracing::info!(
        prediction = ?result.prediction(),
        classification = ?result.classification(),
        "Prediction served"
    );
    Ok(Json(result))
}

#[derive(Serialize)]
struct ServiceStatus {
    service: &'static str,
    version: &'static str,
    status: &'static str,
}

async fn status_handler() -> Json<ServiceStatus> {
    Json(ServiceStatus {
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        status: "operational",
    })
}

async fn method_not_allowed() -> ApiError {
    ApiError::MethodNotAllowed
}

async fn not_found() -> ApiError {
    ApiError::NotFound
}

async fn track_requests(request: Request<Body>, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), start);
    response
}
