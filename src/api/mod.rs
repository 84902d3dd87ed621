//! HTTP API for quantum-inspired synthesis
//!
//! Provides REST endpoints over the [`RequestDispatcher`] using axum.
//!
//! ## Endpoints
//!
//! - `GET /health` - Health check
//! - `GET /metrics` - JSON counters
//! - `GET /metrics/prometheus` - Prometheus-formatted counters
//! - `POST /api/v1/quantum/process` - Labelled processing
//! - `POST /api/v1/quantum/matrix` - Noise matrix synthesis
//! - `POST /api/v1/quantum/collapse` - Threshold collapse
//! - `GET /api/v1/models` - Available models
//! - `POST /api/v1/inference` - Model inference
//!
//! Errors are returned as `{"error": ..., "detail": ...}` with status 400 for
//! invalid input (including malformed JSON), 503 when the job limit is
//! reached and 500 otherwise.
//!
//! ## Example
//!
//! ```rust,ignore
//! use quantumsynth::api::{create_router, AppState};
//!
//! let state = AppState::new(config);
//! let app = create_router(state);
//! axum::serve(listener, app).await?;
//! ```

mod types;

pub use types::{
    ErrorResponse, HealthResponse, InferenceResponse, MetricsResponse, ModelsResponse,
    ProcessResponse, SERVICE_NAME,
};

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::warn;

use crate::{
    config::AppConfig,
    dispatch::{available_models, RequestDispatcher},
    error::QuantumSynthError,
    metrics::MetricsRegistry,
    model::{
        CollapseRequest, CollapseResult, InferenceRequest, MatrixRequest, MatrixResult,
        ProcessRequest,
    },
};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Dispatcher for all synthesis operations
    dispatcher: Arc<RequestDispatcher>,
    /// Loaded configuration
    config: Arc<AppConfig>,
}

impl AppState {
    /// Create application state from configuration
    #[must_use]
    pub fn new(config: AppConfig) -> Self {
        let dispatcher = RequestDispatcher::new(&config.quantum, MetricsRegistry::new());
        Self {
            dispatcher: Arc::new(dispatcher),
            config: Arc::new(config),
        }
    }

    /// State with default configuration, for tests and demos
    #[must_use]
    pub fn demo() -> Self {
        Self::new(AppConfig::default())
    }

    /// Counters recorded by this state's dispatcher
    #[must_use]
    pub fn metrics(&self) -> &MetricsRegistry {
        self.dispatcher.metrics()
    }

    /// Loaded configuration
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Shorthand for the error tuple returned by handlers
type ApiErr = (StatusCode, Json<ErrorResponse>);

/// Build an API error response
fn api_err(status: StatusCode, error: &str, detail: impl std::fmt::Display) -> ApiErr {
    (
        status,
        Json(ErrorResponse {
            error: error.to_string(),
            detail: detail.to_string(),
        }),
    )
}

/// Map a dispatch error; `failure` labels unexpected failures
fn dispatch_err(err: &QuantumSynthError, failure: &str) -> ApiErr {
    match err {
        QuantumSynthError::InvalidArgument { .. } => {
            api_err(StatusCode::BAD_REQUEST, "Invalid input", err)
        },
        QuantumSynthError::CapacityExceeded { .. } => {
            api_err(StatusCode::SERVICE_UNAVAILABLE, "Service busy", err)
        },
        _ => api_err(StatusCode::INTERNAL_SERVER_ERROR, failure, err),
    }
}

/// Unwrap a JSON body or report it as invalid input
fn require_body<T>(payload: Result<Json<T>, JsonRejection>, endpoint: &str) -> Result<T, ApiErr> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        warn!(endpoint, error = %rejection.body_text(), "Invalid request body");
        api_err(StatusCode::BAD_REQUEST, "Invalid input", rejection.body_text())
    })
}

/// Create the API router
///
/// # Arguments
///
/// * `state` - Application state with dispatcher and configuration
pub fn create_router(state: AppState) -> Router {
    let v1 = Router::new()
        .route("/quantum/process", post(process_handler))
        .route("/quantum/matrix", post(matrix_handler))
        .route("/quantum/collapse", post(collapse_handler))
        .route("/models", get(models_handler))
        .route("/inference", post(inference_handler));

    Router::new()
        // Health and metrics
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .route("/metrics/prometheus", get(prometheus_handler))
        .nest("/api/v1", v1)
        .with_state(state)
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        service: SERVICE_NAME.to_string(),
        version: crate::VERSION.to_string(),
        timestamp: chrono::Utc::now(),
        server_time: chrono::Local::now().to_rfc3339(),
    })
}

/// Metrics handler - JSON counters
async fn metrics_handler(State(state): State<AppState>) -> Json<MetricsResponse> {
    Json(MetricsResponse {
        metrics: state.metrics().snapshot(),
    })
}

/// Metrics handler - Prometheus text
async fn prometheus_handler(State(state): State<AppState>) -> String {
    state.metrics().to_prometheus()
}

async fn process_handler(
    State(state): State<AppState>,
    payload: Result<Json<ProcessRequest>, JsonRejection>,
) -> Result<Json<ProcessResponse>, ApiErr> {
    let request = require_body(payload, "process")?;
    let result = state
        .dispatcher
        .process(&request)
        .map_err(|e| dispatch_err(&e, "Processing failed"))?;

    Ok(Json(ProcessResponse {
        status: "success".to_string(),
        result,
    }))
}

async fn matrix_handler(
    State(state): State<AppState>,
    payload: Result<Json<MatrixRequest>, JsonRejection>,
) -> Result<Json<MatrixResult>, ApiErr> {
    let request = require_body(payload, "matrix")?;
    state
        .dispatcher
        .matrix(&request)
        .map(Json)
        .map_err(|e| dispatch_err(&e, "Matrix synthesis failed"))
}

async fn collapse_handler(
    State(state): State<AppState>,
    payload: Result<Json<CollapseRequest>, JsonRejection>,
) -> Result<Json<CollapseResult>, ApiErr> {
    let request = require_body(payload, "collapse")?;
    state
        .dispatcher
        .collapse(&request)
        .map(Json)
        .map_err(|e| dispatch_err(&e, "Collapse failed"))
}

async fn models_handler() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        models: available_models().into_iter().map(str::to_string).collect(),
    })
}

async fn inference_handler(
    State(state): State<AppState>,
    payload: Result<Json<InferenceRequest>, JsonRejection>,
) -> Result<Json<InferenceResponse>, ApiErr> {
    let request = require_body(payload, "inference")?;
    let result = state
        .dispatcher
        .run_inference(&request)
        .map_err(|e| dispatch_err(&e, "Inference failed"))?;

    Ok(Json(InferenceResponse {
        output: result.output,
    }))
}

#[cfg(test)]
mod tests;
