//! Request dispatch
//!
//! Validates requests, runs the matching transform and packages a timestamped
//! result or a typed error. Every dispatch goes through
//! [`RequestDispatcher::dispatch`], which:
//!
//! - counts the request and holds an active-session slot for its duration
//! - rejects work beyond the configured job limit
//! - converts a panic inside the transform into `InternalFailure`
//! - records the outcome in the [`MetricsRegistry`]
//!
//! The free functions below are the transforms themselves; they are pure apart
//! from drawing random numbers from the thread-local generator.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

use chrono::Utc;
use rand::Rng;
use tracing::{error, info, warn};

use crate::collapse::collapse;
use crate::config::QuantumConfig;
use crate::error::{QuantumSynthError, Result};
use crate::matrix::{self, MAX_MATRIX_SIZE};
use crate::metrics::MetricsRegistry;
use crate::model::{
    CollapseRequest, CollapseResult, InferenceRequest, InferenceResult, MatrixRequest,
    MatrixResult, Mode, ProcessRequest, ProcessResult,
};

/// Smallest matrix side accepted from callers
pub const MIN_REQUEST_MATRIX_SIZE: i64 = 2;

/// Exclusive upper bound of the number appended to process output
const PROCESS_NONCE_BOUND: u32 = 10_000;

/// Exclusive upper bound of the number appended to inference output
const INFERENCE_NONCE_BOUND: u32 = 100_000;

/// Entry point for all synthesis operations
#[derive(Debug, Clone)]
pub struct RequestDispatcher {
    metrics: MetricsRegistry,
    max_jobs: usize,
}

impl RequestDispatcher {
    /// Create a dispatcher recording into `metrics`
    #[must_use]
    pub fn new(config: &QuantumConfig, metrics: MetricsRegistry) -> Self {
        Self {
            metrics,
            max_jobs: config.max_jobs,
        }
    }

    /// Counters this dispatcher records into
    #[must_use]
    pub fn metrics(&self) -> &MetricsRegistry {
        &self.metrics
    }

    /// Labelled processing
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `input` is empty; `CapacityExceeded` if the job
    /// limit is reached; `InternalFailure` on unexpected failure
    pub fn process(&self, request: &ProcessRequest) -> Result<ProcessResult> {
        self.dispatch("process", || process_quantum_data(request))
    }

    /// Model inference
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `model` or `data` is empty
    pub fn run_inference(&self, request: &InferenceRequest) -> Result<InferenceResult> {
        self.dispatch("inference", || run_inference(request))
    }

    /// Noise matrix synthesis
    ///
    /// # Errors
    ///
    /// `InvalidArgument` if `size` is outside `2..=128`
    pub fn matrix(&self, request: &MatrixRequest) -> Result<MatrixResult> {
        self.dispatch("matrix", || quantum_matrix(request))
    }

    /// Threshold collapse
    ///
    /// # Errors
    ///
    /// Only capacity or internal failures; collapse itself cannot fail
    pub fn collapse(&self, request: &CollapseRequest) -> Result<CollapseResult> {
        self.dispatch("collapse", || Ok(quantum_collapse(request)))
    }

    fn dispatch<T>(&self, operation: &'static str, job: impl FnOnce() -> Result<T>) -> Result<T> {
        let _session = match self.metrics.begin_session(self.max_jobs) {
            Ok(guard) => guard,
            Err(e) => {
                self.metrics.record_failure();
                warn!(operation, error = %e, "Dispatch rejected");
                return Err(e);
            },
        };

        let outcome = panic::catch_unwind(AssertUnwindSafe(job)).unwrap_or_else(|payload| {
            Err(QuantumSynthError::internal(format!(
                "{operation} panicked: {}",
                panic_message(payload.as_ref())
            )))
        });

        match &outcome {
            Ok(_) => self.metrics.record_job(),
            Err(e) if e.is_client_error() => {
                self.metrics.record_failure();
                warn!(operation, error = %e, "Invalid request");
            },
            Err(e) => {
                self.metrics.record_failure();
                error!(operation, error = %e, "Dispatch failed");
            },
        }
        outcome
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

/// Names accepted as `model` / `mode`
#[must_use]
pub fn available_models() -> Vec<&'static str> {
    Mode::AVAILABLE.iter().map(|m| m.as_str()).collect()
}

/// Apply the label for the request's mode and append a random number.
///
/// Modes outside [`Mode::AVAILABLE`], including an empty or absent one, get
/// the `Classic` label.
///
/// # Errors
///
/// `InvalidArgument` if `input` is empty
pub fn process_quantum_data(request: &ProcessRequest) -> Result<ProcessResult> {
    if request.input.is_empty() {
        return Err(QuantumSynthError::invalid_argument("empty input"));
    }

    let mode = Mode::parse(&request.mode);
    info!(input = %request.input, mode = %mode, "Processing quantum-inspired data");

    let nonce = rand::thread_rng().gen_range(0..PROCESS_NONCE_BOUND);
    Ok(ProcessResult {
        output: format!("{}({}):{nonce}", mode.label(), request.input),
        timestamp: Utc::now(),
    })
}

/// Format an inference string for the named model.
///
/// # Errors
///
/// `InvalidArgument` if `model` or `data` is empty
pub fn run_inference(request: &InferenceRequest) -> Result<InferenceResult> {
    if request.model.is_empty() || request.data.is_empty() {
        return Err(QuantumSynthError::invalid_argument(
            "model and data are required",
        ));
    }
    info!(model = %request.model, data = %request.data, "Running inference");

    let nonce = rand::thread_rng().gen_range(0..INFERENCE_NONCE_BOUND);
    Ok(InferenceResult {
        output: format!("Inference({}) on {}: {nonce}", request.model, request.data),
        model: request.model.clone(),
        timestamp: Utc::now(),
    })
}

/// Synthesize a noise matrix for a wire request.
///
/// # Errors
///
/// `InvalidArgument` if `size` is outside `2..=128`
pub fn quantum_matrix(request: &MatrixRequest) -> Result<MatrixResult> {
    let size = usize::try_from(request.size)
        .ok()
        .filter(|s| (MIN_REQUEST_MATRIX_SIZE as usize..=MAX_MATRIX_SIZE).contains(s))
        .ok_or_else(|| {
            QuantumSynthError::invalid_argument(format!(
                "size must be between {MIN_REQUEST_MATRIX_SIZE} and {MAX_MATRIX_SIZE}, got {}",
                request.size
            ))
        })?;
    info!(size, "Synthesizing noise matrix");

    let matrix = matrix::synthesize(size)?;
    Ok(MatrixResult {
        matrix: matrix.to_rows(),
        timestamp: Utc::now(),
    })
}

/// Collapse a wire request's values against its threshold
#[must_use]
pub fn quantum_collapse(request: &CollapseRequest) -> CollapseResult {
    info!(len = request.data.len(), threshold = request.threshold, "Collapsing sequence");
    CollapseResult {
        collapsed: collapse(&request.data, request.threshold),
        timestamp: Utc::now(),
    }
}
