//! API response envelopes
//!
//! Request bodies and result payloads live in [`crate::model`]; these types
//! wrap them in the JSON envelopes the endpoints return.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::metrics::MetricsSnapshot;
use crate::model::ProcessResult;

/// Service name reported by `/health`
pub const SERVICE_NAME: &str = "QuantumSynth";

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Service status
    pub status: String,
    /// Service name
    pub service: String,
    /// Service version
    pub version: String,
    /// Current time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Current time in the server's local zone, RFC 3339
    #[serde(rename = "serverTime")]
    pub server_time: String,
}

/// Counters envelope for `/metrics`
#[derive(Debug, Serialize, Deserialize)]
pub struct MetricsResponse {
    /// Counter snapshot
    pub metrics: MetricsSnapshot,
}

/// Envelope for `/api/v1/quantum/process`
#[derive(Debug, Serialize, Deserialize)]
pub struct ProcessResponse {
    /// Always `"success"`
    pub status: String,
    /// Transform result
    pub result: ProcessResult,
}

/// Envelope for `/api/v1/models`
#[derive(Debug, Serialize, Deserialize)]
pub struct ModelsResponse {
    /// Model names
    pub models: Vec<String>,
}

/// Envelope for `/api/v1/inference`
#[derive(Debug, Serialize, Deserialize)]
pub struct InferenceResponse {
    /// Formatted inference string
    pub output: String,
}

/// Error response body
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Short error category
    pub error: String,
    /// Underlying reason
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub detail: String,
}
