//! Request and result types for the dispatcher
//!
//! These are the wire shapes of the JSON bodies accepted and produced by the
//! `/api/v1` endpoints. Results are built once by the dispatcher and never
//! mutated afterwards.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Transform mode selecting the label applied to process input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// `superposition`
    Superposition,
    /// `entanglement`
    Entanglement,
    /// `quantum-walk`
    QuantumWalk,
    /// `deep-neuro-synth`
    DeepNeuroSynth,
    /// Anything unrecognised
    Classic,
}

impl Mode {
    /// Modes advertised by the models endpoint
    pub const AVAILABLE: [Mode; 4] = [
        Mode::Superposition,
        Mode::Entanglement,
        Mode::QuantumWalk,
        Mode::DeepNeuroSynth,
    ];

    /// Exact-match parse; unknown names map to [`Mode::Classic`]
    #[must_use]
    pub fn parse(name: &str) -> Self {
        match name {
            "superposition" => Mode::Superposition,
            "entanglement" => Mode::Entanglement,
            "quantum-walk" => Mode::QuantumWalk,
            "deep-neuro-synth" => Mode::DeepNeuroSynth,
            _ => Mode::Classic,
        }
    }

    /// Wire name
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Mode::Superposition => "superposition",
            Mode::Entanglement => "entanglement",
            Mode::QuantumWalk => "quantum-walk",
            Mode::DeepNeuroSynth => "deep-neuro-synth",
            Mode::Classic => "classic",
        }
    }

    /// Label wrapped around the input in process output
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Mode::Superposition => "Superposed",
            Mode::Entanglement => "Entangled",
            Mode::QuantumWalk => "QuantumWalked",
            Mode::DeepNeuroSynth => "NeuroSynthesized",
            Mode::Classic => "Classic",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Input for labelled processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRequest {
    /// Text to transform (required, non-empty)
    pub input: String,
    /// Mode name; empty, `null` or absent selects `Classic`
    #[serde(default, deserialize_with = "null_as_empty")]
    pub mode: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Output of labelled processing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessResult {
    /// `<Label>(<input>):<n>`
    pub output: String,
    /// Completion time (UTC)
    pub timestamp: DateTime<Utc>,
}

/// Input for a model inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceRequest {
    /// Model identifier (required, non-empty)
    pub model: String,
    /// Payload (required, non-empty)
    pub data: String,
}

/// Output of a model inference
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceResult {
    /// `Inference(<model>) on <data>: <n>`
    pub output: String,
    /// Model identifier echoed back
    pub model: String,
    /// Completion time (UTC)
    pub timestamp: DateTime<Utc>,
}

/// Input for noise matrix synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixRequest {
    /// Side length, 2..=128
    pub size: i64,
}

/// Output of noise matrix synthesis
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixResult {
    /// Rows of noise samples
    pub matrix: Vec<Vec<f64>>,
    /// Completion time (UTC)
    pub timestamp: DateTime<Utc>,
}

/// Input for threshold collapse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseRequest {
    /// Values to collapse
    pub data: Vec<f64>,
    /// Magnitude that must be exceeded to yield `1`
    pub threshold: f64,
}

/// Output of threshold collapse
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollapseResult {
    /// One indicator per input value
    pub collapsed: Vec<u8>,
    /// Completion time (UTC)
    pub timestamp: DateTime<Utc>,
}
