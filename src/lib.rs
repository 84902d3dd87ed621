//! # QuantumSynth
//!
//! Quantum-inspired synthesis service: seeded noise, noise matrices,
//! threshold collapse and labelled text transforms, served over HTTP.
//!
//! ## Example
//!
//! ```rust
//! use quantumsynth::collapse::collapse;
//! use quantumsynth::matrix::synthesize;
//! use quantumsynth::noise::noise;
//!
//! assert!(noise(42).is_finite());
//!
//! let m = synthesize(4).unwrap();
//! assert_eq!(m.size(), 4);
//!
//! assert_eq!(collapse(&[0.1, -2.5, 0.5, 3.0], 1.0), vec![0, 1, 0, 1]);
//! ```
//!
//! ## Architecture
//!
//! - [`noise`] and [`matrix`]: seeded noise samples and square grids of them
//! - [`collapse`]: threshold indicators over real sequences
//! - [`dispatch`]: request validation, transforms and per-request isolation
//! - [`metrics`]: lock-free counters read by the status endpoints
//! - [`api`]: axum router (feature `server`)
//! - [`config`] and [`observability`]: startup configuration and logging

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_wrap)] // usize cell offsets -> i64 seeds
#![allow(clippy::cast_sign_loss)] // i64 seeds -> u64 generator seeds
#![allow(clippy::cast_precision_loss)] // i64 seeds -> f64 phase
#![allow(clippy::must_use_candidate)]
#![allow(clippy::float_cmp)] // Exact comparisons in tests

#[cfg(feature = "server")]
pub mod api;
pub mod collapse;
/// Service configuration (TOML file + environment)
pub mod config;
pub mod dispatch;
pub mod error;
pub mod matrix;
pub mod metrics;
pub mod model;
pub mod noise;
/// Logging setup via `tracing-subscriber`
pub mod observability;

pub use error::{QuantumSynthError, Result};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
