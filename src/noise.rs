//! Seeded noise generation
//!
//! A noise sample is a standard-normal draw scaled by `sin(seed mod π)`.
//! Every call owns its generator, seeded from the argument, so there is no
//! process-wide random state to race on and equal seeds give equal samples.

use std::f64::consts::PI;

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Produce one noise sample for `seed`.
///
/// Always finite: a non-finite product collapses to `0.0`.
///
/// # Example
///
/// ```
/// use quantumsynth::noise::noise;
///
/// let a = noise(42);
/// assert!(a.is_finite());
/// assert_eq!(a, noise(42));
/// ```
#[must_use]
pub fn noise(seed: i64) -> f64 {
    let mut rng = StdRng::seed_from_u64(seed as u64);
    let draw: f64 = rng.sample(StandardNormal);
    let value = draw * modulation(seed);
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Trigonometric envelope applied to the normal draw
fn modulation(seed: i64) -> f64 {
    ((seed as f64) % PI).sin()
}
