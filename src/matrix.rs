//! Noise matrix synthesis
//!
//! Builds square grids of noise samples. Cell `(i, j)` is seeded with the
//! current wall-clock time in nanoseconds plus `i * j`.

use serde::Serialize;

use crate::error::{QuantumSynthError, Result};
use crate::noise::noise;

/// Largest side length accepted by [`synthesize`]
pub const MAX_MATRIX_SIZE: usize = 128;

/// Square grid of reals stored row-major
///
/// # Examples
///
/// ```
/// use quantumsynth::matrix::NumericMatrix;
///
/// let m = NumericMatrix::from_vec(2, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// assert_eq!(m.size(), 2);
/// assert_eq!(m.get(1, 0), Some(3.0));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NumericMatrix {
    /// Side length
    size: usize,
    /// Flattened cells in row-major order
    data: Vec<f64>,
}

impl NumericMatrix {
    /// Create a matrix from row-major cells
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `size` is zero or `data.len() != size * size`
    pub fn from_vec(size: usize, data: Vec<f64>) -> Result<Self> {
        if size == 0 {
            return Err(QuantumSynthError::invalid_argument(
                "matrix size must be positive",
            ));
        }
        let expected = size.checked_mul(size).ok_or_else(|| {
            QuantumSynthError::invalid_argument(format!("matrix size {size} overflows"))
        })?;
        if data.len() != expected {
            return Err(QuantumSynthError::invalid_argument(format!(
                "expected {expected} cells for a {size}x{size} matrix, got {}",
                data.len()
            )));
        }
        Ok(Self { size, data })
    }

    /// Side length
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at row `i`, column `j`
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        if i >= self.size || j >= self.size {
            return None;
        }
        self.data.get(i * self.size + j).copied()
    }

    /// Flattened row-major cells
    #[must_use]
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Iterate rows as slices
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.data.chunks(self.size)
    }

    /// Copy into nested rows (the wire shape)
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(<[f64]>::to_vec).collect()
    }

    /// Sum of absolute cell values
    #[must_use]
    pub fn magnitude(&self) -> f64 {
        self.data.iter().map(|v| v.abs()).sum()
    }
}

/// Synthesize a `size` x `size` noise matrix seeded from the current time
///
/// # Errors
///
/// Returns `InvalidArgument` if `size` is zero or exceeds [`MAX_MATRIX_SIZE`]
pub fn synthesize(size: usize) -> Result<NumericMatrix> {
    let now = chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default();
    synthesize_at(size, now)
}

/// Synthesize a matrix against an explicit time origin in nanoseconds
///
/// # Errors
///
/// Returns `InvalidArgument` if `size` is zero or exceeds [`MAX_MATRIX_SIZE`]
pub fn synthesize_at(size: usize, epoch_nanos: i64) -> Result<NumericMatrix> {
    if size == 0 || size > MAX_MATRIX_SIZE {
        return Err(QuantumSynthError::invalid_argument(format!(
            "matrix size must be between 1 and {MAX_MATRIX_SIZE}, got {size}"
        )));
    }

    let mut data = Vec::with_capacity(size * size);
    for i in 0..size {
        for j in 0..size {
            let offset = (i * j) as i64;
            data.push(noise(epoch_nanos.wrapping_add(offset)));
        }
    }
    NumericMatrix::from_vec(size, data)
}
