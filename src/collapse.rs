//! Threshold collapse of real sequences into binary indicators

/// Map each value to `1` if `|value| > threshold`, else `0`.
///
/// The output has the same length as `data`. NaN never exceeds a threshold and
/// collapses to `0`.
///
/// # Example
///
/// ```
/// use quantumsynth::collapse::collapse;
///
/// assert_eq!(collapse(&[0.1, -2.5, 0.5, 3.0], 1.0), vec![0, 1, 0, 1]);
/// ```
#[must_use]
pub fn collapse(data: &[f64], threshold: f64) -> Vec<u8> {
    data.iter()
        .map(|v| u8::from(v.abs() > threshold))
        .collect()
}

/// Number of ones in a collapsed sequence
#[must_use]
pub fn excited_count(collapsed: &[u8]) -> usize {
    collapsed.iter().filter(|&&bit| bit == 1).count()
}
