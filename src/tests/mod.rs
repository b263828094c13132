mod eval;
mod validate;

/// Tolerance for comparing calculated results
pub(crate) const EPSILON: f64 = 1e-8;

/// Asserts that a result is within [`EPSILON`] of the expected value.
#[track_caller]
pub(crate) fn assert_close(actual: f64, expected: f64) {
	assert!(
		(actual - expected).abs() <= EPSILON,
		"expected {expected}, got {actual}"
	);
}
