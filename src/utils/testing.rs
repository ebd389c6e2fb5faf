use crate::value::Value;
use approx::abs_diff_eq;

/// Checks that a value has the expected shape and data within tolerance.
/// Panics with the offending index on the first mismatch.
pub fn check_value_near(
    actual: &Value,
    expected_shape: &[usize],
    expected_data: &[f64],
    tolerance: f64,
) {
    assert_eq!(actual.shape(), expected_shape, "Shape mismatch");
    let actual_data: Vec<f64> = actual.iter().copied().collect();
    assert_eq!(
        actual_data.len(),
        expected_data.len(),
        "Data length mismatch"
    );
    for (i, (a, e)) in actual_data.iter().zip(expected_data.iter()).enumerate() {
        if !abs_diff_eq!(*a, *e, epsilon = tolerance) {
            panic!(
                "Data mismatch at index {}: actual={:?}, expected={:?}, tolerance={:?}",
                i, a, e, tolerance
            );
        }
    }
}
