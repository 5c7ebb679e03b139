//! Regression metrics.
//!
//! All functions take `(y_pred, y_true)` slices of equal length.

/// Computes the R² (coefficient of determination) score.
///
/// R² = 1 - (SS_res / SS_tot), where SS_res is the residual sum of squares
/// and SS_tot is the total sum of squares around the mean of `y_true`.
/// A perfect fit scores 1.0; predicting the mean everywhere scores 0.0.
///
/// # Examples
///
/// ```
/// use huella::metrics::r_squared;
///
/// let y_pred = vec![2.5, 0.0, 2.0, 8.0];
/// let y_true = vec![3.0, -0.5, 2.0, 7.0];
/// let r2 = r_squared(&y_pred, &y_true);
/// assert!(r2 > 0.9);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn r_squared(y_pred: &[f32], y_true: &[f32]) -> f32 {
    assert_eq!(
        y_pred.len(),
        y_true.len(),
        "Prediction and target lengths must match"
    );
    assert!(!y_true.is_empty(), "Cannot compute R² on empty slices");

    let mean_true = y_true.iter().sum::<f32>() / y_true.len() as f32;

    let ss_res: f32 = y_pred
        .iter()
        .zip(y_true.iter())
        .map(|(p, t)| (t - p).powi(2))
        .sum();
    let ss_tot: f32 = y_true.iter().map(|t| (t - mean_true).powi(2)).sum();

    if ss_tot == 0.0 {
        // Constant target: perfect only if predictions match it exactly.
        return if ss_res == 0.0 { 1.0 } else { 0.0 };
    }

    1.0 - ss_res / ss_tot
}

/// Computes the mean squared error.
///
/// # Examples
///
/// ```
/// use huella::metrics::mse;
///
/// let y_pred = vec![1.0, 2.0, 3.0];
/// let y_true = vec![1.0, 2.0, 4.0];
/// assert!((mse(&y_pred, &y_true) - 1.0 / 3.0).abs() < 1e-6);
/// ```
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn mse(y_pred: &[f32], y_true: &[f32]) -> f32 {
    assert_eq!(
        y_pred.len(),
        y_true.len(),
        "Prediction and target lengths must match"
    );
    assert!(!y_true.is_empty(), "Cannot compute MSE on empty slices");

    y_pred
        .iter()
        .zip(y_true.iter())
        .map(|(p, t)| (t - p).powi(2))
        .sum::<f32>()
        / y_pred.len() as f32
}

/// Computes the root mean squared error.
#[must_use]
pub fn rmse(y_pred: &[f32], y_true: &[f32]) -> f32 {
    mse(y_pred, y_true).sqrt()
}

/// Computes the mean absolute error.
///
/// # Panics
///
/// Panics if the slices have different lengths or are empty.
#[must_use]
pub fn mae(y_pred: &[f32], y_true: &[f32]) -> f32 {
    assert_eq!(
        y_pred.len(),
        y_true.len(),
        "Prediction and target lengths must match"
    );
    assert!(!y_true.is_empty(), "Cannot compute MAE on empty slices");

    y_pred
        .iter()
        .zip(y_true.iter())
        .map(|(p, t)| (t - p).abs())
        .sum::<f32>()
        / y_pred.len() as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_r_squared_perfect_fit() {
        let y = vec![1.0, 2.0, 3.0, 4.0];
        assert!((r_squared(&y, &y) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_r_squared_mean_prediction() {
        let y_true = vec![1.0, 2.0, 3.0, 4.0];
        let y_pred = vec![2.5; 4];
        assert!(r_squared(&y_pred, &y_true).abs() < 1e-6);
    }

    #[test]
    fn test_r_squared_worse_than_mean_is_negative() {
        let y_true = vec![1.0, 2.0, 3.0];
        let y_pred = vec![3.0, 2.0, 1.0];
        assert!(r_squared(&y_pred, &y_true) < 0.0);
    }

    #[test]
    fn test_r_squared_constant_target() {
        let y_true = vec![5.0, 5.0, 5.0];
        assert!((r_squared(&[5.0, 5.0, 5.0], &y_true) - 1.0).abs() < 1e-6);
        assert!(r_squared(&[4.0, 5.0, 6.0], &y_true).abs() < 1e-6);
    }

    #[test]
    fn test_mse_zero_for_exact() {
        let y = vec![1.5, 2.5];
        assert_eq!(mse(&y, &y), 0.0);
    }

    #[test]
    fn test_mse_known_value() {
        let y_pred = vec![1.0, 2.0];
        let y_true = vec![3.0, 2.0];
        assert!((mse(&y_pred, &y_true) - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_rmse_is_sqrt_of_mse() {
        let y_pred = vec![0.0, 0.0];
        let y_true = vec![3.0, 4.0];
        let expected = (25.0_f32 / 2.0).sqrt();
        assert!((rmse(&y_pred, &y_true) - expected).abs() < 1e-5);
    }

    #[test]
    fn test_mae_known_value() {
        let y_pred = vec![1.0, 2.0, 3.0];
        let y_true = vec![2.0, 2.0, 5.0];
        assert!((mae(&y_pred, &y_true) - 1.0).abs() < 1e-6);
    }

    #[test]
    #[should_panic(expected = "lengths must match")]
    fn test_length_mismatch_panics() {
        let _ = mse(&[1.0], &[1.0, 2.0]);
    }
}
