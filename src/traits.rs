//! Core traits for model training and prediction.
//!
//! The [`Estimator`] trait is the seam between feature encoding and the
//! concrete model. Inference code is written against the trait, so tests can
//! substitute a trivial stub and assert on the assembled feature row without
//! training a forest.

use crate::error::Result;
use crate::primitives::{Matrix, Vector};

/// A supervised regression model.
///
/// # Examples
///
/// ```
/// use huella::prelude::*;
///
/// let x = Matrix::from_vec(4, 1, vec![1.0, 2.0, 3.0, 4.0]).unwrap();
/// let y = Vector::from_vec(vec![2.0, 4.0, 6.0, 8.0]);
///
/// let mut model = RandomForestRegressor::new(5).with_random_state(42);
/// model.fit(&x, &y).unwrap();
/// let predictions = model.predict(&x);
/// assert_eq!(predictions.len(), 4);
/// ```
pub trait Estimator {
    /// Fits the model to training data.
    ///
    /// # Errors
    ///
    /// Returns an error if the data dimensions are inconsistent or the
    /// training set is empty.
    fn fit(&mut self, x: &Matrix<f32>, y: &Vector<f32>) -> Result<()>;

    /// Predicts target values for each row of `x`.
    ///
    /// # Panics
    ///
    /// Panics if called before [`Estimator::fit`].
    fn predict(&self, x: &Matrix<f32>) -> Vector<f32>;

    /// Returns the R² score of the model on the given data.
    fn score(&self, x: &Matrix<f32>, y: &Vector<f32>) -> f32 {
        crate::metrics::r_squared(self.predict(x).as_slice(), y.as_slice())
    }
}
