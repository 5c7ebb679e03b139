//! Core data structures for numeric computation.
//!
//! This module provides the fundamental types used throughout huella:
//! - [`Matrix`]: 2D array with row-major storage
//! - [`Vector`]: 1D array with common reductions

mod matrix;
mod vector;

pub use matrix::Matrix;
pub use vector::Vector;
