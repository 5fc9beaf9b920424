//! Distance matrices.
//!
//! Provides a dense distance matrix with ceiling-rounded Euclidean costs.

mod matrix;

pub use matrix::DistanceMatrix;
