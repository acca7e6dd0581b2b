//! Shared utilities for the engine and its callers
//!
//! This module provides seeded random number generation, activation functions,
//! mini-batch sampling and synthetic datasets.

pub mod activations;
pub mod rng;
pub mod sampling;
pub mod synthetic;

pub use activations::{sigmoid, sigmoid_derivative, softmax_rows};
pub use rng::{entropy_rng, normal_tensor, seeded_rng};
pub use sampling::sample_batch;
pub use synthetic::two_class_clusters;
