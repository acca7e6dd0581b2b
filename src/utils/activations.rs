//! Elementwise and row-wise activation functions
//!
//! Plain functions shared by the activation layers and the loss layer:
//! - Sigmoid and its derivative in terms of the sigmoid output
//! - Row-wise softmax with max subtraction for numerical stability

use ndarray::Axis;

use crate::tensor::Tensor;

/// Sigmoid activation function.
///
/// Returns the sigmoid of the input: 1 / (1 + exp(-x))
pub fn sigmoid(x: f64) -> f64 {
    1.0 / (1.0 + (-x).exp())
}

/// Sigmoid derivative assuming y = sigmoid(x).
///
/// Returns the derivative: y * (1 - y)
pub fn sigmoid_derivative(y: f64) -> f64 {
    y * (1.0 - y)
}

/// Softmax applied row-wise, returning a new tensor.
///
/// Converts scores to probabilities for each row. Each row's maximum is
/// subtracted before exponentiating so large scores cannot overflow.
pub fn softmax_rows(scores: &Tensor) -> Tensor {
    let mut out = scores.clone();
    if out.ncols() == 0 {
        return out;
    }

    for mut row in out.axis_iter_mut(Axis(0)) {
        let max_value = row.fold(f64::NEG_INFINITY, |acc, &v| acc.max(v));
        row.mapv_inplace(|v| (v - max_value).exp());
        let sum = row.sum();
        row.mapv_inplace(|v| v / sum);
    }
    out
}
