//! Batch normalization layer implementation
//!
//! This module provides a BatchNorm layer that normalizes activations across the batch dimension.
//!
//! # Batch Normalization Theory
//!
//! Batch normalization normalizes the inputs to have zero mean and unit variance within each
//! mini-batch, then applies learnable scale (gamma) and shift (beta) parameters:
//!
//! 1. Compute batch statistics: mean μ and variance σ² across the batch
//! 2. Normalize: x_norm = (x - μ) / sqrt(σ² + ε)
//! 3. Scale and shift: y = γ * x_norm + β
//!
//! Statistics are always taken from the current batch. No running averages are kept, so
//! the layer behaves the same way during training and evaluation.
//!
//! # References
//!
//! Ioffe, S., & Szegedy, C. (2015). Batch Normalization: Accelerating Deep Network Training
//! by Reducing Internal Covariate Shift. ICML.

use ndarray::Axis;

use crate::error::{NetError, Result};
use crate::layers::Layer;
use crate::tensor::{ensure_rows, Tensor, Vector};

/// Constant added to the variance before taking the square root.
pub const BATCH_NORM_EPSILON: f64 = 1e-7;

/// Batch normalization layer borrowing gamma and beta from the parameter container.
///
/// # Example
///
/// ```
/// use multilayer_net::layers::{BatchNorm, Layer};
/// use ndarray::{array, Array1};
///
/// let gamma = Array1::ones(2);
/// let beta = Array1::zeros(2);
/// let layer = BatchNorm::new(&gamma, &beta);
///
/// let (out, _ctx) = layer.forward(&array![[1.0, 10.0], [3.0, 30.0]]).unwrap();
/// assert!((out[[0, 0]] + 1.0).abs() < 1e-6);
/// assert!((out[[1, 1]] - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchNorm<'a> {
    gamma: &'a Vector,
    beta: &'a Vector,
    epsilon: f64,
}

/// Values cached by [`BatchNorm::forward`].
#[derive(Debug, Clone)]
pub struct BatchNormContext {
    /// x - μ
    diff: Tensor,
    /// 1 / (σ² + ε)
    inv_var: Vector,
    /// 1 / sqrt(σ² + ε)
    inv_std: Vector,
    /// (x - μ) / sqrt(σ² + ε)
    norm: Tensor,
}

impl BatchNormContext {
    /// Normalized input before scale and shift.
    pub fn normalized(&self) -> &Tensor {
        &self.norm
    }

    /// Per-column 1 / sqrt(σ² + ε) of the batch.
    pub fn inv_std(&self) -> &Vector {
        &self.inv_std
    }
}

/// Gamma and beta gradients of a normalization layer.
#[derive(Debug, Clone, PartialEq)]
pub struct NormGrads {
    pub gamma: Vector,
    pub beta: Vector,
}

impl NormGrads {
    /// All-zero gradients for a layer of the given width.
    pub fn zeros(width: usize) -> Self {
        Self {
            gamma: Vector::zeros(width),
            beta: Vector::zeros(width),
        }
    }
}

impl<'a> BatchNorm<'a> {
    /// Creates a batch normalization view over `gamma` and `beta` with ε = 1e-7.
    pub fn new(gamma: &'a Vector, beta: &'a Vector) -> Self {
        Self {
            gamma,
            beta,
            epsilon: BATCH_NORM_EPSILON,
        }
    }

    /// Get the epsilon value used for numerical stability.
    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }

    /// Number of input/output features.
    pub fn size(&self) -> usize {
        self.gamma.len()
    }

    fn check_width(&self, op: &'static str, t: &Tensor) -> Result<()> {
        if self.beta.len() != self.gamma.len() {
            return Err(NetError::shape_mismatch(
                "batchnorm.params",
                (1, self.gamma.len()),
                (1, self.beta.len()),
            ));
        }
        if t.ncols() != self.gamma.len() {
            return Err(NetError::shape_mismatch(op, t.dim(), (1, self.gamma.len())));
        }
        Ok(())
    }
}

impl Layer for BatchNorm<'_> {
    type Context = BatchNormContext;
    type Grads = NormGrads;

    fn forward(&self, input: &Tensor) -> Result<(Tensor, BatchNormContext)> {
        self.check_width("batchnorm.forward", input)?;
        let rows = ensure_rows("batchnorm.forward", input)? as f64;

        let mean = input.sum_axis(Axis(0)) / rows;
        let diff = input - &mean;
        let variance = diff.mapv(|d| d * d).sum_axis(Axis(0)) / rows;

        let inv_var = variance.mapv(|v| 1.0 / (v + self.epsilon));
        let inv_std = variance.mapv(|v| 1.0 / (v + self.epsilon).sqrt());
        let norm = &diff * &inv_std;

        let output = &norm * self.gamma + self.beta;

        Ok((
            output,
            BatchNormContext {
                diff,
                inv_var,
                inv_std,
                norm,
            },
        ))
    }

    /// Equivalent to dx = inv_std·(γ·dout − mean(γ·dout) − norm·mean(γ·dout·norm)),
    /// computed through the cached centered input.
    fn backward(&self, ctx: BatchNormContext, grad_output: &Tensor) -> Result<(Tensor, NormGrads)> {
        self.check_width("batchnorm.backward", grad_output)?;
        if grad_output.dim() != ctx.norm.dim() {
            return Err(NetError::shape_mismatch(
                "batchnorm.backward",
                grad_output.dim(),
                ctx.norm.dim(),
            ));
        }
        let rows = grad_output.nrows() as f64;

        let beta = grad_output.sum_axis(Axis(0));
        let gamma = (&ctx.norm * grad_output).sum_axis(Axis(0));

        let scaled = grad_output * self.gamma;
        let scaled_diff_mean = (&scaled * &ctx.diff).sum_axis(Axis(0)) / rows;
        let centered = (&scaled - &(&ctx.diff * &(&ctx.inv_var * &scaled_diff_mean))) * &ctx.inv_std;
        let centered_mean = centered.sum_axis(Axis(0)) / rows;
        let grad_input = centered - &centered_mean;

        Ok((grad_input, NormGrads { gamma, beta }))
    }
}
