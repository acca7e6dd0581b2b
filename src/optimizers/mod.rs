//! Optimizer abstractions for neural network parameter updates
//!
//! This module provides the Optimizer trait and implementations for the
//! update rules used to train a [`MultiLayerNet`](crate::network::MultiLayerNet).
//!
//! # Overview
//!
//! Optimizers define how to use gradients to update model parameters. The basic
//! gradient descent update is `weight = weight - learning_rate * gradient`;
//! Momentum accumulates a velocity and AdaGrad scales each entry by its
//! gradient history. Every rule is applied to the weight, bias, gamma and beta
//! of every stage.
//!
//! # Available Optimizers
//!
//! - SGD: Vanilla stochastic gradient descent
//! - Momentum: Gradient descent with a velocity term
//! - AdaGrad: Per-entry learning rates from accumulated squared gradients
//!
//! # Example
//!
//! ```ignore
//! use multilayer_net::optimizers::{build_optimizer, OptimizerKind};
//!
//! let mut optimizer = build_optimizer(OptimizerKind::Momentum, 0.1, 0.9);
//!
//! // In training loop:
//! let grads = net.gradient(&x_batch, &t_batch)?;
//! optimizer.update(net.params_mut(), &grads)?;
//! ```

pub mod adagrad;
pub mod momentum;
pub mod sgd;

pub use adagrad::AdaGrad;
pub use momentum::Momentum;
pub use sgd::SGD;

use ndarray::Zip;
use serde::Deserialize;
use tracing::trace;

use crate::error::{NetError, Result};
use crate::params::{Gradients, Params, StageParams};

/// Momentum coefficient used when a configuration does not name one.
pub const DEFAULT_MOMENTUM: f64 = 0.9;

/// Core trait for neural network optimizers.
///
/// All optimizer types (SGD, Momentum, AdaGrad) implement this trait to provide
/// a uniform interface for parameter updates during training.
///
/// # State Management
///
/// Momentum and AdaGrad keep one auxiliary buffer per parameter tensor. The
/// buffers are allocated as zeros on the first update that touches a stage and
/// persist until [`Optimizer::reset`].
///
/// # Example
///
/// ```ignore
/// // Create optimizer instance
/// let mut optimizer = Momentum::new(learning_rate, 0.9);
///
/// // In training loop:
/// for step in 0..iterations {
///     let grads = net.gradient(&x, &t)?;
///     optimizer.update(net.params_mut(), &grads)?;
/// }
/// ```
pub trait Optimizer {
    /// Update parameters using gradients.
    ///
    /// Applies the optimizer's update rule to every stage of `params` in place.
    ///
    /// # Arguments
    ///
    /// * `params` - Parameter container to update
    /// * `grads` - Gradient of the loss with respect to each parameter, same layout
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` when `grads` (or previously allocated optimizer
    /// state) does not match `params`. Shapes are checked before anything is
    /// written, so a failed update leaves `params` untouched.
    fn update(&mut self, params: &mut Params, grads: &Gradients) -> Result<()>;

    /// Reset optimizer state.
    ///
    /// Clears any accumulated velocity or squared-gradient history. For
    /// stateless optimizers like vanilla SGD, this is a no-op.
    fn reset(&mut self);

    /// Get the learning rate for this optimizer.
    fn learning_rate(&self) -> f64;

    /// Set the learning rate for this optimizer.
    ///
    /// # Arguments
    ///
    /// * `lr` - New learning rate value (must be positive)
    fn set_learning_rate(&mut self, lr: f64);
}

/// Optimizer selector used by configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptimizerKind {
    #[default]
    Sgd,
    Momentum,
    AdaGrad,
}

/// Creates the optimizer selected by `kind`.
///
/// `momentum` is only read by [`OptimizerKind::Momentum`].
///
/// # Examples
///
/// ```
/// use multilayer_net::optimizers::{build_optimizer, OptimizerKind};
///
/// let optimizer = build_optimizer(OptimizerKind::AdaGrad, 0.01, 0.9);
/// assert_eq!(optimizer.learning_rate(), 0.01);
/// ```
pub fn build_optimizer(kind: OptimizerKind, learning_rate: f64, momentum: f64) -> Box<dyn Optimizer> {
    match kind {
        OptimizerKind::Sgd => Box::new(SGD::new(learning_rate)),
        OptimizerKind::Momentum => Box::new(Momentum::new(learning_rate, momentum)),
        OptimizerKind::AdaGrad => Box::new(AdaGrad::new(learning_rate)),
    }
}

/// Lazily allocated auxiliary buffers, one [`StageParams`]-shaped slot per stage.
#[derive(Debug, Clone, Default)]
pub(crate) struct StageState {
    buffers: Vec<Option<StageParams>>,
}

impl StageState {
    /// Allocate zero buffers for stages seen for the first time and check the
    /// shapes of buffers that already exist.
    pub(crate) fn prepare(&mut self, params: &Params, optimizer: &'static str) -> Result<()> {
        if !self.buffers.is_empty() && self.buffers.len() != params.depth() {
            return Err(NetError::shape_mismatch(
                "optimizer.state",
                (self.buffers.len(), 0),
                (params.depth(), 0),
            ));
        }
        if self.buffers.is_empty() {
            self.buffers.resize(params.depth(), None);
        }

        for (index, (slot, stage)) in self.buffers.iter_mut().zip(params.stages()).enumerate() {
            match slot {
                Some(buffer) => buffer.ensure_same_shape(stage)?,
                None => {
                    trace!(optimizer, stage = index, "allocating optimizer state");
                    *slot = Some(stage.zeros_like());
                }
            }
        }
        Ok(())
    }

    /// Buffers in stage order; only stages passed through `prepare` are yielded.
    pub(crate) fn stages_mut(&mut self) -> impl Iterator<Item = &mut StageParams> {
        self.buffers.iter_mut().flatten()
    }

    #[cfg(test)]
    pub(crate) fn stage(&self, index: usize) -> Option<&StageParams> {
        self.buffers.get(index).and_then(Option::as_ref)
    }

    pub(crate) fn clear(&mut self) {
        self.buffers.clear();
    }
}

/// Apply `f(param, grad)` to every entry of a stage's four tensors.
pub(crate) fn update_entries<F>(param: &mut StageParams, grad: &StageParams, mut f: F)
where
    F: FnMut(&mut f64, f64),
{
    Zip::from(&mut param.weight)
        .and(&grad.weight)
        .for_each(|p, &g| f(p, g));
    Zip::from(&mut param.bias)
        .and(&grad.bias)
        .for_each(|p, &g| f(p, g));
    Zip::from(&mut param.gamma)
        .and(&grad.gamma)
        .for_each(|p, &g| f(p, g));
    Zip::from(&mut param.beta)
        .and(&grad.beta)
        .for_each(|p, &g| f(p, g));
}

/// Apply `f(param, grad, state)` to every entry of a stage's four tensors.
pub(crate) fn update_entries_with_state<F>(
    param: &mut StageParams,
    grad: &StageParams,
    state: &mut StageParams,
    mut f: F,
) where
    F: FnMut(&mut f64, f64, &mut f64),
{
    Zip::from(&mut param.weight)
        .and(&grad.weight)
        .and(&mut state.weight)
        .for_each(|p, &g, s| f(p, g, s));
    Zip::from(&mut param.bias)
        .and(&grad.bias)
        .and(&mut state.bias)
        .for_each(|p, &g, s| f(p, g, s));
    Zip::from(&mut param.gamma)
        .and(&grad.gamma)
        .and(&mut state.gamma)
        .for_each(|p, &g, s| f(p, g, s));
    Zip::from(&mut param.beta)
        .and(&grad.beta)
        .and(&mut state.beta)
        .for_each(|p, &g, s| f(p, g, s));
}

/// Single-stage container whose gamma and beta are ones and zeros.
#[cfg(test)]
pub(crate) fn single_stage(weight: crate::tensor::Tensor, bias: crate::tensor::Tensor) -> Params {
    use crate::tensor::Vector;

    let width = weight.ncols();
    Params::new(vec![StageParams {
        weight,
        bias,
        gamma: Vector::ones(width),
        beta: Vector::zeros(width),
    }])
}
