//! Stochastic Gradient Descent (SGD) optimizer implementation
//!
//! This module provides a vanilla SGD optimizer that performs the basic
//! gradient descent update: `parameter = parameter - learning_rate * gradient`

use crate::error::Result;
use crate::optimizers::{update_entries, Optimizer};
use crate::params::{Gradients, Params};

/// Stochastic Gradient Descent optimizer.
///
/// Implements the basic gradient descent update rule without momentum or
/// adaptive learning rates:
///
/// `w = w - η * ∇L/∂w`
///
/// where w is the parameter, η (eta) is the learning rate, and ∇L/∂w is the gradient.
///
/// # Example
///
/// ```
/// use multilayer_net::optimizers::{Optimizer, SGD};
/// use multilayer_net::params::{Params, StageParams};
/// use ndarray::{array, Array1};
///
/// let stage = StageParams {
///     weight: array![[1.0, 1.0]],
///     bias: array![[0.0, 0.0]],
///     gamma: Array1::ones(2),
///     beta: Array1::zeros(2),
/// };
/// let mut params = Params::new(vec![stage]);
/// let mut grads = params.zeros_like();
/// grads.stage_mut(0).unwrap().weight.fill(1.0);
///
/// let mut optimizer = SGD::new(0.1);
/// optimizer.update(&mut params, &grads).unwrap();
/// assert!((params.stage(0).unwrap().weight[[0, 0]] - 0.9).abs() < 1e-12);
/// ```
#[derive(Debug, Clone)]
pub struct SGD {
    learning_rate: f64,
}

impl SGD {
    /// Creates a new SGD optimizer with the specified learning rate.
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - The step size for parameter updates (must be positive)
    ///
    /// # Typical Values
    ///
    /// Common learning rates range from 0.001 to 0.1, depending on the problem.
    pub fn new(learning_rate: f64) -> Self {
        Self { learning_rate }
    }
}

impl Optimizer for SGD {
    /// Applies `parameter -= learning_rate * gradient` to every entry.
    fn update(&mut self, params: &mut Params, grads: &Gradients) -> Result<()> {
        params.ensure_same_shape(grads)?;

        let lr = self.learning_rate;
        for (param, grad) in params.stages_mut().iter_mut().zip(grads.stages()) {
            update_entries(param, grad, |p, g| *p -= lr * g);
        }
        Ok(())
    }

    fn reset(&mut self) {
        // Vanilla SGD has no state to reset
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
