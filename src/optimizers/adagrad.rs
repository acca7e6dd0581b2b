//! AdaGrad optimizer implementation
//!
//! AdaGrad divides each step by the root of that entry's accumulated squared
//! gradients, so frequently updated parameters take smaller steps over time.

use crate::error::Result;
use crate::optimizers::{update_entries_with_state, Optimizer, StageState};
use crate::params::{Gradients, Params};

/// Constant added to the denominator of every AdaGrad step.
pub const ADAGRAD_EPSILON: f64 = 1e-7;

/// Adaptive gradient optimizer.
///
/// The update rule is:
///
/// ```text
/// h = h + gradient²
/// parameter = parameter - η * gradient / (√h + ε)
/// ```
///
/// The history `h` starts at zero for each stage on its first update, so the
/// first step of every entry has magnitude ≈ η regardless of the gradient scale.
///
/// # Reference
///
/// Duchi, J., Hazan, E., & Singer, Y. (2011). Adaptive Subgradient Methods for
/// Online Learning and Stochastic Optimization. JMLR.
#[derive(Debug, Clone)]
pub struct AdaGrad {
    learning_rate: f64,
    epsilon: f64,
    /// Per-stage sum of squared gradients
    history: StageState,
}

impl AdaGrad {
    /// Creates an AdaGrad optimizer with ε = 1e-7.
    pub fn new(learning_rate: f64) -> Self {
        Self {
            learning_rate,
            epsilon: ADAGRAD_EPSILON,
            history: StageState::default(),
        }
    }

    pub fn epsilon(&self) -> f64 {
        self.epsilon
    }
}

impl Optimizer for AdaGrad {
    fn update(&mut self, params: &mut Params, grads: &Gradients) -> Result<()> {
        params.ensure_same_shape(grads)?;
        self.history.prepare(params, "adagrad")?;

        let (lr, eps) = (self.learning_rate, self.epsilon);
        for ((param, grad), history) in params
            .stages_mut()
            .iter_mut()
            .zip(grads.stages())
            .zip(self.history.stages_mut())
        {
            update_entries_with_state(param, grad, history, |p, g, h| {
                *h += g * g;
                *p -= lr * g / (h.sqrt() + eps);
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.history.clear();
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
