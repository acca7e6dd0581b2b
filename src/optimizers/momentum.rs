//! Momentum SGD optimizer implementation

use crate::error::Result;
use crate::optimizers::{update_entries_with_state, Optimizer, StageState};
use crate::params::{Gradients, Params};

/// Gradient descent with a velocity term.
///
/// The update rule is:
///
/// ```text
/// v = μ * v - η * gradient
/// parameter = parameter + v
/// ```
///
/// where μ (mu) is the momentum coefficient and η the learning rate. The
/// velocity starts at zero for each stage on its first update.
///
/// # Example
///
/// ```ignore
/// use multilayer_net::optimizers::{Momentum, Optimizer};
///
/// let mut optimizer = Momentum::new(0.1, 0.9);
/// optimizer.update(net.params_mut(), &grads)?;
/// ```
#[derive(Debug, Clone)]
pub struct Momentum {
    learning_rate: f64,
    momentum: f64,
    /// Per-stage velocity, same layout as the parameters
    velocity: StageState,
}

impl Momentum {
    /// Creates a Momentum optimizer.
    ///
    /// # Arguments
    ///
    /// * `learning_rate` - Step size η
    /// * `momentum` - Velocity decay μ, typically 0.9
    pub fn new(learning_rate: f64, momentum: f64) -> Self {
        Self {
            learning_rate,
            momentum,
            velocity: StageState::default(),
        }
    }

    pub fn momentum(&self) -> f64 {
        self.momentum
    }
}

impl Optimizer for Momentum {
    fn update(&mut self, params: &mut Params, grads: &Gradients) -> Result<()> {
        params.ensure_same_shape(grads)?;
        self.velocity.prepare(params, "momentum")?;

        let (lr, mu) = (self.learning_rate, self.momentum);
        for ((param, grad), velocity) in params
            .stages_mut()
            .iter_mut()
            .zip(grads.stages())
            .zip(self.velocity.stages_mut())
        {
            update_entries_with_state(param, grad, velocity, |p, g, v| {
                *v = mu * *v - lr * g;
                *p += *v;
            });
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.velocity.clear();
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }

    fn set_learning_rate(&mut self, lr: f64) {
        self.learning_rate = lr;
    }
}
