//! Layer trait definitions for differentiable computation units
//!
//! This module defines the three contracts the engine is built from: [`Layer`]
//! for single-input units, [`LossLayer`] for the terminal scalar loss and
//! [`Combinator`] for two-input building blocks.
//!
//! Layers hold no per-call state. `forward` returns the output together with a
//! backward context, and `backward` consumes that context by value, so a context
//! is used exactly once and two forward passes can never overwrite each other.

use crate::error::Result;
use crate::tensor::Tensor;

/// Core trait for single-input differentiable layers.
///
/// All stage layers (Affine, activations, normalizations) implement this trait
/// to provide a uniform forward/backward interface.
///
/// # Example
///
/// ```ignore
/// // Forward pass keeps whatever the backward pass will need
/// let (output, ctx) = layer.forward(&input)?;
///
/// // Backward pass turns dL/d(output) into dL/d(input) plus parameter gradients
/// let (grad_input, grads) = layer.backward(ctx, &grad_output)?;
/// ```
pub trait Layer {
    /// Values cached by `forward` for the matching `backward` call.
    type Context;

    /// Parameter gradients emitted by `backward` (`()` for parameter-free layers).
    type Grads;

    /// Forward propagation through the layer.
    ///
    /// # Arguments
    ///
    /// * `input` - Batch of inputs (batch_size × input width)
    ///
    /// # Errors
    ///
    /// Returns `ShapeMismatch` when `input` is incompatible with the layer.
    fn forward(&self, input: &Tensor) -> Result<(Tensor, Self::Context)>;

    /// Backward propagation through the layer.
    ///
    /// # Arguments
    ///
    /// * `ctx` - Context returned by the corresponding `forward` call
    /// * `grad_output` - Gradient of the loss with respect to the layer output
    ///
    /// # Returns
    ///
    /// Gradient with respect to the layer input and the parameter gradients.
    fn backward(&self, ctx: Self::Context, grad_output: &Tensor) -> Result<(Tensor, Self::Grads)>;
}

/// Terminal layer that reduces predictions and targets to a scalar loss.
pub trait LossLayer {
    /// Values cached by `forward` for the matching `backward` call.
    type Context;

    /// Compute the scalar loss of `scores` against one-hot `targets`.
    fn forward(&self, scores: &Tensor, targets: &Tensor) -> Result<(f64, Self::Context)>;

    /// Gradient of the loss with respect to `scores`, seeded with `dout`.
    fn backward(&self, ctx: Self::Context, dout: f64) -> Tensor;
}

/// Two-input building block for graphs beyond the fixed stage stack.
pub trait Combinator {
    /// Values cached by `forward` for the matching `backward` call.
    type Context;

    /// Combine `x` and `y` into a single output.
    fn forward(&self, x: &Tensor, y: &Tensor) -> Result<(Tensor, Self::Context)>;

    /// Distribute `grad_output` to both inputs, returning `(dx, dy)`.
    fn backward(&self, ctx: Self::Context, grad_output: &Tensor) -> Result<(Tensor, Tensor)>;
}
