//! Activation layers: Sigmoid, ReLU and Identity
//!
//! Each activation is a zero-sized, parameter-free [`Layer`]. The [`Activation`]
//! enum is the closed set a network stage can hold; it dispatches to the
//! concrete layer and wraps the concrete context in [`ActivationContext`].

use ndarray::{Array2, Zip};
use serde::Deserialize;

use crate::error::{NetError, Result};
use crate::layers::Layer;
use crate::tensor::{ensure_same_shape, Tensor};
use crate::utils::activations::{sigmoid, sigmoid_derivative};

/// Activation selector used when building a network.
///
/// The final stage always uses [`Activation::Identity`] regardless of this
/// choice, so raw scores reach the loss layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivationKind {
    Sigmoid,
    #[default]
    Relu,
}

/// Elementwise logistic function y = 1 / (1 + e^-x).
#[derive(Debug, Clone, Copy, Default)]
pub struct Sigmoid;

/// Sigmoid output cached for the backward pass.
#[derive(Debug, Clone)]
pub struct SigmoidContext {
    output: Tensor,
}

impl Layer for Sigmoid {
    type Context = SigmoidContext;
    type Grads = ();

    fn forward(&self, input: &Tensor) -> Result<(Tensor, SigmoidContext)> {
        let output = input.mapv(sigmoid);
        Ok((output.clone(), SigmoidContext { output }))
    }

    fn backward(&self, ctx: SigmoidContext, grad_output: &Tensor) -> Result<(Tensor, ())> {
        ensure_same_shape("sigmoid.backward", grad_output, &ctx.output)?;
        let mut grad_input = grad_output.clone();
        Zip::from(&mut grad_input)
            .and(&ctx.output)
            .for_each(|g, &y| *g *= sigmoid_derivative(y));
        Ok((grad_input, ()))
    }
}

/// Rectified linear unit y = max(x, 0).
#[derive(Debug, Clone, Copy, Default)]
pub struct Relu;

/// Mask of strictly positive inputs from the forward pass.
#[derive(Debug, Clone)]
pub struct ReluContext {
    mask: Array2<bool>,
}

impl ReluContext {
    /// `true` where the forward input was > 0.
    pub fn mask(&self) -> &Array2<bool> {
        &self.mask
    }
}

impl Layer for Relu {
    type Context = ReluContext;
    type Grads = ();

    fn forward(&self, input: &Tensor) -> Result<(Tensor, ReluContext)> {
        let mask = input.mapv(|v| v > 0.0);
        let output = input.mapv(|v| if v > 0.0 { v } else { 0.0 });
        Ok((output, ReluContext { mask }))
    }

    fn backward(&self, ctx: ReluContext, grad_output: &Tensor) -> Result<(Tensor, ())> {
        if grad_output.dim() != ctx.mask.dim() {
            return Err(NetError::shape_mismatch(
                "relu.backward",
                grad_output.dim(),
                ctx.mask.dim(),
            ));
        }
        let mut grad_input = grad_output.clone();
        Zip::from(&mut grad_input)
            .and(&ctx.mask)
            .for_each(|g, &keep| {
                if !keep {
                    *g = 0.0;
                }
            });
        Ok((grad_input, ()))
    }
}

/// Pass-through layer used as the last stage's activation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl Layer for Identity {
    type Context = ();
    type Grads = ();

    fn forward(&self, input: &Tensor) -> Result<(Tensor, ())> {
        Ok((input.clone(), ()))
    }

    fn backward(&self, _ctx: (), grad_output: &Tensor) -> Result<(Tensor, ())> {
        Ok((grad_output.clone(), ()))
    }
}

/// Closed set of activations a network stage can use.
#[derive(Debug, Clone, Copy)]
pub enum Activation {
    Sigmoid(Sigmoid),
    Relu(Relu),
    Identity(Identity),
}

/// Backward context of whichever activation ran.
#[derive(Debug, Clone)]
pub enum ActivationContext {
    Sigmoid(SigmoidContext),
    Relu(ReluContext),
    Identity,
}

impl Activation {
    /// Layer for a hidden stage chosen by `kind`.
    pub fn from_kind(kind: ActivationKind) -> Self {
        match kind {
            ActivationKind::Sigmoid => Activation::Sigmoid(Sigmoid),
            ActivationKind::Relu => Activation::Relu(Relu),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Activation::Sigmoid(_) => "sigmoid",
            Activation::Relu(_) => "relu",
            Activation::Identity(_) => "identity",
        }
    }
}

impl Layer for Activation {
    type Context = ActivationContext;
    type Grads = ();

    fn forward(&self, input: &Tensor) -> Result<(Tensor, ActivationContext)> {
        match self {
            Activation::Sigmoid(layer) => {
                let (out, ctx) = layer.forward(input)?;
                Ok((out, ActivationContext::Sigmoid(ctx)))
            }
            Activation::Relu(layer) => {
                let (out, ctx) = layer.forward(input)?;
                Ok((out, ActivationContext::Relu(ctx)))
            }
            Activation::Identity(layer) => {
                let (out, ()) = layer.forward(input)?;
                Ok((out, ActivationContext::Identity))
            }
        }
    }

    fn backward(&self, ctx: ActivationContext, grad_output: &Tensor) -> Result<(Tensor, ())> {
        match (self, ctx) {
            (Activation::Sigmoid(layer), ActivationContext::Sigmoid(ctx)) => {
                layer.backward(ctx, grad_output)
            }
            (Activation::Relu(layer), ActivationContext::Relu(ctx)) => {
                layer.backward(ctx, grad_output)
            }
            (Activation::Identity(layer), ActivationContext::Identity) => {
                layer.backward((), grad_output)
            }
            _ => Err(NetError::ContextMismatch { layer: self.name() }),
        }
    }
}
