//! Normalization stage: batch normalization or a pass-through

use serde::Deserialize;

use crate::error::{NetError, Result};
use crate::layers::batchnorm::{BatchNorm, BatchNormContext, NormGrads};
use crate::layers::Layer;
use crate::tensor::{Tensor, Vector};

/// Normalization selector used when building a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NormalizationKind {
    BatchNorm,
    #[default]
    NoNorm,
}

/// Pass-through normalization. Gamma and beta exist for every stage, but this
/// layer never reads them.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNorm;

impl NoNorm {
    pub fn new(_gamma: &Vector, _beta: &Vector) -> Self {
        NoNorm
    }
}

impl Layer for NoNorm {
    type Context = ();
    type Grads = ();

    fn forward(&self, input: &Tensor) -> Result<(Tensor, ())> {
        Ok((input.clone(), ()))
    }

    fn backward(&self, _ctx: (), grad_output: &Tensor) -> Result<(Tensor, ())> {
        Ok((grad_output.clone(), ()))
    }
}

/// Closed set of normalization layers a stage can use.
#[derive(Debug, Clone, Copy)]
pub enum Normalization<'a> {
    BatchNorm(BatchNorm<'a>),
    NoNorm(NoNorm),
}

#[derive(Debug, Clone)]
pub enum NormalizationContext {
    BatchNorm(BatchNormContext),
    NoNorm,
}

impl<'a> Normalization<'a> {
    /// Build the layer selected by `kind` over a stage's gamma and beta.
    pub fn new(kind: NormalizationKind, gamma: &'a Vector, beta: &'a Vector) -> Self {
        match kind {
            NormalizationKind::BatchNorm => Normalization::BatchNorm(BatchNorm::new(gamma, beta)),
            NormalizationKind::NoNorm => Normalization::NoNorm(NoNorm::new(gamma, beta)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Normalization::BatchNorm(_) => "batch_norm",
            Normalization::NoNorm(_) => "no_norm",
        }
    }
}

impl Layer for Normalization<'_> {
    type Context = NormalizationContext;
    /// NoNorm reports zero gradients so every stage yields gamma/beta gradients.
    type Grads = NormGrads;

    fn forward(&self, input: &Tensor) -> Result<(Tensor, NormalizationContext)> {
        match self {
            Normalization::BatchNorm(layer) => {
                let (out, ctx) = layer.forward(input)?;
                Ok((out, NormalizationContext::BatchNorm(ctx)))
            }
            Normalization::NoNorm(layer) => {
                let (out, ()) = layer.forward(input)?;
                Ok((out, NormalizationContext::NoNorm))
            }
        }
    }

    fn backward(
        &self,
        ctx: NormalizationContext,
        grad_output: &Tensor,
    ) -> Result<(Tensor, NormGrads)> {
        match (self, ctx) {
            (Normalization::BatchNorm(layer), NormalizationContext::BatchNorm(ctx)) => {
                layer.backward(ctx, grad_output)
            }
            (Normalization::NoNorm(layer), NormalizationContext::NoNorm) => {
                let (grad_input, ()) = layer.backward((), grad_output)?;
                Ok((grad_input, NormGrads::zeros(grad_output.ncols())))
            }
            _ => Err(NetError::ContextMismatch { layer: self.name() }),
        }
    }
}
