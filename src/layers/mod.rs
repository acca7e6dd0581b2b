//! Layer abstractions for neural networks
//!
//! This module provides the Layer traits and implementations for every unit the
//! engine is assembled from: the Affine transform, activations, normalizations,
//! the softmax/cross-entropy loss and generic two-input combinators.

mod r#trait;
pub mod activations;
pub mod affine;
pub mod batchnorm;
pub mod combinators;
pub mod normalization;
pub mod softmax_loss;

// Re-export the layer traits and types for convenience
pub use r#trait::{Combinator, Layer, LossLayer};
pub use activations::{Activation, ActivationContext, ActivationKind, Identity, Relu, Sigmoid};
pub use affine::{Affine, AffineContext, AffineGrads};
pub use batchnorm::{BatchNorm, BatchNormContext, NormGrads};
pub use combinators::{AddLayer, ElemMulLayer, MatMulLayer};
pub use normalization::{NoNorm, Normalization, NormalizationContext, NormalizationKind};
pub use softmax_loss::{SoftmaxContext, SoftmaxCrossEntropy};
