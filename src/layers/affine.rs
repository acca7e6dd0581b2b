//! Affine (fully connected) layer implementation
//!
//! This module provides the Affine layer that performs the transformation:
//! output = input × weight + bias

use crate::error::{NetError, Result};
use crate::layers::Layer;
use crate::tensor::{column_sum, matmul, Tensor};

/// Affine layer borrowing its weight and bias from the parameter container.
///
/// Performs the linear transformation: y = xW + b
/// where x is the input (batch_size × in_dim),
/// W is the weight matrix (in_dim × out_dim),
/// and b is the bias row (1 × out_dim) broadcast to every batch row.
///
/// The layer never owns parameters; it is a view built for the duration of a
/// forward or backward call.
///
/// # Example
///
/// ```
/// use multilayer_net::layers::{Affine, Layer};
/// use ndarray::array;
///
/// let weight = array![[1.0, 0.0], [0.0, 1.0]];
/// let bias = array![[0.5, -0.5]];
/// let layer = Affine::new(&weight, &bias);
///
/// let (out, _ctx) = layer.forward(&array![[1.0, 2.0]]).unwrap();
/// assert_eq!(out, array![[1.5, 1.5]]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Affine<'a> {
    weight: &'a Tensor,
    bias: &'a Tensor,
}

/// Input copy cached by [`Affine::forward`].
#[derive(Debug, Clone)]
pub struct AffineContext {
    input: Tensor,
}

/// Weight and bias gradients produced by [`Affine::backward`].
#[derive(Debug, Clone, PartialEq)]
pub struct AffineGrads {
    weight: Tensor,
    bias: Tensor,
}

impl AffineGrads {
    /// dW, shaped like the weight (in_dim × out_dim).
    pub fn weight(&self) -> &Tensor {
        &self.weight
    }

    /// dB, shaped like the bias (1 × out_dim).
    pub fn bias(&self) -> &Tensor {
        &self.bias
    }

    pub fn into_parts(self) -> (Tensor, Tensor) {
        (self.weight, self.bias)
    }
}

impl<'a> Affine<'a> {
    pub fn new(weight: &'a Tensor, bias: &'a Tensor) -> Self {
        Self { weight, bias }
    }

    /// Get the input width of the layer.
    pub fn input_size(&self) -> usize {
        self.weight.nrows()
    }

    /// Get the output width of the layer.
    pub fn output_size(&self) -> usize {
        self.weight.ncols()
    }

    fn check_bias(&self) -> Result<()> {
        if self.bias.dim() != (1, self.output_size()) {
            return Err(NetError::shape_mismatch(
                "affine.bias",
                self.bias.dim(),
                (1, self.output_size()),
            ));
        }
        Ok(())
    }
}

impl Layer for Affine<'_> {
    type Context = AffineContext;
    type Grads = AffineGrads;

    fn forward(&self, input: &Tensor) -> Result<(Tensor, AffineContext)> {
        self.check_bias()?;
        let out = matmul("affine.forward", input, self.weight)? + self.bias;
        Ok((
            out,
            AffineContext {
                input: input.clone(),
            },
        ))
    }

    /// dX = dOut·Wᵀ, dW = Xᵀ·dOut, dB = column-sum(dOut).
    fn backward(&self, ctx: AffineContext, grad_output: &Tensor) -> Result<(Tensor, AffineGrads)> {
        let expected = (ctx.input.nrows(), self.output_size());
        if grad_output.dim() != expected {
            return Err(NetError::shape_mismatch(
                "affine.backward",
                grad_output.dim(),
                expected,
            ));
        }

        let grad_input = grad_output.dot(&self.weight.t());
        let weight = ctx.input.t().dot(grad_output);
        let bias = column_sum(grad_output);

        Ok((grad_input, AffineGrads { weight, bias }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_affine_forward_broadcasts_bias() {
        let weight = array![[1.0, 2.0], [3.0, 4.0]];
        let bias = array![[10.0, 20.0]];
        let layer = Affine::new(&weight, &bias);

        let (out, _) = layer.forward(&array![[1.0, 0.0], [0.0, 1.0]]).unwrap();
        assert_eq!(out, array![[11.0, 22.0], [13.0, 24.0]]);
    }

    #[test]
    fn test_affine_backward_values() {
        let weight = array![[1.0, 2.0], [3.0, 4.0]];
        let bias = array![[0.0, 0.0]];
        let layer = Affine::new(&weight, &bias);

        let input = array![[1.0, 2.0]];
        let (_, ctx) = layer.forward(&input).unwrap();
        let (dx, grads) = layer.backward(ctx, &array![[1.0, 1.0]]).unwrap();

        assert_eq!(dx, array![[3.0, 7.0]]);
        assert_eq!(grads.weight(), &array![[1.0, 1.0], [2.0, 2.0]]);
        assert_eq!(grads.bias(), &array![[1.0, 1.0]]);
    }

    #[test]
    fn test_affine_rejects_bad_input_width() {
        let weight = Tensor::zeros((3, 2));
        let bias = Tensor::zeros((1, 2));
        let layer = Affine::new(&weight, &bias);

        let result = layer.forward(&Tensor::zeros((4, 2)));
        assert!(matches!(result, Err(NetError::ShapeMismatch { .. })));
    }

    #[test]
    fn test_affine_rejects_bad_bias() {
        let weight = Tensor::zeros((3, 2));
        let bias = Tensor::zeros((1, 3));
        let layer = Affine::new(&weight, &bias);

        let result = layer.forward(&Tensor::zeros((4, 3)));
        assert!(matches!(
            result,
            Err(NetError::ShapeMismatch { op: "affine.bias", .. })
        ));
    }

    #[test]
    fn test_affine_rejects_bad_grad_output() {
        let weight = Tensor::zeros((3, 2));
        let bias = Tensor::zeros((1, 2));
        let layer = Affine::new(&weight, &bias);

        let (_, ctx) = layer.forward(&Tensor::zeros((4, 3))).unwrap();
        let result = layer.backward(ctx, &Tensor::zeros((4, 3)));
        assert!(matches!(result, Err(NetError::ShapeMismatch { .. })));
    }
}
