//! Two-input combinators: elementwise addition, matrix product and elementwise product
//!
//! These are not used by the fixed stage stack; they let callers assemble
//! custom graphs while keeping the same forward/backward discipline.

use crate::error::Result;
use crate::layers::Combinator;
use crate::tensor::{ensure_same_shape, matmul, Tensor};

/// out = x + y for equally shaped inputs.
#[derive(Debug, Clone, Copy, Default)]
pub struct AddLayer;

impl Combinator for AddLayer {
    type Context = ();

    fn forward(&self, x: &Tensor, y: &Tensor) -> Result<(Tensor, ())> {
        ensure_same_shape("add.forward", x, y)?;
        Ok((x + y, ()))
    }

    /// Sum rule: both inputs receive the upstream gradient unchanged.
    fn backward(&self, _ctx: (), grad_output: &Tensor) -> Result<(Tensor, Tensor)> {
        Ok((grad_output.clone(), grad_output.clone()))
    }
}

/// out = x · y (matrix product).
#[derive(Debug, Clone, Copy, Default)]
pub struct MatMulLayer;

/// Both operands of a product, kept for the backward pass.
#[derive(Debug, Clone)]
pub struct ProductContext {
    x: Tensor,
    y: Tensor,
}

impl Combinator for MatMulLayer {
    type Context = ProductContext;

    fn forward(&self, x: &Tensor, y: &Tensor) -> Result<(Tensor, ProductContext)> {
        let out = matmul("matmul.forward", x, y)?;
        Ok((
            out,
            ProductContext {
                x: x.clone(),
                y: y.clone(),
            },
        ))
    }

    /// dx = dout · yᵀ, dy = xᵀ · dout.
    fn backward(&self, ctx: ProductContext, grad_output: &Tensor) -> Result<(Tensor, Tensor)> {
        let dx = matmul("matmul.backward", grad_output, &ctx.y.t())?;
        let dy = matmul("matmul.backward", &ctx.x.t(), grad_output)?;
        Ok((dx, dy))
    }
}

/// out = x ⊙ y (elementwise product).
#[derive(Debug, Clone, Copy, Default)]
pub struct ElemMulLayer;

impl Combinator for ElemMulLayer {
    type Context = ProductContext;

    fn forward(&self, x: &Tensor, y: &Tensor) -> Result<(Tensor, ProductContext)> {
        ensure_same_shape("elem_mul.forward", x, y)?;
        Ok((
            x * y,
            ProductContext {
                x: x.clone(),
                y: y.clone(),
            },
        ))
    }

    /// dx = dout ⊙ y, dy = dout ⊙ x.
    fn backward(&self, ctx: ProductContext, grad_output: &Tensor) -> Result<(Tensor, Tensor)> {
        ensure_same_shape("elem_mul.backward", grad_output, &ctx.x)?;
        Ok((grad_output * &ctx.y, grad_output * &ctx.x))
    }
}
