//! Softmax with cross-entropy loss, the terminal layer of every network

use crate::error::{NetError, Result};
use crate::layers::LossLayer;
use crate::tensor::{ensure_rows, Tensor};
use crate::utils::activations::softmax_rows;

/// Added inside the logarithm so a zero probability cannot produce -inf.
pub const CROSS_ENTROPY_DELTA: f64 = 1e-7;

/// Mean cross-entropy of probabilities `y` against one-hot `targets`.
///
/// Rows without a 1.0 contribute nothing to the sum but still count toward the
/// batch size.
pub fn cross_entropy_error(y: &Tensor, targets: &Tensor) -> Result<f64> {
    if y.dim() != targets.dim() {
        return Err(NetError::shape_mismatch("cross_entropy", y.dim(), targets.dim()));
    }
    let batch_size = ensure_rows("cross_entropy", y)? as f64;

    let sum: f64 = y
        .iter()
        .zip(targets.iter())
        .filter(|&(_, &t)| t == 1.0)
        .map(|(&p, _)| (p + CROSS_ENTROPY_DELTA).ln())
        .sum();

    Ok(-sum / batch_size)
}

/// Row-wise softmax followed by mean cross-entropy.
///
/// Forward takes scores and one-hot targets and returns a scalar; backward takes
/// a scalar seed and returns dL/d(scores) = (y - t) / batch_size. The seed is
/// only a placeholder for chain-rule symmetry: its value is not applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct SoftmaxCrossEntropy;

/// Softmax output and targets from the forward pass.
#[derive(Debug, Clone)]
pub struct SoftmaxContext {
    probabilities: Tensor,
    targets: Tensor,
}

impl SoftmaxContext {
    /// Softmax of the scores seen by the forward pass.
    pub fn probabilities(&self) -> &Tensor {
        &self.probabilities
    }
}

impl LossLayer for SoftmaxCrossEntropy {
    type Context = SoftmaxContext;

    fn forward(&self, scores: &Tensor, targets: &Tensor) -> Result<(f64, SoftmaxContext)> {
        let probabilities = softmax_rows(scores);
        let loss = cross_entropy_error(&probabilities, targets)?;
        Ok((
            loss,
            SoftmaxContext {
                probabilities,
                targets: targets.clone(),
            },
        ))
    }

    fn backward(&self, ctx: SoftmaxContext, _dout: f64) -> Tensor {
        let batch_size = ctx.probabilities.nrows() as f64;
        (ctx.probabilities - &ctx.targets) / batch_size
    }
}
