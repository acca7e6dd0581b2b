//! Random mini-batch selection.

use ndarray::Axis;
use rand::seq::index;
use rand::Rng;

use crate::error::{NetError, Result};
use crate::tensor::Tensor;

/// Pick `batch_size` distinct rows from a data/label pair.
///
/// Rows are drawn without replacement in random order. When the dataset has
/// fewer rows than requested, the whole dataset is returned (shuffled).
///
/// # Errors
///
/// `ShapeMismatch` when `data` and `labels` have different row counts.
pub fn sample_batch<R: Rng + ?Sized>(
    data: &Tensor,
    labels: &Tensor,
    batch_size: usize,
    rng: &mut R,
) -> Result<(Tensor, Tensor)> {
    if data.nrows() != labels.nrows() {
        return Err(NetError::shape_mismatch(
            "sample_batch",
            data.dim(),
            labels.dim(),
        ));
    }

    let size = batch_size.min(data.nrows());
    let rows = index::sample(rng, data.nrows(), size).into_vec();

    Ok((data.select(Axis(0), &rows), labels.select(Axis(0), &rows)))
}
