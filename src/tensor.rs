//! Dense 2-D tensors and the shape-checked primitives the layers share
//!
//! All layer inputs and outputs are `rows × cols` matrices where rows index the
//! batch and cols index features. Gamma/beta and other per-feature quantities
//! are 1-D [`Vector`]s that broadcast across rows.

use ndarray::{Array, Array1, Array2, ArrayBase, ArrayView1, Axis, Data, Dimension, Ix2};

use crate::error::{NetError, Result};

/// Batch-major matrix: rows = batch size, cols = feature width.
pub type Tensor = Array2<f64>;

/// Per-feature vector (gamma, beta and their gradients).
pub type Vector = Array1<f64>;

/// Collapse an ndarray shape into the `(rows, cols)` pair used in error reports.
///
/// Vectors are reported as a single row.
pub fn shape_pair(shape: &[usize]) -> (usize, usize) {
    match shape {
        [] => (1, 1),
        [n] => (1, *n),
        [r, c, ..] => (*r, *c),
    }
}

/// Fail with [`NetError::ShapeMismatch`] unless both arrays have identical shapes.
pub fn ensure_same_shape<D: Dimension>(
    op: &'static str,
    left: &Array<f64, D>,
    right: &Array<f64, D>,
) -> Result<()> {
    if left.shape() == right.shape() {
        Ok(())
    } else {
        Err(NetError::shape_mismatch(
            op,
            shape_pair(left.shape()),
            shape_pair(right.shape()),
        ))
    }
}

/// Fail with [`NetError::EmptyBatch`] when `t` has no rows; otherwise return the row count.
pub fn ensure_rows(op: &'static str, t: &Tensor) -> Result<usize> {
    match t.nrows() {
        0 => Err(NetError::EmptyBatch { op }),
        rows => Ok(rows),
    }
}

/// Matrix product `left · right` with the inner dimensions checked first.
pub fn matmul<S1, S2>(
    op: &'static str,
    left: &ArrayBase<S1, Ix2>,
    right: &ArrayBase<S2, Ix2>,
) -> Result<Tensor>
where
    S1: Data<Elem = f64>,
    S2: Data<Elem = f64>,
{
    if left.ncols() != right.nrows() {
        return Err(NetError::shape_mismatch(op, left.dim(), right.dim()));
    }
    Ok(left.dot(right))
}

/// Sum over the batch axis, kept as a `(1, cols)` row so it lines up with a bias.
pub fn column_sum(t: &Tensor) -> Tensor {
    t.sum_axis(Axis(0)).insert_axis(Axis(0))
}

/// Index of the largest entry; the first one wins on ties, 0 for an empty row.
pub fn argmax(row: ArrayView1<'_, f64>) -> usize {
    let mut best = 0;
    for (i, &value) in row.iter().enumerate() {
        if value > row[best] {
            best = i;
        }
    }
    best
}
