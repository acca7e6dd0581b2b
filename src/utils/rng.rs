//! Seeded random number generation.
//!
//! Every random draw in the crate goes through an explicit generator handle so
//! runs can be reproduced by pinning the seed.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use crate::tensor::Tensor;

/// Create a deterministic generator from an explicit seed.
pub fn seeded_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

/// Create a generator seeded from the operating system, for unpinned runs.
pub fn entropy_rng() -> StdRng {
    StdRng::from_entropy()
}

/// `rows × cols` tensor of independent N(0, 1) draws multiplied by `std`.
pub fn normal_tensor<R: Rng + ?Sized>(rows: usize, cols: usize, std: f64, rng: &mut R) -> Tensor {
    Tensor::from_shape_simple_fn((rows, cols), || rng.sample::<f64, _>(StandardNormal) * std)
}
