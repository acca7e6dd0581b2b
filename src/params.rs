//! Parameter and gradient containers
//!
//! [`Params`] is the single authoritative store of every stage's weight, bias,
//! gamma and beta. Layers borrow from it during a call; only optimizers (and the
//! network's finite-difference check, which restores what it touches) write to it.
//! Gradients use the same layout, so [`Gradients`] is an alias.

use rand::Rng;

use crate::error::{NetError, Result};
use crate::tensor::{ensure_same_shape, Tensor, Vector};
use crate::utils::rng::normal_tensor;

/// Parameters of one (Affine, Activation, Normalization) stage.
#[derive(Debug, Clone, PartialEq)]
pub struct StageParams {
    /// Weight matrix (in_dim × out_dim)
    pub weight: Tensor,
    /// Bias row (1 × out_dim), broadcast over the batch
    pub bias: Tensor,
    /// Normalization scale, length out_dim
    pub gamma: Vector,
    /// Normalization shift, length out_dim
    pub beta: Vector,
}

impl StageParams {
    /// Gaussian weight and bias scaled by `init_std`; gamma ones, beta zeros.
    pub fn random<R: Rng + ?Sized>(
        input_size: usize,
        output_size: usize,
        init_std: f64,
        rng: &mut R,
    ) -> Self {
        let weight = normal_tensor(input_size, output_size, init_std, rng);
        let bias = normal_tensor(1, output_size, init_std, rng);
        Self {
            weight,
            bias,
            gamma: Vector::ones(output_size),
            beta: Vector::zeros(output_size),
        }
    }

    /// All-zero buffers with this stage's shapes.
    pub fn zeros_like(&self) -> Self {
        Self {
            weight: Tensor::zeros(self.weight.raw_dim()),
            bias: Tensor::zeros(self.bias.raw_dim()),
            gamma: Vector::zeros(self.gamma.raw_dim()),
            beta: Vector::zeros(self.beta.raw_dim()),
        }
    }

    pub fn input_size(&self) -> usize {
        self.weight.nrows()
    }

    pub fn output_size(&self) -> usize {
        self.weight.ncols()
    }

    /// Check that every tensor matches `other` in shape.
    pub fn ensure_same_shape(&self, other: &StageParams) -> Result<()> {
        ensure_same_shape("params.weight", &self.weight, &other.weight)?;
        ensure_same_shape("params.bias", &self.bias, &other.bias)?;
        ensure_same_shape("params.gamma", &self.gamma, &other.gamma)?;
        ensure_same_shape("params.beta", &self.beta, &other.beta)
    }

    pub fn parameter_count(&self) -> usize {
        self.weight.len() + self.bias.len() + self.gamma.len() + self.beta.len()
    }
}

/// Per-stage parameters of a whole network, in forward order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Params {
    stages: Vec<StageParams>,
}

/// Parameter gradients mirror the parameter layout.
pub type Gradients = Params;

impl Params {
    pub fn new(stages: Vec<StageParams>) -> Self {
        Self { stages }
    }

    /// Number of stages.
    pub fn depth(&self) -> usize {
        self.stages.len()
    }

    pub fn stage(&self, index: usize) -> Option<&StageParams> {
        self.stages.get(index)
    }

    pub fn stage_mut(&mut self, index: usize) -> Option<&mut StageParams> {
        self.stages.get_mut(index)
    }

    pub fn stages(&self) -> &[StageParams] {
        &self.stages
    }

    pub fn stages_mut(&mut self) -> &mut [StageParams] {
        &mut self.stages
    }

    pub fn zeros_like(&self) -> Self {
        Self {
            stages: self.stages.iter().map(StageParams::zeros_like).collect(),
        }
    }

    /// Check stage count and every tensor shape against `other`.
    pub fn ensure_same_shape(&self, other: &Params) -> Result<()> {
        if self.depth() != other.depth() {
            return Err(NetError::shape_mismatch(
                "params.depth",
                (self.depth(), 0),
                (other.depth(), 0),
            ));
        }
        self.stages
            .iter()
            .zip(other.stages.iter())
            .try_for_each(|(a, b)| a.ensure_same_shape(b))
    }

    /// Total number of scalar parameters, gamma and beta included.
    pub fn parameter_count(&self) -> usize {
        self.stages.iter().map(StageParams::parameter_count).sum()
    }
}

impl FromIterator<StageParams> for Params {
    fn from_iter<I: IntoIterator<Item = StageParams>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}
