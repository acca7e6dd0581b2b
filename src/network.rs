//! Multi-stage feed-forward network
//!
//! A network is a stack of stages, each one `Affine → Activation → Normalization`,
//! followed by the softmax/cross-entropy loss. The last stage's activation is
//! always [`Identity`] so raw scores reach the loss.
//!
//! Parameters live in one [`Params`] container. Every call builds borrowed layer
//! views over it, runs forward while collecting per-stage contexts, and (for
//! [`MultiLayerNet::gradient`]) consumes those contexts in reverse order.

use rand::Rng;
use tracing::debug;

use crate::architecture::ArchitectureConfig;
use crate::error::{NetError, Result};
use crate::layers::{
    Activation, ActivationContext, ActivationKind, Affine, AffineContext, Identity, Layer,
    LossLayer, Normalization, NormalizationContext, NormalizationKind, SoftmaxCrossEntropy,
};
use crate::params::{Gradients, Params, StageParams};
use crate::tensor::{argmax, ensure_rows, Tensor};

/// Step used by [`MultiLayerNet::numerical_gradient`].
pub const NUMERICAL_GRADIENT_STEP: f64 = 1e-4;

/// Backward contexts of one stage, in forward order.
struct StageContext {
    affine: AffineContext,
    activation: ActivationContext,
    normalization: NormalizationContext,
}

/// Location of a single scalar inside a stage's parameters.
#[derive(Debug, Clone, Copy)]
enum Entry {
    Weight(usize, usize),
    Bias(usize),
    Gamma(usize),
    Beta(usize),
}

impl Entry {
    fn get_mut(self, stage: &mut StageParams) -> &mut f64 {
        match self {
            Entry::Weight(i, j) => &mut stage.weight[[i, j]],
            Entry::Bias(j) => &mut stage.bias[[0, j]],
            Entry::Gamma(j) => &mut stage.gamma[j],
            Entry::Beta(j) => &mut stage.beta[j],
        }
    }
}

/// Feed-forward classifier of arbitrary depth.
///
/// # Example
///
/// ```
/// use multilayer_net::architecture::ArchitectureConfig;
/// use multilayer_net::network::MultiLayerNet;
/// use multilayer_net::utils::seeded_rng;
/// use ndarray::array;
///
/// let mut rng = seeded_rng(42);
/// let config = ArchitectureConfig::new(vec![2, 4, 2]);
/// let net = MultiLayerNet::new(&config, &mut rng).unwrap();
///
/// let scores = net.predict(&array![[0.1, 0.9]]).unwrap();
/// assert_eq!(scores.dim(), (1, 2));
/// assert_eq!(net.depth(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct MultiLayerNet {
    params: Params,
    layer_widths: Vec<usize>,
    activations: Vec<Activation>,
    normalization: NormalizationKind,
    loss_layer: SoftmaxCrossEntropy,
}

impl MultiLayerNet {
    /// Build a network from an architecture configuration.
    ///
    /// Each stage's weight and bias are drawn from N(0, 1) scaled by
    /// `weight_init_std`; gamma starts at ones and beta at zeros.
    ///
    /// # Errors
    ///
    /// `InvalidTopology` when the depth is below 1, when too few widths are
    /// given for the depth, or when a width is zero.
    pub fn new<R: Rng + ?Sized>(config: &ArchitectureConfig, rng: &mut R) -> Result<Self> {
        let layer_widths = config.validate()?.to_vec();
        let depth = layer_widths.len() - 1;

        let params: Params = layer_widths
            .windows(2)
            .map(|pair| StageParams::random(pair[0], pair[1], config.weight_init_std, &mut *rng))
            .collect();

        let activations = (0..depth)
            .map(|d| {
                if d + 1 == depth {
                    Activation::Identity(Identity)
                } else {
                    Activation::from_kind(config.activation)
                }
            })
            .collect();

        debug!(
            depth,
            widths = ?layer_widths,
            activation = ?config.activation,
            normalization = ?config.normalization,
            parameters = params.parameter_count(),
            "network constructed"
        );

        Ok(Self {
            params,
            layer_widths,
            activations,
            normalization: config.normalization,
            loss_layer: SoftmaxCrossEntropy,
        })
    }

    /// Shorthand for [`MultiLayerNet::new`] without an intermediate config value.
    pub fn from_widths<R: Rng + ?Sized>(
        layer_widths: &[usize],
        weight_init_std: f64,
        activation: ActivationKind,
        normalization: NormalizationKind,
        rng: &mut R,
    ) -> Result<Self> {
        let config = ArchitectureConfig::new(layer_widths.to_vec())
            .with_weight_init_std(weight_init_std)
            .with_activation(activation)
            .with_normalization(normalization);
        Self::new(&config, rng)
    }

    /// Number of stages.
    pub fn depth(&self) -> usize {
        self.params.depth()
    }

    /// Input width, hidden widths and output width.
    pub fn layer_widths(&self) -> &[usize] {
        &self.layer_widths
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn params_mut(&mut self) -> &mut Params {
        &mut self.params
    }

    /// Activation of stage `d`, if it exists.
    pub fn activation(&self, d: usize) -> Option<&Activation> {
        self.activations.get(d)
    }

    pub fn normalization(&self) -> NormalizationKind {
        self.normalization
    }

    fn normalization_layer<'a>(&self, stage: &'a StageParams) -> Normalization<'a> {
        Normalization::new(self.normalization, &stage.gamma, &stage.beta)
    }

    fn forward(&self, x: &Tensor) -> Result<(Tensor, Vec<StageContext>)> {
        let mut contexts = Vec::with_capacity(self.depth());
        let mut hidden = x.clone();

        for (stage, activation) in self.params.stages().iter().zip(&self.activations) {
            let (a, affine) = Affine::new(&stage.weight, &stage.bias).forward(&hidden)?;
            let (z, activation) = activation.forward(&a)?;
            let (out, normalization) = self.normalization_layer(stage).forward(&z)?;
            contexts.push(StageContext {
                affine,
                activation,
                normalization,
            });
            hidden = out;
        }

        Ok((hidden, contexts))
    }

    /// Scores of the last stage for a batch `x` (no softmax applied).
    pub fn predict(&self, x: &Tensor) -> Result<Tensor> {
        self.forward(x).map(|(scores, _)| scores)
    }

    /// Mean cross-entropy of the network on `x` against one-hot targets `t`.
    pub fn loss(&self, x: &Tensor, t: &Tensor) -> Result<f64> {
        let scores = self.predict(x)?;
        self.loss_layer.forward(&scores, t).map(|(loss, _)| loss)
    }

    /// Fraction of rows whose highest score lands on the target's 1.0.
    ///
    /// Ties are broken toward the first column.
    pub fn accuracy(&self, x: &Tensor, t: &Tensor) -> Result<f64> {
        let y = self.predict(x)?;
        if y.dim() != t.dim() {
            return Err(NetError::shape_mismatch("accuracy", y.dim(), t.dim()));
        }
        let rows = ensure_rows("accuracy", &y)?;

        let hits = y
            .rows()
            .into_iter()
            .zip(t.rows())
            .filter(|(y_row, t_row)| t_row[argmax(y_row.view())] == 1.0)
            .count();

        Ok(hits as f64 / rows as f64)
    }

    /// Analytic gradient of the loss with respect to every parameter.
    ///
    /// Runs a fresh forward pass, seeds the loss layer with 1.0 and walks the
    /// stages in reverse. Stages without batch normalization report zero gamma
    /// and beta gradients.
    pub fn gradient(&self, x: &Tensor, t: &Tensor) -> Result<Gradients> {
        let (scores, contexts) = self.forward(x)?;
        let (_, loss_ctx) = self.loss_layer.forward(&scores, t)?;
        let mut dout = self.loss_layer.backward(loss_ctx, 1.0);

        let mut stages = Vec::with_capacity(self.depth());
        for (d, ctx) in contexts.into_iter().enumerate().rev() {
            let stage = &self.params.stages()[d];

            let (dz, norm_grads) = self
                .normalization_layer(stage)
                .backward(ctx.normalization, &dout)?;
            let (da, ()) = self.activations[d].backward(ctx.activation, &dz)?;
            let (dx, affine_grads) =
                Affine::new(&stage.weight, &stage.bias).backward(ctx.affine, &da)?;

            let (weight, bias) = affine_grads.into_parts();
            stages.push(StageParams {
                weight,
                bias,
                gamma: norm_grads.gamma,
                beta: norm_grads.beta,
            });
            dout = dx;
        }

        stages.reverse();
        Ok(Params::new(stages))
    }

    /// Central-difference estimate of [`MultiLayerNet::gradient`].
    ///
    /// Every weight, bias, gamma and beta entry is nudged by ±1e-4 and restored
    /// afterwards. Costs two full loss evaluations per parameter, so it is only
    /// suitable for checking small networks.
    pub fn numerical_gradient(&mut self, x: &Tensor, t: &Tensor) -> Result<Gradients> {
        let mut grads = self.params.zeros_like();

        for d in 0..self.depth() {
            let (rows, cols) = self.params.stages()[d].weight.dim();
            let grad = &mut grads.stages_mut()[d];

            for i in 0..rows {
                for j in 0..cols {
                    grad.weight[[i, j]] = self.central_difference(x, t, d, Entry::Weight(i, j))?;
                }
            }
            for j in 0..cols {
                grad.bias[[0, j]] = self.central_difference(x, t, d, Entry::Bias(j))?;
                grad.gamma[j] = self.central_difference(x, t, d, Entry::Gamma(j))?;
                grad.beta[j] = self.central_difference(x, t, d, Entry::Beta(j))?;
            }
        }

        Ok(grads)
    }

    fn central_difference(&mut self, x: &Tensor, t: &Tensor, d: usize, entry: Entry) -> Result<f64> {
        let h = NUMERICAL_GRADIENT_STEP;
        let original = *entry.get_mut(&mut self.params.stages_mut()[d]);

        *entry.get_mut(&mut self.params.stages_mut()[d]) = original + h;
        let plus = self.loss(x, t);
        *entry.get_mut(&mut self.params.stages_mut()[d]) = original - h;
        let minus = self.loss(x, t);
        *entry.get_mut(&mut self.params.stages_mut()[d]) = original;

        Ok((plus? - minus?) / (2.0 * h))
    }
}
