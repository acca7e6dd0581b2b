//! Multi-Layer Network Training Library
//!
//! A small feed-forward neural network engine: differentiable layers with
//! explicit forward/backward contexts, a multi-stage network that computes
//! losses and analytic gradients, and optimizers that update parameters in place.
//!
//! # Modules
//!
//! - `layers`: Layer traits and implementations (Affine, activations, BatchNorm, loss, combinators)
//! - `network`: The multi-stage network orchestrator
//! - `params`: Parameter and gradient containers
//! - `optimizers`: Optimizer trait and implementations (SGD, Momentum, AdaGrad)
//! - `utils`: Shared utilities (RNG, activation functions, sampling, toy data)
//! - `config`: Training configuration structures
//! - `architecture`: Architecture configuration and network building
//! - `error`: Error type shared by every module
//!
//! # Example
//!
//! ```
//! use multilayer_net::prelude::*;
//!
//! let mut rng = seeded_rng(7);
//! let (x, t) = two_class_clusters(20, &mut rng);
//! let mut net = MultiLayerNet::new(&ArchitectureConfig::new(vec![2, 4, 2]), &mut rng).unwrap();
//! let mut optimizer = build_optimizer(OptimizerKind::Sgd, 0.1, 0.9);
//!
//! let grads = net.gradient(&x, &t).unwrap();
//! optimizer.update(net.params_mut(), &grads).unwrap();
//! assert!(net.loss(&x, &t).unwrap().is_finite());
//! ```

pub mod architecture;
pub mod config;
pub mod error;
pub mod layers;
pub mod network;
pub mod optimizers;
pub mod params;
pub mod tensor;
pub mod utils;

pub use error::{NetError, Result};

/// Commonly used types in one import.
pub mod prelude {
    pub use crate::architecture::{load_architecture, ArchitectureConfig};
    pub use crate::config::{load_config, TrainingConfig};
    pub use crate::error::{NetError, Result};
    pub use crate::layers::{ActivationKind, NormalizationKind};
    pub use crate::network::MultiLayerNet;
    pub use crate::optimizers::{build_optimizer, Optimizer, OptimizerKind};
    pub use crate::params::{Gradients, Params, StageParams};
    pub use crate::tensor::Tensor;
    pub use crate::utils::{sample_batch, seeded_rng, two_class_clusters};
}
