//! Architecture configuration structures
//!
//! This module describes a network's topology (layer widths, depth, activation and
//! normalization choice, initialization scale) and loads it from JSON so
//! experiments can change the architecture without code changes.

use std::fs;

use rand::Rng;
use serde::Deserialize;

use crate::error::{NetError, Result};
use crate::layers::{ActivationKind, NormalizationKind};
use crate::network::MultiLayerNet;

/// Standard deviation used for weight and bias draws when none is configured.
pub const DEFAULT_WEIGHT_INIT_STD: f64 = 0.01;

fn default_weight_init_std() -> f64 {
    DEFAULT_WEIGHT_INIT_STD
}

/// Configuration for a multi-stage network.
///
/// `layer_widths` lists the input width, every hidden width and the output
/// width. `depth` defaults to `layer_widths.len() - 1`; when given explicitly,
/// only the first `depth + 1` widths are used.
///
/// # Example
///
/// ```json
/// {
///   "layer_widths": [784, 100, 50, 10],
///   "weight_init_std": 0.01,
///   "activation": "relu",
///   "normalization": "batch_norm"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ArchitectureConfig {
    /// Input width, hidden widths and output width, in order
    pub layer_widths: Vec<usize>,

    /// Number of stages (defaults to `layer_widths.len() - 1`)
    #[serde(default)]
    pub depth: Option<usize>,

    /// Scale applied to N(0, 1) draws for weights and biases
    #[serde(default = "default_weight_init_std")]
    pub weight_init_std: f64,

    /// Hidden-stage activation: "relu" (default) or "sigmoid"
    #[serde(default)]
    pub activation: ActivationKind,

    /// Per-stage normalization: "no_norm" (default) or "batch_norm"
    #[serde(default)]
    pub normalization: NormalizationKind,
}

impl ArchitectureConfig {
    /// Configuration with default depth, init scale, ReLU and no normalization.
    pub fn new(layer_widths: Vec<usize>) -> Self {
        Self {
            layer_widths,
            depth: None,
            weight_init_std: DEFAULT_WEIGHT_INIT_STD,
            activation: ActivationKind::default(),
            normalization: NormalizationKind::default(),
        }
    }

    pub fn with_depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    pub fn with_weight_init_std(mut self, weight_init_std: f64) -> Self {
        self.weight_init_std = weight_init_std;
        self
    }

    pub fn with_activation(mut self, activation: ActivationKind) -> Self {
        self.activation = activation;
        self
    }

    pub fn with_normalization(mut self, normalization: NormalizationKind) -> Self {
        self.normalization = normalization;
        self
    }

    /// Validate the topology and return the widths of the `depth + 1` layers in use.
    ///
    /// # Errors
    ///
    /// `InvalidTopology` when depth < 1, when fewer than depth + 1 widths are
    /// listed, or when a used width is zero. `InvalidConfig` when the init scale
    /// is negative or not finite.
    pub fn validate(&self) -> Result<&[usize]> {
        let depth = match self.depth {
            Some(depth) => depth,
            None => self.layer_widths.len().saturating_sub(1),
        };

        if depth < 1 {
            return Err(NetError::InvalidTopology(format!(
                "depth must be at least 1 (got {} with {} layer widths)",
                depth,
                self.layer_widths.len()
            )));
        }
        if self.layer_widths.len() < depth + 1 {
            return Err(NetError::InvalidTopology(format!(
                "depth {} needs {} layer widths, got {}",
                depth,
                depth + 1,
                self.layer_widths.len()
            )));
        }

        let widths = &self.layer_widths[..=depth];
        if let Some(position) = widths.iter().position(|&w| w == 0) {
            return Err(NetError::InvalidTopology(format!(
                "layer width at position {} is zero",
                position
            )));
        }

        if !self.weight_init_std.is_finite() || self.weight_init_std < 0.0 {
            return Err(NetError::InvalidConfig(format!(
                "weight_init_std must be finite and non-negative, got {}",
                self.weight_init_std
            )));
        }

        Ok(widths)
    }
}

/// Loads an architecture configuration from a JSON file.
///
/// Reads the file at `path`, deserializes it into an `ArchitectureConfig` and
/// validates the topology.
///
/// # Examples
///
/// ```no_run
/// use multilayer_net::architecture::load_architecture;
///
/// let arch = load_architecture("config/separable.json").unwrap();
/// assert!(arch.layer_widths.len() >= 2);
/// ```
pub fn load_architecture(path: &str) -> Result<ArchitectureConfig> {
    let contents = fs::read_to_string(path)?;
    let config: ArchitectureConfig = serde_json::from_str(&contents)?;
    config.validate()?;
    Ok(config)
}

/// Builds a network from an architecture configuration.
pub fn build_network<R: Rng + ?Sized>(
    config: &ArchitectureConfig,
    rng: &mut R,
) -> Result<MultiLayerNet> {
    MultiLayerNet::new(config, rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_depth_from_widths() {
        let config = ArchitectureConfig::new(vec![4, 3, 2]);
        assert_eq!(config.validate().unwrap(), &[4, 3, 2]);
    }

    #[test]
    fn test_explicit_depth_uses_prefix() {
        let config = ArchitectureConfig::new(vec![4, 3, 2, 9]).with_depth(2);
        assert_eq!(config.validate().unwrap(), &[4, 3, 2]);
    }

    #[test]
    fn test_single_width_is_invalid() {
        let config = ArchitectureConfig::new(vec![4]);
        assert!(matches!(
            config.validate(),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_depth_zero_is_invalid() {
        let config = ArchitectureConfig::new(vec![4, 2]).with_depth(0);
        assert!(matches!(
            config.validate(),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_too_few_widths_for_depth() {
        let config = ArchitectureConfig::new(vec![4, 2]).with_depth(3);
        assert!(matches!(
            config.validate(),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_zero_width_is_invalid() {
        let config = ArchitectureConfig::new(vec![4, 0, 2]);
        assert!(matches!(
            config.validate(),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_negative_init_std_is_invalid() {
        let config = ArchitectureConfig::new(vec![4, 2]).with_weight_init_std(-1.0);
        assert!(matches!(config.validate(), Err(NetError::InvalidConfig(_))));
    }

    #[test]
    fn test_deserialize_defaults() {
        let config: ArchitectureConfig =
            serde_json::from_str(r#"{ "layer_widths": [2, 4, 2] }"#).unwrap();
        assert_eq!(config, ArchitectureConfig::new(vec![2, 4, 2]));
    }
}
