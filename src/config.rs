//! Configuration structures for training
//!
//! This module provides the training configuration: which optimizer to use,
//! its hyperparameters, and the length and cadence of the training loop.

use std::fs;

use serde::Deserialize;

use crate::error::{NetError, Result};
use crate::optimizers::{OptimizerKind, DEFAULT_MOMENTUM};

fn default_learning_rate() -> f64 {
    0.1
}

fn default_momentum() -> f64 {
    DEFAULT_MOMENTUM
}

fn default_iterations() -> usize {
    10_000
}

fn default_batch_size() -> usize {
    100
}

fn default_eval_interval() -> usize {
    100
}

/// Configuration for a training run
///
/// This structure is used to parse training configuration from JSON files.
/// Every field is optional:
///
/// - **optimizer**: "sgd" (default), "momentum" or "adagrad"
/// - **learning_rate**: step size (default 0.1)
/// - **momentum**: velocity decay for "momentum" (default 0.9)
/// - **iterations**: number of mini-batch updates (default 10000)
/// - **batch_size**: rows per mini-batch (default 100)
/// - **eval_interval**: steps between progress reports (default 100)
/// - **seed**: RNG seed; omitted means a fresh seed from the OS
///
/// # Example
///
/// ```json
/// {
///   "optimizer": "momentum",
///   "learning_rate": 0.05,
///   "momentum": 0.9,
///   "iterations": 2000,
///   "batch_size": 50,
///   "seed": 42
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TrainingConfig {
    #[serde(default)]
    pub optimizer: OptimizerKind,

    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,

    #[serde(default = "default_momentum")]
    pub momentum: f64,

    #[serde(default = "default_iterations")]
    pub iterations: usize,

    #[serde(default = "default_batch_size")]
    pub batch_size: usize,

    #[serde(default = "default_eval_interval")]
    pub eval_interval: usize,

    #[serde(default)]
    pub seed: Option<u64>,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            optimizer: OptimizerKind::default(),
            learning_rate: default_learning_rate(),
            momentum: default_momentum(),
            iterations: default_iterations(),
            batch_size: default_batch_size(),
            eval_interval: default_eval_interval(),
            seed: None,
        }
    }
}

/// Loads a training configuration from a JSON file.
///
/// Reads the file at `path` and deserializes its JSON contents into a `TrainingConfig`.
///
/// # Returns
///
/// `Ok(TrainingConfig)` on success, or an error if the file cannot be read, the
/// JSON is invalid, or a value fails validation.
///
/// # Examples
///
/// ```no_run
/// use multilayer_net::config::load_config;
///
/// let cfg = load_config("config/training.json").unwrap();
/// assert!(cfg.learning_rate > 0.0);
/// ```
pub fn load_config(path: &str) -> Result<TrainingConfig> {
    let contents = fs::read_to_string(path)?;
    let config: TrainingConfig = serde_json::from_str(&contents)?;
    validate_config(&config)?;
    Ok(config)
}

/// Checks value ranges that deserialization cannot express.
pub fn validate_config(config: &TrainingConfig) -> Result<()> {
    if !config.learning_rate.is_finite() || config.learning_rate <= 0.0 {
        return Err(NetError::InvalidConfig(format!(
            "learning_rate must be positive, got {}",
            config.learning_rate
        )));
    }

    if !(0.0..1.0).contains(&config.momentum) {
        return Err(NetError::InvalidConfig(format!(
            "momentum must be in [0, 1), got {}",
            config.momentum
        )));
    }

    if config.batch_size == 0 {
        return Err(NetError::InvalidConfig(
            "batch_size must be positive".to_string(),
        ));
    }

    if config.eval_interval == 0 {
        return Err(NetError::InvalidConfig(
            "eval_interval must be positive".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = TrainingConfig::default();
        assert!(validate_config(&config).is_ok());
        assert_eq!(config.optimizer, OptimizerKind::Sgd);
    }

    #[test]
    fn test_empty_json_uses_defaults() {
        let config: TrainingConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, TrainingConfig::default());
    }

    #[test]
    fn test_nan_learning_rate_rejected() {
        let config = TrainingConfig {
            learning_rate: f64::NAN,
            ..TrainingConfig::default()
        };
        assert!(matches!(
            validate_config(&config),
            Err(NetError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_momentum_of_one_rejected() {
        let config = TrainingConfig {
            momentum: 1.0,
            ..TrainingConfig::default()
        };
        assert!(validate_config(&config).is_err());
    }
}
