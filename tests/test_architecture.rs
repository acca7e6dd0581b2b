//! Tests for architecture parsing and network building
//!
//! This file tests the architecture module including:
//! - Loading valid JSON architecture configs
//! - Defaults for omitted fields
//! - Building networks from configs
//! - Handling invalid JSON, unknown selectors and missing files
//! - Topology validation

use multilayer_net::architecture::{build_network, load_architecture, DEFAULT_WEIGHT_INIT_STD};
use multilayer_net::layers::{ActivationKind, NormalizationKind};
use multilayer_net::utils::seeded_rng;
use multilayer_net::NetError;
use std::io::Write;
use tempfile::NamedTempFile;

fn write_temp_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("failed to create temp file");
    file.write_all(contents.as_bytes())
        .expect("failed to write temp config");
    file
}

fn path_of(file: &NamedTempFile) -> &str {
    file.path().to_str().expect("temp path is not UTF-8")
}

// ============================================================================
// Valid Architecture Loading Tests
// ============================================================================

mod valid_architecture_tests {
    use super::*;

    #[test]
    fn test_load_full_architecture() {
        let file = write_temp_config(
            r#"{
  "layer_widths": [784, 100, 50, 10],
  "depth": 3,
  "weight_init_std": 0.05,
  "activation": "sigmoid",
  "normalization": "batch_norm"
}"#,
        );
        let config = load_architecture(path_of(&file)).unwrap();

        assert_eq!(config.layer_widths, vec![784, 100, 50, 10]);
        assert_eq!(config.depth, Some(3));
        assert_eq!(config.weight_init_std, 0.05);
        assert_eq!(config.activation, ActivationKind::Sigmoid);
        assert_eq!(config.normalization, NormalizationKind::BatchNorm);
    }

    #[test]
    fn test_defaults_for_missing_fields() {
        let file = write_temp_config(r#"{ "layer_widths": [4, 3] }"#);
        let config = load_architecture(path_of(&file)).unwrap();

        assert_eq!(config.depth, None);
        assert_eq!(config.weight_init_std, DEFAULT_WEIGHT_INIT_STD);
        assert_eq!(config.activation, ActivationKind::Relu);
        assert_eq!(config.normalization, NormalizationKind::NoNorm);
    }

    #[test]
    fn test_load_bundled_configs() {
        let config = load_architecture("config/separable.json").unwrap();
        assert_eq!(config.layer_widths, vec![2, 4, 2]);

        let config = load_architecture("config/separable_batchnorm.json").unwrap();
        assert_eq!(config.normalization, NormalizationKind::BatchNorm);
    }

    #[test]
    fn test_build_network_from_file() {
        let file = write_temp_config(r#"{ "layer_widths": [6, 5, 4, 3], "depth": 2 }"#);
        let config = load_architecture(path_of(&file)).unwrap();
        let net = build_network(&config, &mut seeded_rng(42)).unwrap();

        assert_eq!(net.depth(), 2);
        assert_eq!(net.layer_widths(), &[6, 5, 4]);
        assert_eq!(net.params().stage(1).unwrap().weight.dim(), (5, 4));
    }
}

// ============================================================================
// Invalid Architecture Tests
// ============================================================================

mod invalid_architecture_tests {
    use super::*;

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_architecture("/nonexistent/architecture.json"),
            Err(NetError::Io(_))
        ));
    }

    #[test]
    fn test_invalid_json() {
        let file = write_temp_config("{ layer_widths: [2, 2] ");
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::Json(_))
        ));
    }

    #[test]
    fn test_missing_layer_widths() {
        let file = write_temp_config(r#"{ "activation": "relu" }"#);
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_activation() {
        let file = write_temp_config(r#"{ "layer_widths": [2, 2], "activation": "tanh" }"#);
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::Json(_))
        ));
    }

    #[test]
    fn test_unknown_normalization() {
        let file =
            write_temp_config(r#"{ "layer_widths": [2, 2], "normalization": "layer_norm" }"#);
        assert!(load_architecture(path_of(&file)).is_err());
    }

    #[test]
    fn test_single_width_rejected() {
        let file = write_temp_config(r#"{ "layer_widths": [2] }"#);
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_depth_beyond_widths_rejected() {
        let file = write_temp_config(r#"{ "layer_widths": [2, 3, 2], "depth": 3 }"#);
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_zero_width_rejected() {
        let file = write_temp_config(r#"{ "layer_widths": [2, 0, 2] }"#);
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::InvalidTopology(_))
        ));
    }

    #[test]
    fn test_negative_init_std_rejected() {
        let file = write_temp_config(r#"{ "layer_widths": [2, 2], "weight_init_std": -0.1 }"#);
        assert!(matches!(
            load_architecture(path_of(&file)),
            Err(NetError::InvalidConfig(_))
        ));
    }
}
