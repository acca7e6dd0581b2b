//! Forward-pass tests for every layer
//!
//! This file checks the output laws of each layer:
//! - Affine shape law and bias broadcasting
//! - Sigmoid range, ReLU non-negativity and mask
//! - Softmax row sums and non-negative cross-entropy
//! - BatchNorm column statistics
//! - Combinator outputs and shape errors

use approx::assert_abs_diff_eq;
use multilayer_net::layers::{
    AddLayer, Affine, BatchNorm, Combinator, ElemMulLayer, Layer, LossLayer, MatMulLayer, Relu,
    Sigmoid, SoftmaxCrossEntropy,
};
use multilayer_net::tensor::{Tensor, Vector};
use multilayer_net::utils::seeded_rng;
use multilayer_net::NetError;
use ndarray::{array, Array2, Axis};
use rand::Rng;

fn random_tensor(rows: usize, cols: usize, scale: f64, seed: u64) -> Tensor {
    let mut rng = seeded_rng(seed);
    Array2::from_shape_fn((rows, cols), |_| rng.gen_range(-scale..scale))
}

// ============================================================================
// Affine
// ============================================================================

mod affine_tests {
    use super::*;

    #[test]
    fn test_affine_shape_law() {
        let weight = random_tensor(3, 5, 1.0, 1);
        let bias = random_tensor(1, 5, 1.0, 2);
        let layer = Affine::new(&weight, &bias);

        let (out, _) = layer.forward(&random_tensor(7, 3, 1.0, 3)).unwrap();
        assert_eq!(out.dim(), (7, 5));
        assert_eq!(layer.input_size(), 3);
        assert_eq!(layer.output_size(), 5);
    }

    #[test]
    fn test_affine_bias_broadcast() {
        let weight = Tensor::zeros((2, 3));
        let bias = array![[1.0, 2.0, 3.0]];
        let layer = Affine::new(&weight, &bias);

        let (out, _) = layer.forward(&random_tensor(4, 2, 1.0, 9)).unwrap();
        for row in out.rows() {
            assert_eq!(row, bias.row(0));
        }
    }

    #[test]
    fn test_affine_input_width_mismatch() {
        let weight = Tensor::zeros((3, 2));
        let bias = Tensor::zeros((1, 2));
        let layer = Affine::new(&weight, &bias);

        match layer.forward(&Tensor::zeros((4, 2))) {
            Err(NetError::ShapeMismatch { left, right, .. }) => {
                assert_eq!(left, (4, 2));
                assert_eq!(right, (3, 2));
            }
            other => panic!("expected shape mismatch, got {:?}", other),
        }
    }
}

// ============================================================================
// Activations
// ============================================================================

mod activation_tests {
    use super::*;

    #[test]
    fn test_sigmoid_range() {
        let x = random_tensor(10, 10, 20.0, 4);
        let (y, _) = Sigmoid.forward(&x).unwrap();
        assert!(y.iter().all(|&v| v > 0.0 && v < 1.0));
    }

    #[test]
    fn test_sigmoid_at_zero() {
        let (y, _) = Sigmoid.forward(&array![[0.0]]).unwrap();
        assert_abs_diff_eq!(y[[0, 0]], 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_relu_non_negative_with_mask() {
        let x = random_tensor(6, 6, 1.0, 5);
        let (y, ctx) = Relu.forward(&x).unwrap();

        assert!(y.iter().all(|&v| v >= 0.0));
        for ((&xi, &yi), &keep) in x.iter().zip(y.iter()).zip(ctx.mask().iter()) {
            assert_eq!(keep, xi > 0.0);
            assert_eq!(yi, if keep { xi } else { 0.0 });
        }
    }

    #[test]
    fn test_relu_zero_is_masked() {
        let (_, ctx) = Relu.forward(&array![[0.0, 1.0]]).unwrap();
        assert_eq!(ctx.mask(), &array![[false, true]]);
    }
}

// ============================================================================
// Softmax / cross-entropy
// ============================================================================

mod softmax_loss_tests {
    use super::*;

    fn one_hot(rows: usize, cols: usize) -> Tensor {
        Array2::from_shape_fn((rows, cols), |(i, j)| if i % cols == j { 1.0 } else { 0.0 })
    }

    #[test]
    fn test_softmax_rows_sum_to_one() {
        let scores = random_tensor(5, 4, 10.0, 6);
        let (_, ctx) = SoftmaxCrossEntropy.forward(&scores, &one_hot(5, 4)).unwrap();
        for row in ctx.probabilities().rows() {
            assert_abs_diff_eq!(row.sum(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_cross_entropy_non_negative() {
        for seed in 0..10 {
            let scores = random_tensor(3, 3, 5.0, seed);
            let (loss, _) = SoftmaxCrossEntropy.forward(&scores, &one_hot(3, 3)).unwrap();
            assert!(loss >= 0.0);
        }
    }

    #[test]
    fn test_softmax_large_scores_stay_finite() {
        let scores = array![[1000.0, 1001.0], [-1000.0, -1000.0]];
        let (loss, ctx) = SoftmaxCrossEntropy.forward(&scores, &one_hot(2, 2)).unwrap();
        assert!(loss.is_finite());
        assert!(ctx.probabilities().iter().all(|p| p.is_finite()));
    }

    #[test]
    fn test_single_row_backward_is_exact_difference() {
        let scores = array![[0.3, -1.2, 2.0]];
        let targets = array![[0.0, 1.0, 0.0]];
        let (_, ctx) = SoftmaxCrossEntropy.forward(&scores, &targets).unwrap();
        let probabilities = ctx.probabilities().clone();

        let dx = SoftmaxCrossEntropy.backward(ctx, 1.0);
        assert_eq!(dx, probabilities - &targets);
    }

    #[test]
    fn test_backward_ignores_seed_magnitude() {
        let scores = random_tensor(4, 3, 1.0, 7);
        let targets = one_hot(4, 3);
        let (_, ctx_a) = SoftmaxCrossEntropy.forward(&scores, &targets).unwrap();
        let (_, ctx_b) = SoftmaxCrossEntropy.forward(&scores, &targets).unwrap();

        assert_eq!(
            SoftmaxCrossEntropy.backward(ctx_a, 1.0),
            SoftmaxCrossEntropy.backward(ctx_b, 5.0)
        );
    }

    #[test]
    fn test_empty_batch_rejected() {
        let empty = Tensor::zeros((0, 3));
        assert!(matches!(
            SoftmaxCrossEntropy.forward(&empty, &empty),
            Err(NetError::EmptyBatch { .. })
        ));
    }
}

// ============================================================================
// BatchNorm
// ============================================================================

mod batchnorm_tests {
    use super::*;

    #[test]
    fn test_batchnorm_zero_mean_unit_variance() {
        let x = random_tensor(8, 3, 2.0, 8);
        let gamma = Vector::ones(3);
        let beta = Vector::zeros(3);
        let (y, _) = BatchNorm::new(&gamma, &beta).forward(&x).unwrap();

        let mean = y.mean_axis(Axis(0)).unwrap();
        let var = y.var_axis(Axis(0), 0.0);
        for j in 0..3 {
            assert_abs_diff_eq!(mean[j], 0.0, epsilon = 1e-6);
            assert_abs_diff_eq!(var[j], 1.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_batchnorm_gamma_beta_applied() {
        let x = random_tensor(16, 2, 1.0, 10);
        let gamma = array![2.0, 0.5];
        let beta = array![1.0, -1.0];
        let (y, _) = BatchNorm::new(&gamma, &beta).forward(&x).unwrap();

        let mean = y.mean_axis(Axis(0)).unwrap();
        let std = y.std_axis(Axis(0), 0.0);
        assert_abs_diff_eq!(mean[0], 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(mean[1], -1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(std[0], 2.0, epsilon = 1e-5);
        assert_abs_diff_eq!(std[1], 0.5, epsilon = 1e-5);
    }
}

// ============================================================================
// Combinators
// ============================================================================

mod combinator_tests {
    use super::*;

    #[test]
    fn test_add_forward() {
        let (out, _) = AddLayer
            .forward(&array![[1.0, 2.0]], &array![[3.0, 4.0]])
            .unwrap();
        assert_eq!(out, array![[4.0, 6.0]]);
    }

    #[test]
    fn test_elem_mul_forward() {
        let (out, _) = ElemMulLayer
            .forward(&array![[1.0, 2.0]], &array![[3.0, 4.0]])
            .unwrap();
        assert_eq!(out, array![[3.0, 8.0]]);
    }

    #[test]
    fn test_matmul_forward_shape() {
        let (out, _) = MatMulLayer
            .forward(&random_tensor(2, 3, 1.0, 11), &random_tensor(3, 4, 1.0, 12))
            .unwrap();
        assert_eq!(out.dim(), (2, 4));
    }

    #[test]
    fn test_combinator_shape_errors() {
        let a = Tensor::zeros((2, 3));
        let b = Tensor::zeros((3, 2));
        assert!(AddLayer.forward(&a, &b).is_err());
        assert!(ElemMulLayer.forward(&a, &b).is_err());
        assert!(MatMulLayer.forward(&a, &a).is_err());
    }
}
