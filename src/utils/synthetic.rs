//! Deterministic toy datasets for tests and demos.

use rand::Rng;

use crate::tensor::Tensor;

/// Half-width of the square each class cluster is drawn from.
const CLUSTER_SPREAD: f64 = 0.2;

/// Two linearly separable classes in the unit square.
///
/// Class 0 is drawn uniformly around (0.25, 0.25) and class 1 around
/// (0.75, 0.75), each within ±0.2 per coordinate, so every sample lies in
/// [0, 1]² and the line x0 + x1 = 1 separates the classes with a margin.
/// Classes alternate row by row. Labels are one-hot with two columns.
pub fn two_class_clusters<R: Rng + ?Sized>(samples: usize, rng: &mut R) -> (Tensor, Tensor) {
    let mut data = Tensor::zeros((samples, 2));
    let mut labels = Tensor::zeros((samples, 2));

    for i in 0..samples {
        let class = i % 2;
        let center = if class == 0 { 0.25 } else { 0.75 };
        for j in 0..2 {
            data[[i, j]] = center + rng.gen_range(-CLUSTER_SPREAD..CLUSTER_SPREAD);
        }
        labels[[i, class]] = 1.0;
    }

    (data, labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::rng::seeded_rng;

    #[test]
    fn test_clusters_are_separable_and_scaled() {
        let mut rng = seeded_rng(42);
        let (data, labels) = two_class_clusters(100, &mut rng);

        assert_eq!(data.dim(), (100, 2));
        assert_eq!(labels.dim(), (100, 2));
        for i in 0..100 {
            let s = data[[i, 0]] + data[[i, 1]];
            assert!(data.row(i).iter().all(|&v| (0.0..=1.0).contains(&v)));
            if labels[[i, 1]] == 1.0 {
                assert!(s > 1.0);
            } else {
                assert!(s < 1.0);
            }
            assert_eq!(labels.row(i).sum(), 1.0);
        }
    }

    #[test]
    fn test_clusters_deterministic() {
        let a = two_class_clusters(10, &mut seeded_rng(5));
        let b = two_class_clusters(10, &mut seeded_rng(5));
        assert_eq!(a, b);
    }
}
