use std::sync::Arc;
use std::sync::atomic::AtomicUsize;

use approx::assert_abs_diff_eq;

use super::toy_encoder;
use crate::assert_err;
use crate::loss::LossError;
use crate::nn::NnError;
use crate::ops::{FeatureReconstructionOperator, GramNormalization, GramOperator, Operator};
use crate::tensor::Tensor;

#[test]
fn test_feature_reconstruction_score() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let mut op =
        FeatureReconstructionOperator::feature_reconstruction(encoder.extract_encoder("x2").unwrap(), 0.5);
    assert!(!op.has_target_image());
    assert_eq!(op.score_weight(), 0.5);

    op.set_target_image(&Tensor::zeros(&[1, 1, 2, 2])).unwrap();
    assert!(op.has_target_image());

    // 编码差为2，均方误差为4，乘以权重0.5
    let score = op.evaluate(&Tensor::ones(&[1, 1, 2, 2])).unwrap();
    assert_eq!(score.len(), 1);
    assert_abs_diff_eq!(score.total(), 2.0, epsilon = 1e-6);

    // 与目标一致时分数为0
    let score = op.evaluate(&Tensor::zeros(&[1, 1, 2, 2])).unwrap();
    assert_eq!(score.total(), 0.0);
}

#[test]
fn test_evaluate_without_target() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let op = FeatureReconstructionOperator::feature_reconstruction(encoder.extract_encoder("x3").unwrap(), 1.0);
    assert_err!(
        op.evaluate(&Tensor::ones(&[1, 1, 2, 2])),
        LossError::TargetNotSet(layer) if layer == "x3"
    );
}

#[test]
fn test_target_is_overwritten() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let mut op = FeatureReconstructionOperator::feature_reconstruction(encoder.extract_encoder("x2").unwrap(), 1.0);
    op.set_target_image(&Tensor::zeros(&[1, 1, 1, 1])).unwrap();
    op.set_target_image(&Tensor::ones(&[1, 1, 1, 1])).unwrap();
    assert_eq!(op.target_repr().and_then(|t| t.number()), Some(2.0));
    assert_eq!(op.evaluate(&Tensor::ones(&[1, 1, 1, 1])).unwrap().total(), 0.0);
}

#[test]
fn test_gram_target_broadcasts_over_batch() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let mut op = GramOperator::gram(
        encoder.extract_encoder("x2").unwrap(),
        GramNormalization::None,
        1.0,
    );
    // 风格图像尺寸可与输入不同：Gram 矩阵只与通道数有关
    op.set_target_image(&Tensor::zeros(&[1, 2, 5, 5])).unwrap();
    let input = Tensor::ones(&[3, 2, 2, 2]);
    // 编码全为2，Gram 每个元素为 4 * 4 = 16
    let score = op.evaluate(&input).unwrap();
    assert_abs_diff_eq!(score.total(), 256.0, epsilon = 1e-3);
    assert_eq!(op.representation().normalization, GramNormalization::None);
}

#[test]
fn test_incomparable_shapes() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let mut op = FeatureReconstructionOperator::feature_reconstruction(encoder.extract_encoder("x2").unwrap(), 1.0);
    op.set_target_image(&Tensor::zeros(&[1, 1, 2, 2])).unwrap();
    assert_err!(
        op.evaluate(&Tensor::zeros(&[1, 1, 3, 3])),
        LossError::Nn(NnError::ShapeMismatch { .. })
    );
}
