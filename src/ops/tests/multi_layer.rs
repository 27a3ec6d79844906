use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use approx::assert_abs_diff_eq;

use super::toy_encoder;
use crate::assert_err;
use crate::enc::EncoderError;
use crate::loss::LossError;
use crate::ops::{
    FeatureReconstructionOperator, GramNormalization, GramOperator, LayerWeights,
    MultiLayerEncodingOperator, Operator,
};
use crate::tensor::Tensor;

#[test]
fn test_layer_weights_resolve() {
    assert_eq!(LayerWeights::Sum.resolve(3).unwrap(), vec![1.0; 3]);
    assert_eq!(LayerWeights::Mean.resolve(4).unwrap(), vec![0.25; 4]);
    assert_eq!(
        LayerWeights::Custom(vec![1.0, 2.0]).resolve(2).unwrap(),
        vec![1.0, 2.0]
    );
    assert_err!(
        LayerWeights::Custom(vec![1.0]).resolve(2),
        LossError::LayerWeightsMismatch { weights: 1, layers: 2 }
    );
}

#[test]
fn test_multi_layer_scores_are_weighted_per_layer() {
    let calls = Arc::new(AtomicUsize::new(0));
    let encoder = toy_encoder(&calls);
    let mut op = MultiLayerEncodingOperator::new(
        &encoder,
        &["x2", "x3"],
        |encoder, weight| FeatureReconstructionOperator::feature_reconstruction(encoder, weight),
        &LayerWeights::Custom(vec![1.0, 0.5]),
        10.0,
    )
    .unwrap();
    assert_eq!(op.layers(), vec!["x2", "x3"]);
    assert!(!op.has_target_image());

    op.set_target_image(&Tensor::zeros(&[1, 1, 1, 1])).unwrap();
    assert!(op.has_target_image());
    // 设置目标只前向一次
    assert_eq!(calls.load(Ordering::SeqCst), 2);

    let scores = op.evaluate(&Tensor::ones(&[1, 1, 1, 1])).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 4);
    // x2: 10 * 1.0 * 2²，x3: 10 * 0.5 * 6²
    assert_abs_diff_eq!(scores.get("x2").unwrap(), 40.0, epsilon = 1e-4);
    assert_abs_diff_eq!(scores.get("x3").unwrap(), 180.0, epsilon = 1e-4);
    assert_abs_diff_eq!(scores.total(), 220.0, epsilon = 1e-4);
}

#[test]
fn test_multi_layer_sum_weights_with_gram() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let mut op = MultiLayerEncodingOperator::new(
        &encoder,
        &["x2", "x3"],
        |encoder, weight| GramOperator::gram(encoder, GramNormalization::ChannelsSquared, weight),
        &LayerWeights::Sum,
        2.0,
    )
    .unwrap();
    assert!(op.operators().iter().all(|o| o.score_weight() == 1.0));
    op.set_target_image(&Tensor::zeros(&[1, 2, 2, 2])).unwrap();

    // 输入全一：x2 编码全为2，Gram = 4 * 4 / 4 = 4；x3 编码全为6，Gram = 36 * 4 / 4 = 36
    let scores = op.evaluate(&Tensor::ones(&[1, 2, 2, 2])).unwrap();
    assert_abs_diff_eq!(scores.total(), 2.0 * (16.0 + 1296.0), epsilon = 1e-2);
}

#[test]
fn test_multi_layer_unknown_layer() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let result = MultiLayerEncodingOperator::new(
        &encoder,
        &["x2", "x5"],
        |encoder, weight| FeatureReconstructionOperator::feature_reconstruction(encoder, weight),
        &LayerWeights::Sum,
        1.0,
    );
    assert_err!(
        result,
        LossError::Encoder(EncoderError::UnknownLayer { layer }) if layer == "x5"
    );
}

#[test]
fn test_multi_layer_empty_layers() {
    let encoder = toy_encoder(&Arc::new(AtomicUsize::new(0)));
    let result = MultiLayerEncodingOperator::new(
        &encoder,
        &[] as &[&str],
        |encoder, weight| FeatureReconstructionOperator::feature_reconstruction(encoder, weight),
        &LayerWeights::Sum,
        1.0,
    );
    assert_err!(result, LossError::EmptyLayers);
}
