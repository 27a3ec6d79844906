/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 感知损失单元测试：用可手算的玩具编码器验证加权与组合
 */

use std::sync::Arc;

use approx::assert_relative_eq;

use crate::assert_err;
use crate::enc::MultiLayerEncoder;
use crate::loss::{LossError, PerceptualLoss};
use crate::nn::layer::{ReLU, Upsample};
use crate::nn::Module;
use crate::ops::{
    FeatureReconstructionOperator, GramNormalization, GramOperator, LayerWeights,
    MultiLayerEncodingOperator, gram_matrix,
};
use crate::tensor::Tensor;

type ToyLoss = PerceptualLoss<FeatureReconstructionOperator, MultiLayerEncodingOperator<crate::ops::Gram>>;

const CONTENT_WEIGHT: f32 = 3.0;
const STYLE_WEIGHT: f32 = 7.0;

/// 层`relu` -> `up`（最近邻上采样2倍）
fn toy_loss() -> ToyLoss {
    let layers: Vec<(String, Box<dyn Module>)> = vec![
        ("relu".to_string(), Box::new(ReLU)),
        ("up".to_string(), Box::new(Upsample::new(2))),
    ];
    let encoder = Arc::new(MultiLayerEncoder::new(layers).unwrap());
    let content = FeatureReconstructionOperator::feature_reconstruction(
        encoder.extract_encoder("relu").unwrap(),
        CONTENT_WEIGHT,
    );
    let style = MultiLayerEncodingOperator::new(
        &encoder,
        &["relu", "up"],
        |encoder, weight| GramOperator::gram(encoder, GramNormalization::ChannelsSquared, weight),
        &LayerWeights::Sum,
        STYLE_WEIGHT,
    )
    .unwrap();
    PerceptualLoss::new(content, style)
}

#[test]
fn test_evaluate_requires_both_images() {
    let mut loss = toy_loss();
    let image = Tensor::ones(&[1, 2, 2, 2]);
    assert!(!loss.has_content_image());
    assert!(!loss.has_style_image());
    assert_err!(loss.evaluate(&image), LossError::TargetNotSet(name) if name == "content_loss");

    loss.set_content_image(&image).unwrap();
    assert!(loss.has_content_image());
    assert_err!(loss.evaluate(&image), LossError::TargetNotSet(name) if name == "style_loss");

    loss.set_style_image(&image).unwrap();
    assert!(loss.has_style_image());
    assert!(loss.evaluate(&image).is_ok());
}

#[test]
fn test_total_is_weighted_sum_of_terms() {
    let mut loss = toy_loss();
    let content = Tensor::new_random(0.0, 1.0, &[1, 2, 2, 2]);
    let style = Tensor::new_random(0.0, 1.0, &[1, 2, 3, 3]);
    let output = Tensor::new_random(0.0, 1.0, &[1, 2, 2, 2]);
    loss.set_content_image(&content).unwrap();
    loss.set_style_image(&style).unwrap();

    let losses = loss.evaluate(&output).unwrap();
    assert_eq!(losses.len(), 3);

    // 手算：内容项为特征均方误差，风格项为各层 Gram（除以 C²）均方误差之和
    let content_term = output.mse(&content);
    let style_term = |x: &Tensor, s: &Tensor| {
        let g_x = gram_matrix(x, GramNormalization::ChannelsSquared).unwrap();
        let g_s = gram_matrix(s, GramNormalization::ChannelsSquared).unwrap();
        g_x.mse(&g_s)
    };
    let up = |x: &Tensor| Upsample::new(2).forward(x).unwrap();
    let style_terms = style_term(&output, &style) + style_term(&up(&output), &up(&style));

    assert_relative_eq!(
        losses.get("content_loss").unwrap(),
        CONTENT_WEIGHT * content_term,
        max_relative = 1e-4
    );
    assert_relative_eq!(
        losses.sum_prefixed("style_loss"),
        STYLE_WEIGHT * style_terms,
        max_relative = 1e-4
    );
    assert_relative_eq!(
        losses.total(),
        CONTENT_WEIGHT * content_term + STYLE_WEIGHT * style_terms,
        max_relative = 1e-4
    );
    assert!(losses.get("style_loss.relu").is_some());
    assert!(losses.get("style_loss.up").is_some());
}

#[test]
fn test_changing_content_image_changes_loss() {
    let mut loss = toy_loss();
    let output = Tensor::new_random(0.0, 1.0, &[1, 2, 2, 2]);
    loss.set_style_image(&Tensor::new_random(0.0, 1.0, &[1, 2, 2, 2]))
        .unwrap();

    loss.set_content_image(&Tensor::zeros(&[1, 2, 2, 2])).unwrap();
    let first = loss.evaluate(&output).unwrap().total();
    loss.set_content_image(&Tensor::ones(&[1, 2, 2, 2])).unwrap();
    let second = loss.evaluate(&output).unwrap().total();
    assert_ne!(first, second);

    // 风格项不受内容图像影响
    loss.set_content_image(&Tensor::zeros(&[1, 2, 2, 2])).unwrap();
    assert_eq!(loss.evaluate(&output).unwrap().total(), first);
}
