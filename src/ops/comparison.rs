/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 编码比较算子：绑定单个编码器层，比较输入与目标图像在该层上的表示
 */

use tracing::debug;

use super::{FeatureReconstruction, Gram, GramNormalization, Operator, Representation};
use crate::enc::SingleLayerEncoder;
use crate::loss::{LossDict, LossError};
use crate::nn::NnError;
use crate::tensor::Tensor;

/// 编码比较算子
///
/// 分数 = `score_weight * mean((repr(input) - repr(target))²)`；
/// 目标表示的 batch 维为1时会广播到输入的 batch
#[derive(Debug, Clone)]
pub struct EncodingComparisonOperator<R: Representation> {
    encoder: SingleLayerEncoder,
    representation: R,
    score_weight: f32,
    target_repr: Option<Tensor>,
}

/// 特征重建（内容）损失
pub type FeatureReconstructionOperator = EncodingComparisonOperator<FeatureReconstruction>;
/// Gram（风格）损失
pub type GramOperator = EncodingComparisonOperator<Gram>;

impl<R: Representation> EncodingComparisonOperator<R> {
    pub fn new(encoder: SingleLayerEncoder, representation: R, score_weight: f32) -> Self {
        Self {
            encoder,
            representation,
            score_weight,
            target_repr: None,
        }
    }

    pub fn encoder(&self) -> &SingleLayerEncoder {
        &self.encoder
    }

    pub fn representation(&self) -> &R {
        &self.representation
    }

    pub fn score_weight(&self) -> f32 {
        self.score_weight
    }

    pub fn target_repr(&self) -> Option<&Tensor> {
        self.target_repr.as_ref()
    }

    /// 由目标图像在本层的编码设置目标表示
    pub fn set_target_encoding(&mut self, encoding: &Tensor) -> Result<(), LossError> {
        self.target_repr = Some(self.representation.represent(encoding)?);
        Ok(())
    }

    /// 由输入图像在本层的编码计算（加权后的）分数
    pub fn evaluate_encoding(&self, encoding: &Tensor) -> Result<f32, LossError> {
        let target = self
            .target_repr
            .as_ref()
            .ok_or_else(|| LossError::TargetNotSet(self.encoder.layer().to_string()))?;
        let input_repr = self.representation.represent(encoding)?;
        Ok(self.score_weight * mse_broadcast(&input_repr, target)?)
    }
}

impl FeatureReconstructionOperator {
    pub fn feature_reconstruction(encoder: SingleLayerEncoder, score_weight: f32) -> Self {
        Self::new(encoder, FeatureReconstruction, score_weight)
    }
}

impl GramOperator {
    pub fn gram(
        encoder: SingleLayerEncoder,
        normalization: GramNormalization,
        score_weight: f32,
    ) -> Self {
        Self::new(encoder, Gram::new(normalization), score_weight)
    }
}

impl<R: Representation> Operator for EncodingComparisonOperator<R> {
    fn evaluate(&self, input_image: &Tensor) -> Result<LossDict, LossError> {
        let encoding = self.encoder.encode(input_image)?;
        Ok(LossDict::scalar(self.evaluate_encoding(&encoding)?))
    }

    fn set_target_image(&mut self, image: &Tensor) -> Result<(), LossError> {
        debug!(layer = self.encoder.layer(), shape = ?image.shape(), "设置目标图像");
        let encoding = self.encoder.encode(image)?;
        self.set_target_encoding(&encoding)
    }

    fn has_target_image(&self) -> bool {
        self.target_repr.is_some()
    }
}

/// 均方误差，允许`target`按 NumPy 规则广播到`input`的形状
fn mse_broadcast(input: &Tensor, target: &Tensor) -> Result<f32, NnError> {
    if input.is_same_shape(target) {
        return Ok(input.mse(target));
    }
    let broadcastable = input.dimension() >= target.dimension()
        && input
            .shape()
            .iter()
            .rev()
            .zip(target.shape().iter().rev())
            .all(|(i, t)| i == t || *t == 1);
    if !broadcastable {
        return Err(NnError::ShapeMismatch {
            expected: target.shape().to_vec(),
            got: input.shape().to_vec(),
            message: "输入表示无法与目标表示比较".to_string(),
        });
    }
    Ok((input - target).powi(2).mean())
}
