use thiserror::Error;

use crate::enc::EncoderError;
use crate::nn::NnError;

/// 损失计算相关错误
#[derive(Debug, Error)]
pub enum LossError {
    #[error("`{0}`的目标图像尚未设置")]
    TargetNotSet(String),
    /// 多层算子至少需要一层
    #[error("多层算子的层列表为空")]
    EmptyLayers,
    #[error("层权重个数（{weights}）与层数（{layers}）不一致")]
    LayerWeightsMismatch { weights: usize, layers: usize },
    #[error(transparent)]
    Encoder(#[from] EncoderError),
    #[error(transparent)]
    Nn(#[from] NnError),
}
