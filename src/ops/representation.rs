/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 编码 -> 表示（representation）的策略：特征重建直接比较编码，风格比较 Gram 矩阵
 */

use std::fmt::Debug;

use serde::{Deserialize, Serialize};

use crate::nn::NnError;
use crate::tensor::Tensor;

/// 把编码器输出（[B, C, H, W]）转为用于比较的表示
pub trait Representation: Debug + Send + Sync {
    fn represent(&self, encoding: &Tensor) -> Result<Tensor, NnError>;
}

/// 特征重建：表示即编码本身
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FeatureReconstruction;

impl Representation for FeatureReconstruction {
    fn represent(&self, encoding: &Tensor) -> Result<Tensor, NnError> {
        Ok(encoding.clone())
    }
}

/// Gram 矩阵的归一化方式
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GramNormalization {
    /// 不归一化
    None,
    /// 除以通道数 C
    #[default]
    Channels,
    /// 除以 C²。PyTorch 官方示例及 Johnson 等人的参考实现都多除了一次通道数，
    /// 需要与之数值对齐时使用
    ChannelsSquared,
}

impl GramNormalization {
    fn divisor(self, channels: usize) -> f32 {
        match self {
            Self::None => 1.0,
            Self::Channels => channels as f32,
            Self::ChannelsSquared => (channels * channels) as f32,
        }
    }
}

/// 计算 Gram 矩阵：`[B, C, H, W]` -> `[B, C, C]`，`G = F · Fᵀ / divisor`
pub fn gram_matrix(encoding: &Tensor, normalization: GramNormalization) -> Result<Tensor, NnError> {
    if encoding.dimension() < 3 {
        return Err(NnError::ShapeMismatch {
            expected: vec![0, 0, 0, 0], // 占位
            got: encoding.shape().to_vec(),
            message: "Gram 矩阵的输入至少为 3D [B, C, ...]".to_string(),
        });
    }
    let channels = encoding.shape()[1];
    let features = encoding.flatten_from(2);
    let gram = features.bmm(&features.transpose_last_two());
    Ok(gram / normalization.divisor(channels))
}

/// 风格表示：Gram 矩阵
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Gram {
    pub normalization: GramNormalization,
}

impl Gram {
    pub const fn new(normalization: GramNormalization) -> Self {
        Self { normalization }
    }
}

impl Representation for Gram {
    fn represent(&self, encoding: &Tensor) -> Result<Tensor, NnError> {
        gram_matrix(encoding, self.normalization)
    }
}
