/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : 参数初始化方式。统一由外部传入的 RNG 驱动，固定种子即可复现权重
 */

use rand::Rng;

use crate::tensor::Tensor;

/// 参数初始化方式
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    /// 常数初始化
    Constant(f32),
    /// 全零
    Zeros,
    /// 全一
    Ones,
    /// 正态分布
    Normal { mean: f32, std: f32 },
    /// Kaiming/He 初始化（适用于 `ReLU`），`fan_in`取除首维外各维之积，
    /// 对卷积核`[C_out, C_in, kH, kW]`即`C_in * kH * kW`
    Kaiming,
}

impl Init {
    /// 生成初始化后的 Tensor（使用指定的 RNG）
    pub fn generate<R: Rng + ?Sized>(&self, shape: &[usize], rng: &mut R) -> Tensor {
        match self {
            Self::Constant(v) => &Tensor::ones(shape) * *v,
            Self::Zeros => Tensor::zeros(shape),
            Self::Ones => Tensor::ones(shape),
            Self::Normal { mean, std } => Tensor::new_normal_with_rng(*mean, *std, shape, rng),
            Self::Kaiming => {
                let fan_in: usize = shape.iter().skip(1).product::<usize>().max(1);
                let std = (2.0 / fan_in as f32).sqrt();
                Tensor::new_normal_with_rng(0.0, std, shape, rng)
            }
        }
    }
}
