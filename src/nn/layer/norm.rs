/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 归一化层：InstanceNorm2d（风格迁移网络常用）与 BatchNorm2d（推理模式，用于`_bn`骨干网络）
 */

use super::conv2d::replace_param;
use crate::nn::functional;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// 实例归一化层，`affine`为真时带可训练的按通道缩放与偏移
#[derive(Debug, Clone)]
pub struct InstanceNorm2d {
    weight: Option<Tensor>,
    bias: Option<Tensor>,
    eps: f32,
}

impl InstanceNorm2d {
    pub fn new(num_features: usize, affine: bool) -> Self {
        Self {
            weight: affine.then(|| Tensor::ones(&[num_features])),
            bias: affine.then(|| Tensor::zeros(&[num_features])),
            eps: 1e-5,
        }
    }
}

impl Module for InstanceNorm2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        functional::instance_norm(input, self.weight.as_ref(), self.bias.as_ref(), self.eps)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.weight.iter().chain(self.bias.iter()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.weight.iter_mut().chain(self.bias.iter_mut()).collect()
    }
}

/// 批归一化层（仅推理模式）：前向使用记录的统计量，不再更新
#[derive(Debug, Clone)]
pub struct BatchNorm2d {
    weight: Tensor,
    bias: Tensor,
    running_mean: Tensor,
    running_var: Tensor,
    eps: f32,
}

impl BatchNorm2d {
    pub fn new(num_features: usize) -> Self {
        Self {
            weight: Tensor::ones(&[num_features]),
            bias: Tensor::zeros(&[num_features]),
            running_mean: Tensor::zeros(&[num_features]),
            running_var: Tensor::ones(&[num_features]),
            eps: 1e-5,
        }
    }

    pub fn num_features(&self) -> usize {
        self.weight.size()
    }

    pub fn set_weight(&mut self, weight: Tensor) -> Result<(), NnError> {
        replace_param(&mut self.weight, weight, "BatchNorm 缩放")
    }

    pub fn set_bias(&mut self, bias: Tensor) -> Result<(), NnError> {
        replace_param(&mut self.bias, bias, "BatchNorm 偏移")
    }

    /// 设置记录的统计量（均值、方差）
    pub fn set_running_stats(&mut self, mean: Tensor, var: Tensor) -> Result<(), NnError> {
        replace_param(&mut self.running_mean, mean, "running_mean")?;
        replace_param(&mut self.running_var, var, "running_var")
    }
}

impl Module for BatchNorm2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        functional::batch_norm(
            input,
            &self.running_mean,
            &self.running_var,
            Some(&self.weight),
            Some(&self.bias),
            self.eps,
        )
    }

    // 统计量不是可训练参数
    fn parameters(&self) -> Vec<&Tensor> {
        vec![&self.weight, &self.bias]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![&mut self.weight, &mut self.bias]
    }
}
