/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : 优化器基础trait和辅助结构
 */

use crate::nn::NnError;
use crate::tensor::Tensor;

/// 优化器核心 trait
pub trait Optimizer: Send {
    /// 参数更新（使用外部训练器算好的梯度）
    ///
    /// `PyTorch` 风格训练循环：
    /// ```ignore
    /// let loss = task.training_step(&batch)?;
    /// let grads = trainer.backward(...);            // ← 梯度由外部给出
    /// optimizer.step(&mut model.parameters_mut(), &grads)?; // ← 只更新参数
    /// ```
    ///
    /// `grads`须与`params`一一对应（顺序与形状均一致）。
    fn step(&mut self, params: &mut [&mut Tensor], grads: &[Tensor]) -> Result<(), NnError>;

    /// 重置累积状态（动量、矩估计等）
    fn reset(&mut self);

    /// 获取学习率
    fn learning_rate(&self) -> f32;

    /// 设置学习率
    fn set_learning_rate(&mut self, lr: f32);
}

/// 优化器状态管理（内部实现，不对外暴露）
#[derive(Debug, Clone)]
pub(crate) struct OptimizerState {
    /// 学习率
    learning_rate: f32,
    /// L2 权重衰减系数
    weight_decay: f32,
}

impl OptimizerState {
    pub(crate) const fn new(learning_rate: f32, weight_decay: f32) -> Self {
        Self {
            learning_rate,
            weight_decay,
        }
    }

    /// 获取学习率
    pub(crate) const fn learning_rate(&self) -> f32 {
        self.learning_rate
    }

    /// 设置学习率
    pub(crate) const fn set_learning_rate(&mut self, lr: f32) {
        self.learning_rate = lr;
    }

    /// 校验参数与梯度是否一一对应
    pub(crate) fn check_grads(params: &[&mut Tensor], grads: &[Tensor]) -> Result<(), NnError> {
        if params.len() != grads.len() {
            return Err(NnError::InvalidOperation(format!(
                "参数个数（{}）与梯度个数（{}）不一致",
                params.len(),
                grads.len()
            )));
        }
        for (param, grad) in params.iter().zip(grads) {
            if !param.is_same_shape(grad) {
                return Err(NnError::ShapeMismatch {
                    expected: param.shape().to_vec(),
                    got: grad.shape().to_vec(),
                    message: "梯度形状须与参数一致".to_string(),
                });
            }
        }
        Ok(())
    }

    /// 叠加权重衰减后的有效梯度：g + λ·θ
    pub(crate) fn effective_grad(&self, param: &Tensor, grad: &Tensor) -> Tensor {
        if self.weight_decay == 0.0 {
            grad.clone()
        } else {
            grad + self.weight_decay * param
        }
    }
}
