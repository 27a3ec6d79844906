/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : 梯度下降优化器实现
 */

use super::base::{Optimizer, OptimizerState};
use crate::nn::NnError;
use crate::tensor::Tensor;

/// SGD (随机梯度下降) 优化器，可选动量与权重衰减
#[derive(Debug, Clone)]
pub struct SGD {
    state: OptimizerState,
    momentum: f32,
    /// 动量缓存，按参数顺序存放
    velocity: Vec<Option<Tensor>>,
}

impl SGD {
    /// 创建新的SGD优化器（无动量、无权重衰减）
    pub fn new(learning_rate: f32) -> Self {
        Self::with_options(learning_rate, 0.0, 0.0)
    }

    pub fn with_options(learning_rate: f32, momentum: f32, weight_decay: f32) -> Self {
        Self {
            state: OptimizerState::new(learning_rate, weight_decay),
            momentum,
            velocity: Vec::new(),
        }
    }

    pub fn momentum(&self) -> f32 {
        self.momentum
    }
}

impl Optimizer for SGD {
    fn step(&mut self, params: &mut [&mut Tensor], grads: &[Tensor]) -> Result<(), NnError> {
        OptimizerState::check_grads(params, grads)?;
        if self.velocity.len() != params.len() {
            self.velocity = vec![None; params.len()];
        }

        for ((param, grad), velocity) in params.iter_mut().zip(grads).zip(&mut self.velocity) {
            let mut update = self.state.effective_grad(param, grad);

            // 动量：v = μ * v + g
            if self.momentum != 0.0 {
                let v = velocity.get_or_insert_with(|| Tensor::zeros(grad.shape()));
                *v *= self.momentum;
                *v += &update;
                update = v.clone();
            }

            // 梯度下降更新：θ = θ - α * ∇θ
            **param -= self.state.learning_rate() * &update;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.velocity.clear();
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.state.set_learning_rate(lr);
    }
}
