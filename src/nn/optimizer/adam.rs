/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:30:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : Adam优化器实现
 */

use super::base::{Optimizer, OptimizerState};
use crate::nn::NnError;
use crate::tensor::Tensor;

/// Adam优化器
#[derive(Debug, Clone)]
pub struct Adam {
    state: OptimizerState,
    beta1: f32,
    beta2: f32,
    epsilon: f32,
    /// 一阶矩估计
    m: Vec<Option<Tensor>>,
    /// 二阶矩估计
    v: Vec<Option<Tensor>>,
    /// 时间步
    t: usize,
}

impl Adam {
    /// 创建新的Adam优化器
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Self::with_weight_decay(learning_rate, beta1, beta2, epsilon, 0.0)
    }

    /// 使用默认参数创建Adam优化器
    pub fn new_default(learning_rate: f32) -> Self {
        Self::new(learning_rate, 0.9, 0.999, 1e-8)
    }

    pub fn with_weight_decay(
        learning_rate: f32,
        beta1: f32,
        beta2: f32,
        epsilon: f32,
        weight_decay: f32,
    ) -> Self {
        Self {
            state: OptimizerState::new(learning_rate, weight_decay),
            beta1,
            beta2,
            epsilon,
            m: Vec::new(),
            v: Vec::new(),
            t: 0,
        }
    }

    /// 已执行的更新步数
    pub fn steps(&self) -> usize {
        self.t
    }
}

impl Optimizer for Adam {
    fn step(&mut self, params: &mut [&mut Tensor], grads: &[Tensor]) -> Result<(), NnError> {
        OptimizerState::check_grads(params, grads)?;
        if self.m.len() != params.len() {
            self.m = vec![None; params.len()];
            self.v = vec![None; params.len()];
            self.t = 0;
        }
        self.t += 1;

        for (index, (param, grad)) in params.iter_mut().zip(grads).enumerate() {
            let gradient = self.state.effective_grad(param, grad);
            let update = self.adam_update(index, &gradient);
            **param -= self.state.learning_rate() * &update;
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.m.clear();
        self.v.clear();
        self.t = 0;
    }

    fn learning_rate(&self) -> f32 {
        self.state.learning_rate()
    }

    fn set_learning_rate(&mut self, lr: f32) {
        self.state.set_learning_rate(lr);
    }
}

impl Adam {
    /// Adam 核心逻辑：更新第`index`个参数的矩估计，返回 m_hat / (√v_hat + ε)
    fn adam_update(&mut self, index: usize, gradient: &Tensor) -> Tensor {
        // 预计算缩放后的梯度项
        let scaled_gradient = gradient * (1.0 - self.beta1);
        let gradient_squared = gradient * gradient;
        let scaled_gradient_squared = &gradient_squared * (1.0 - self.beta2);

        // 原地更新一阶矩估计: m = β1 * m + (1 - β1) * g
        let m = self.m[index].get_or_insert_with(|| Tensor::zeros(gradient.shape()));
        *m *= self.beta1;
        *m += &scaled_gradient;

        // 原地更新二阶矩估计: v = β2 * v + (1 - β2) * g²
        let v = self.v[index].get_or_insert_with(|| Tensor::zeros(gradient.shape()));
        *v *= self.beta2;
        *v += &scaled_gradient_squared;

        // 偏差修正
        let m_hat = &*m / (1.0 - self.beta1.powi(self.t as i32));
        let v_hat = &*v / (1.0 - self.beta2.powi(self.t as i32));

        // θ 的更新量: m_hat / (√v_hat + ε)
        let denominator = &v_hat.sqrt() + self.epsilon;
        &m_hat / &denominator
    }
}
