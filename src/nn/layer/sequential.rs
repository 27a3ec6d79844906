/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : Sequential 容器：按顺序串联若干模块
 */

use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// 顺序容器，前向时依次调用各子模块
///
/// # 使用示例
/// ```ignore
/// let block = Sequential::new()
///     .add(Conv2d::new(3, 8, (3, 3), (1, 1), (1, 1), true, &mut rng))
///     .add(ReLU);
/// ```
#[derive(Default)]
pub struct Sequential {
    modules: Vec<Box<dyn Module>>,
}

impl Sequential {
    pub fn new() -> Self {
        Self::default()
    }

    /// 追加一个模块（链式调用）
    pub fn add<M: Module + 'static>(mut self, module: M) -> Self {
        self.modules.push(Box::new(module));
        self
    }

    pub fn push(&mut self, module: Box<dyn Module>) {
        self.modules.push(module);
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

impl Module for Sequential {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        let mut output = input.clone();
        for module in &self.modules {
            output = module.forward(&output)?;
        }
        Ok(output)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.modules.iter().flat_map(|m| m.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.modules
            .iter_mut()
            .flat_map(|m| m.parameters_mut())
            .collect()
    }
}
