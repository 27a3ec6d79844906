/*
 * @Author       : 老董
 * @Date         : 2026-01-09
 * @Description  : Module trait 定义
 */

use super::NnError;
use crate::tensor::Tensor;

/// 模块 trait
///
/// # 设计原则
/// - 只做前向计算：梯度由外部训练器给出，优化器按`parameters_mut()`的顺序接收梯度
/// - `new()` **不是** trait 方法（参数各异）
/// - 要求`Send + Sync`，以便编码器等冻结的模块可经`Arc`共享
///
/// # 使用示例
///
/// ```ignore
/// use only_style::nn::{Module, NnError, layer::Conv2d};
///
/// struct Head {
///     conv: Conv2d,
/// }
///
/// impl Module for Head {
///     fn forward(&self, x: &Tensor) -> Result<Tensor, NnError> {
///         Ok(functional::relu(&self.conv.forward(x)?))
///     }
///     fn parameters(&self) -> Vec<&Tensor> {
///         self.conv.parameters()
///     }
///     fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
///         self.conv.parameters_mut()
///     }
/// }
/// ```
pub trait Module: Send + Sync {
    /// 前向计算
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError>;

    /// 获取所有可训练参数
    fn parameters(&self) -> Vec<&Tensor>;

    /// 获取所有可训练参数的可变引用，顺序须与`parameters()`一致
    fn parameters_mut(&mut self) -> Vec<&mut Tensor>;

    /// 获取参数（标量）总数
    fn num_params(&self) -> usize {
        self.parameters().iter().map(|p| p.size()).sum()
    }
}
