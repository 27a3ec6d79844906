/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : MaxPool2d (2D 最大池化) 层
 *
 * - 输入格式：[batch_size, channels, H, W]
 * - 输出格式：[batch_size, channels, H', W']
 *
 * 等价于 PyTorch 的 nn.MaxPool2d（无填充、向下取整）
 */

use crate::nn::functional;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// `MaxPool2d` 层，无可学习参数
///
/// # 输出尺寸计算
/// ```text
/// H' = (H - kernel_h) / stride_h + 1
/// W' = (W - kernel_w) / stride_w + 1
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxPool2d {
    kernel_size: (usize, usize),
    stride: (usize, usize),
}

impl MaxPool2d {
    /// `stride`若为 None 则默认等于 `kernel_size`
    pub fn new(kernel_size: (usize, usize), stride: Option<(usize, usize)>) -> Self {
        Self {
            kernel_size,
            stride: stride.unwrap_or(kernel_size),
        }
    }
}

impl Module for MaxPool2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        functional::max_pool2d(input, self.kernel_size, self.stride)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}
