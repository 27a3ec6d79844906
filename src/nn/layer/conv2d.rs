/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : Conv2d (2D 卷积) 层 - PyTorch 风格 API
 *
 * 输入/输出形状：
 * - 输入：[batch_size, in_channels, H, W]
 * - 输出：[batch_size, out_channels, H', W']
 *
 * 输出尺寸计算：
 * H' = (H + 2*padding_h - kernel_h) / stride_h + 1
 * W' = (W + 2*padding_w - kernel_w) / stride_w + 1
 *
 * 计算：output = conv2d(x, K) + b
 */

use rand::Rng;

use crate::nn::functional::{self, PaddingMode};
use crate::nn::{Init, Module, NnError};
use crate::tensor::Tensor;

/// Conv2d (2D 卷积) 层
///
/// PyTorch 风格的卷积层：`output = conv2d(x, K) + b`
///
/// # 使用示例
/// ```ignore
/// let mut rng = StdRng::seed_from_u64(42);
/// let conv = Conv2d::new(3, 64, (3, 3), (1, 1), (1, 1), true, &mut rng);
/// let h = functional::relu(&conv.forward(&x)?);
/// ```
#[derive(Debug, Clone)]
pub struct Conv2d {
    /// 卷积核参数 [out_channels, in_channels, kernel_h, kernel_w]
    kernel: Tensor,
    /// 偏置参数 [out_channels]（可选）
    bias: Option<Tensor>,
    /// 步长 (stride_h, stride_w)
    stride: (usize, usize),
    /// 填充 (padding_h, padding_w)
    padding: (usize, usize),
    padding_mode: PaddingMode,
}

impl Conv2d {
    /// 创建新的 Conv2d 层：卷积核 Kaiming 初始化，偏置零初始化
    ///
    /// # 参数
    /// - `in_channels`: 输入通道数
    /// - `out_channels`: 输出通道数
    /// - `kernel_size`: 卷积核大小 (kH, kW)
    /// - `stride`: 步长 (sH, sW)
    /// - `padding`: 填充 (pH, pW)
    /// - `use_bias`: 是否使用偏置
    /// - `rng`: 随机数生成器（固定种子即可复现）
    pub fn new<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel_size: (usize, usize),
        stride: (usize, usize),
        padding: (usize, usize),
        use_bias: bool,
        rng: &mut R,
    ) -> Self {
        let (k_h, k_w) = kernel_size;
        let kernel = Init::Kaiming.generate(&[out_channels, in_channels, k_h, k_w], rng);
        let bias = use_bias.then(|| Init::Zeros.generate(&[out_channels], rng));
        Self {
            kernel,
            bias,
            stride,
            padding,
            padding_mode: PaddingMode::Zeros,
        }
    }

    /// 由已有的卷积核与偏置构建（如加载预训练权重）
    pub fn from_weights(
        kernel: Tensor,
        bias: Option<Tensor>,
        stride: (usize, usize),
        padding: (usize, usize),
    ) -> Result<Self, NnError> {
        if kernel.dimension() != 4 {
            return Err(NnError::ShapeMismatch {
                expected: vec![0, 0, 0, 0], // 占位
                got: kernel.shape().to_vec(),
                message: "卷积核必须是 4D [C_out, C_in, kH, kW]".to_string(),
            });
        }
        let mut conv = Self {
            kernel,
            bias: None,
            stride,
            padding,
            padding_mode: PaddingMode::Zeros,
        };
        if let Some(bias) = bias {
            conv.bias = Some(Tensor::zeros(&[conv.out_channels()]));
            conv.set_bias(bias)?;
        }
        Ok(conv)
    }

    /// 改用指定的填充方式
    pub fn with_padding_mode(mut self, mode: PaddingMode) -> Self {
        self.padding_mode = mode;
        self
    }

    pub fn in_channels(&self) -> usize {
        self.kernel.shape()[1]
    }

    pub fn out_channels(&self) -> usize {
        self.kernel.shape()[0]
    }

    pub fn kernel(&self) -> &Tensor {
        &self.kernel
    }

    pub fn bias(&self) -> Option<&Tensor> {
        self.bias.as_ref()
    }

    /// 替换卷积核，形状须与原卷积核一致
    pub fn set_kernel(&mut self, kernel: Tensor) -> Result<(), NnError> {
        replace_param(&mut self.kernel, kernel, "卷积核")
    }

    /// 替换偏置，形状须为[C_out]；未启用偏置时报错
    pub fn set_bias(&mut self, bias: Tensor) -> Result<(), NnError> {
        match self.bias.as_mut() {
            Some(current) => replace_param(current, bias, "偏置"),
            None => Err(NnError::InvalidOperation(
                "该卷积层未启用偏置".to_string(),
            )),
        }
    }
}

impl Module for Conv2d {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        functional::conv2d(
            input,
            &self.kernel,
            self.bias.as_ref(),
            self.stride,
            self.padding,
            self.padding_mode,
        )
    }

    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = vec![&self.kernel];
        params.extend(self.bias.as_ref());
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = vec![&mut self.kernel];
        params.extend(self.bias.as_mut());
        params
    }
}

/// 以形状一致为前提替换参数
pub(in crate::nn) fn replace_param(
    current: &mut Tensor,
    new: Tensor,
    name: &str,
) -> Result<(), NnError> {
    if !current.is_same_shape(&new) {
        return Err(NnError::ShapeMismatch {
            expected: current.shape().to_vec(),
            got: new.shape().to_vec(),
            message: format!("{name}形状与层定义不符"),
        });
    }
    *current = new;
    Ok(())
}
