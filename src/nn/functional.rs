/*
 * @Author       : 老董
 * @Date         : 2025-12-22
 * @Description  : 函数式算子（仅前向）
 *
 * 约定：
 * - Batch-First 格式：图像/特征图输入必须是 4D [batch, C, H, W]
 * - 单样本使用 batch=1，如 [1, C, H, W]
 * - 卷积使用 im2col + 矩阵乘，并用 Rayon 在 batch 维度并行加速
 */

use ndarray::{Array2, ArrayView2};
use rayon::prelude::*;

use super::NnError;
use crate::tensor::Tensor;

/// 卷积/填充时的填充方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PaddingMode {
    /// 零填充（默认）
    #[default]
    Zeros,
    /// 镜像填充（不重复边缘像素），要求填充量小于对应维度
    Reflect,
}

/// 校验并拆出 4D 输入的各维
fn dims4(input: &Tensor, what: &str) -> Result<(usize, usize, usize, usize), NnError> {
    match input.shape() {
        &[b, c, h, w] => Ok((b, c, h, w)),
        shape => Err(NnError::ShapeMismatch {
            expected: vec![0, 0, 0, 0], // 占位
            got: shape.to_vec(),
            message: format!("{what}必须是 4D [batch, C, H, W]，单样本请使用 [1, C, H, W]"),
        }),
    }
}

/// 对 4D 输入的 H、W 维做填充
pub fn pad(input: &Tensor, padding: (usize, usize), mode: PaddingMode) -> Result<Tensor, NnError> {
    let (batch, channels, height, width) = dims4(input, "填充输入")?;
    let (pad_h, pad_w) = padding;
    if pad_h == 0 && pad_w == 0 {
        return Ok(input.clone());
    }
    if mode == PaddingMode::Reflect && (pad_h >= height || pad_w >= width) {
        return Err(NnError::InvalidOperation(format!(
            "镜像填充量 {padding:?} 必须小于输入尺寸 {height}x{width}"
        )));
    }

    let new_h = height + 2 * pad_h;
    let new_w = width + 2 * pad_w;
    let source = input.data_as_slice();
    let mut data = vec![0.0f32; batch * channels * new_h * new_w];

    let reflect = |i: isize, len: usize| -> usize {
        let len = len as isize;
        let i = if i < 0 { -i } else { i };
        (if i >= len { 2 * len - 2 - i } else { i }) as usize
    };

    for plane in 0..batch * channels {
        let src = &source[plane * height * width..(plane + 1) * height * width];
        let dst = &mut data[plane * new_h * new_w..(plane + 1) * new_h * new_w];
        for y in 0..new_h {
            let sy = y as isize - pad_h as isize;
            for x in 0..new_w {
                let sx = x as isize - pad_w as isize;
                dst[y * new_w + x] = match mode {
                    PaddingMode::Zeros => {
                        if sy < 0 || sx < 0 || sy >= height as isize || sx >= width as isize {
                            0.0
                        } else {
                            src[sy as usize * width + sx as usize]
                        }
                    }
                    PaddingMode::Reflect => src[reflect(sy, height) * width + reflect(sx, width)],
                };
            }
        }
    }
    Ok(Tensor::new(&data, &[batch, channels, new_h, new_w]))
}

/// 2D 卷积
///
/// # 参数
/// - `input`: [batch, `C_in`, H, W]
/// - `weight`: [`C_out`, `C_in`, kH, kW]
/// - `bias`: [`C_out`]（可选）
/// - `stride`: 步长 (sH, sW)
/// - `padding`: 填充 (pH, pW)
///
/// # 输出尺寸计算
/// ```text
/// H' = (H + 2*padding_h - kernel_h) / stride_h + 1
/// W' = (W + 2*padding_w - kernel_w) / stride_w + 1
/// ```
pub fn conv2d(
    input: &Tensor,
    weight: &Tensor,
    bias: Option<&Tensor>,
    stride: (usize, usize),
    padding: (usize, usize),
    mode: PaddingMode,
) -> Result<Tensor, NnError> {
    let (batch, in_channels, _, _) = dims4(input, "Conv2d 输入")?;
    let (out_channels, kernel_in_channels, kernel_h, kernel_w) = match weight.shape() {
        &[o, c, kh, kw] => (o, c, kh, kw),
        shape => {
            return Err(NnError::ShapeMismatch {
                expected: vec![0, 0, 0, 0], // 占位
                got: shape.to_vec(),
                message: "卷积核必须是 4D [C_out, C_in, kH, kW]".to_string(),
            });
        }
    };
    if kernel_in_channels != in_channels {
        return Err(NnError::ShapeMismatch {
            expected: vec![kernel_in_channels],
            got: vec![in_channels],
            message: format!(
                "输入通道数 {in_channels} 与卷积核输入通道数 {kernel_in_channels} 不匹配"
            ),
        });
    }
    if let Some(bias) = bias {
        if bias.shape() != [out_channels] {
            return Err(NnError::ShapeMismatch {
                expected: vec![out_channels],
                got: bias.shape().to_vec(),
                message: "偏置须为 1D [C_out]".to_string(),
            });
        }
    }
    let (stride_h, stride_w) = stride;
    if stride_h == 0 || stride_w == 0 {
        return Err(NnError::InvalidOperation("卷积步长必须大于0".to_string()));
    }

    let padded = pad(input, padding, mode)?;
    let (padded_h, padded_w) = (padded.shape()[2], padded.shape()[3]);
    if padded_h < kernel_h || padded_w < kernel_w {
        return Err(NnError::InvalidOperation(format!(
            "卷积输出尺寸无效：填充后输入 {padded_h}x{padded_w}，核 {kernel_h}x{kernel_w}"
        )));
    }
    let output_h = (padded_h - kernel_h) / stride_h + 1;
    let output_w = (padded_w - kernel_w) / stride_w + 1;

    let patch_len = in_channels * kernel_h * kernel_w;
    let kernel = ArrayView2::from_shape((out_channels, patch_len), weight.data_as_slice())
        .map_err(|e| NnError::InvalidOperation(format!("卷积核无法展开为矩阵：{e}")))?;
    let source = padded.data_as_slice();
    let sample_len = in_channels * padded_h * padded_w;

    // Rayon 并行处理每个 batch 样本：im2col 后与卷积核矩阵相乘
    let outputs: Vec<Array2<f32>> = (0..batch)
        .into_par_iter()
        .map(|bi| {
            let sample = &source[bi * sample_len..(bi + 1) * sample_len];
            let mut cols = Array2::<f32>::zeros((patch_len, output_h * output_w));
            for ci in 0..in_channels {
                let plane = &sample[ci * padded_h * padded_w..(ci + 1) * padded_h * padded_w];
                for ki in 0..kernel_h {
                    for kj in 0..kernel_w {
                        let row = (ci * kernel_h + ki) * kernel_w + kj;
                        let mut row_view = cols.row_mut(row);
                        for oy in 0..output_h {
                            let iy = oy * stride_h + ki;
                            for ox in 0..output_w {
                                row_view[oy * output_w + ox] = plane[iy * padded_w + ox * stride_w + kj];
                            }
                        }
                    }
                }
            }
            kernel.dot(&cols)
        })
        .collect();

    let mut data = Vec::with_capacity(batch * out_channels * output_h * output_w);
    for sample in &outputs {
        data.extend(sample.iter().copied());
    }
    let output = Tensor::new(&data, &[batch, out_channels, output_h, output_w]);

    Ok(match bias {
        Some(bias) => output + bias.reshape(&[1, out_channels, 1, 1]),
        None => output,
    })
}

/// `ReLU` 激活
pub fn relu(input: &Tensor) -> Tensor {
    input.map(|x| x.max(0.0))
}

/// Sigmoid 激活
pub fn sigmoid(input: &Tensor) -> Tensor {
    input.map(|x| 1.0 / (1.0 + (-x).exp()))
}

/// 2D 最大池化（向下取整，无填充）
pub fn max_pool2d(
    input: &Tensor,
    kernel_size: (usize, usize),
    stride: (usize, usize),
) -> Result<Tensor, NnError> {
    let (batch, channels, height, width) = dims4(input, "MaxPool2d 输入")?;
    let (kernel_h, kernel_w) = kernel_size;
    let (stride_h, stride_w) = stride;
    if kernel_h == 0 || kernel_w == 0 || stride_h == 0 || stride_w == 0 {
        return Err(NnError::InvalidOperation(
            "池化窗口与步长必须大于0".to_string(),
        ));
    }
    if height < kernel_h || width < kernel_w {
        return Err(NnError::InvalidOperation(format!(
            "池化窗口 {kernel_h}x{kernel_w} 大于输入 {height}x{width}"
        )));
    }
    let output_h = (height - kernel_h) / stride_h + 1;
    let output_w = (width - kernel_w) / stride_w + 1;

    let source = input.data_as_slice();
    let mut data = Vec::with_capacity(batch * channels * output_h * output_w);
    for plane in source.chunks(height * width) {
        for oy in 0..output_h {
            for ox in 0..output_w {
                let mut max_value = f32::NEG_INFINITY;
                for ki in 0..kernel_h {
                    for kj in 0..kernel_w {
                        let value = plane[(oy * stride_h + ki) * width + ox * stride_w + kj];
                        max_value = max_value.max(value);
                    }
                }
                data.push(max_value);
            }
        }
    }
    Ok(Tensor::new(&data, &[batch, channels, output_h, output_w]))
}

/// 实例归一化：对每个样本的每个通道，在 H*W 上减均值除以标准差（有偏方差），
/// 再按通道做仿射变换（`weight`、`bias`形状均为[C]）
pub fn instance_norm(
    input: &Tensor,
    weight: Option<&Tensor>,
    bias: Option<&Tensor>,
    eps: f32,
) -> Result<Tensor, NnError> {
    let (batch, channels, height, width) = dims4(input, "InstanceNorm2d 输入")?;
    check_channel_param(weight, channels, "weight")?;
    check_channel_param(bias, channels, "bias")?;
    let plane_len = height * width;

    let mut data = input.data_as_slice().to_vec();
    for (index, plane) in data.chunks_mut(plane_len).enumerate() {
        let c = index % channels;
        let mean = plane.iter().sum::<f32>() / plane_len as f32;
        let var = plane.iter().map(|x| (x - mean) * (x - mean)).sum::<f32>() / plane_len as f32;
        let scale = weight.map_or(1.0, |w| w.data_as_slice()[c]) / (var + eps).sqrt();
        let shift = bias.map_or(0.0, |b| b.data_as_slice()[c]);
        for x in plane.iter_mut() {
            *x = (*x - mean) * scale + shift;
        }
    }
    Ok(Tensor::new(&data, &[batch, channels, height, width]))
}

/// 批归一化（推理模式）：使用记录的`running_mean`、`running_var`按通道归一化
pub fn batch_norm(
    input: &Tensor,
    running_mean: &Tensor,
    running_var: &Tensor,
    weight: Option<&Tensor>,
    bias: Option<&Tensor>,
    eps: f32,
) -> Result<Tensor, NnError> {
    let (batch, channels, height, width) = dims4(input, "BatchNorm2d 输入")?;
    check_channel_param(Some(running_mean), channels, "running_mean")?;
    check_channel_param(Some(running_var), channels, "running_var")?;
    check_channel_param(weight, channels, "weight")?;
    check_channel_param(bias, channels, "bias")?;

    let means = running_mean.data_as_slice();
    let vars = running_var.data_as_slice();
    let mut data = input.data_as_slice().to_vec();
    for (index, plane) in data.chunks_mut(height * width).enumerate() {
        let c = index % channels;
        let scale = weight.map_or(1.0, |w| w.data_as_slice()[c]) / (vars[c] + eps).sqrt();
        let shift = bias.map_or(0.0, |b| b.data_as_slice()[c]);
        for x in plane.iter_mut() {
            *x = (*x - means[c]) * scale + shift;
        }
    }
    Ok(Tensor::new(&data, &[batch, channels, height, width]))
}

/// 最近邻上采样，H、W 各放大`scale`倍
pub fn upsample_nearest(input: &Tensor, scale: usize) -> Result<Tensor, NnError> {
    let (batch, channels, height, width) = dims4(input, "Upsample 输入")?;
    if scale == 0 {
        return Err(NnError::InvalidOperation("上采样倍数必须大于0".to_string()));
    }
    let (new_h, new_w) = (height * scale, width * scale);
    let mut data = Vec::with_capacity(batch * channels * new_h * new_w);
    for plane in input.data_as_slice().chunks(height * width) {
        for y in 0..new_h {
            for x in 0..new_w {
                data.push(plane[(y / scale) * width + x / scale]);
            }
        }
    }
    Ok(Tensor::new(&data, &[batch, channels, new_h, new_w]))
}

/// 按通道标准化：`(x - mean[c]) / std[c]`，常用于把[0, 1]图像转换到预训练网络的输入分布
pub fn normalize_channels(input: &Tensor, mean: &[f32], std: &[f32]) -> Result<Tensor, NnError> {
    let (_, channels, _, _) = dims4(input, "标准化输入")?;
    if mean.len() != channels || std.len() != channels {
        return Err(NnError::ShapeMismatch {
            expected: vec![channels],
            got: vec![mean.len(), std.len()],
            message: "均值与标准差的长度须等于通道数".to_string(),
        });
    }
    if std.iter().any(|&s| s == 0.0) {
        return Err(NnError::InvalidOperation("标准差不能为0".to_string()));
    }
    let mean = Tensor::new(mean, &[1, channels, 1, 1]);
    let std = Tensor::new(std, &[1, channels, 1, 1]);
    Ok((input - &mean) / &std)
}

fn check_channel_param(param: Option<&Tensor>, channels: usize, name: &str) -> Result<(), NnError> {
    match param {
        Some(p) if p.shape() != [channels] => Err(NnError::ShapeMismatch {
            expected: vec![channels],
            got: p.shape().to_vec(),
            message: format!("{name} 须为 1D [C]"),
        }),
        _ => Ok(()),
    }
}
