/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 图像变换网络（Johnson 等人的快速风格迁移结构）
 *
 * 结构（输入/输出均为 [batch, 3, H, W]，H、W 须为4的倍数且不小于8）：
 * - 9x9 卷积 3->32，步长2卷积 32->64、64->128（下采样4倍）
 * - 5 个残差块（128 通道）
 * - 最近邻上采样 + 卷积 128->64、64->32
 * - 9x9 卷积 32->3，Sigmoid 输出到[0, 1]
 * 卷积均使用镜像填充，除输出层外都接实例归一化与 ReLU
 */

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::nn::functional::{self, PaddingMode};
use crate::nn::layer::{Conv2d, InstanceNorm2d, Sequential, Upsample};
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

const NUM_RESIDUAL_BLOCKS: usize = 5;

/// 卷积块：[上采样] -> 镜像填充卷积 -> [实例归一化] -> [ReLU]
struct ConvBlock {
    upsample: Option<Upsample>,
    conv: Conv2d,
    norm: Option<InstanceNorm2d>,
    relu: bool,
}

impl ConvBlock {
    fn new<R: Rng + ?Sized>(
        in_channels: usize,
        out_channels: usize,
        kernel: usize,
        stride: usize,
        rng: &mut R,
    ) -> Self {
        let padding = kernel / 2;
        let conv = Conv2d::new(
            in_channels,
            out_channels,
            (kernel, kernel),
            (stride, stride),
            (padding, padding),
            true,
            rng,
        )
        .with_padding_mode(PaddingMode::Reflect);
        Self {
            upsample: None,
            conv,
            norm: Some(InstanceNorm2d::new(out_channels, true)),
            relu: true,
        }
    }

    fn upsampled(mut self, scale: usize) -> Self {
        self.upsample = Some(Upsample::new(scale));
        self
    }

    fn without_activation(mut self) -> Self {
        self.relu = false;
        self
    }

    fn without_norm(mut self) -> Self {
        self.norm = None;
        self
    }
}

impl Module for ConvBlock {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        let mut x = match &self.upsample {
            Some(upsample) => self.conv.forward(&upsample.forward(input)?)?,
            None => self.conv.forward(input)?,
        };
        if let Some(norm) = &self.norm {
            x = norm.forward(&x)?;
        }
        Ok(if self.relu { functional::relu(&x) } else { x })
    }

    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = self.conv.parameters();
        params.extend(self.norm.iter().flat_map(|n| n.parameters()));
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.conv.parameters_mut();
        params.extend(self.norm.iter_mut().flat_map(|n| n.parameters_mut()));
        params
    }
}

/// 残差块：x + conv_in(relu(conv_in(x)))
struct ResidualBlock {
    first: ConvBlock,
    second: ConvBlock,
}

impl ResidualBlock {
    fn new<R: Rng + ?Sized>(channels: usize, rng: &mut R) -> Self {
        Self {
            first: ConvBlock::new(channels, channels, 3, 1, rng),
            second: ConvBlock::new(channels, channels, 3, 1, rng).without_activation(),
        }
    }
}

impl Module for ResidualBlock {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        let residual = self.second.forward(&self.first.forward(input)?)?;
        Ok(input + &residual)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        let mut params = self.first.parameters();
        params.extend(self.second.parameters());
        params
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        let mut params = self.first.parameters_mut();
        params.extend(self.second.parameters_mut());
        params
    }
}

/// 图像变换网络，作为风格迁移任务的默认模型
pub struct TransformerNet {
    layers: Sequential,
}

impl TransformerNet {
    /// 以固定种子初始化，同一种子得到相同的权重
    pub fn new(seed: u64) -> Self {
        Self::with_rng(&mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut layers = Sequential::new()
            .add(ConvBlock::new(3, 32, 9, 1, rng))
            .add(ConvBlock::new(32, 64, 3, 2, rng))
            .add(ConvBlock::new(64, 128, 3, 2, rng));
        for _ in 0..NUM_RESIDUAL_BLOCKS {
            layers.push(Box::new(ResidualBlock::new(128, rng)));
        }
        let layers = layers
            .add(ConvBlock::new(128, 64, 3, 1, rng).upsampled(2))
            .add(ConvBlock::new(64, 32, 3, 1, rng).upsampled(2))
            .add(
                ConvBlock::new(32, 3, 9, 1, rng)
                    .without_norm()
                    .without_activation(),
            );
        Self { layers }
    }
}

impl Module for TransformerNet {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        let (height, width) = match input.shape() {
            &[_, 3, h, w] => (h, w),
            shape => {
                return Err(NnError::ShapeMismatch {
                    expected: vec![0, 3, 0, 0], // 占位
                    got: shape.to_vec(),
                    message: "变换网络的输入须为 [batch, 3, H, W]".to_string(),
                });
            }
        };
        if height % 4 != 0 || width % 4 != 0 || height < 8 || width < 8 {
            return Err(NnError::InvalidOperation(format!(
                "变换网络的输入尺寸须为4的倍数且不小于8，实际为 {height}x{width}"
            )));
        }
        Ok(functional::sigmoid(&self.layers.forward(input)?))
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.layers.parameters()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers.parameters_mut()
    }
}
