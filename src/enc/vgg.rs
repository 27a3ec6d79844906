/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : VGG 骨干网络（11/13/16/19 层，可选批归一化）构建为多层编码器
 *
 * 层命名（与常见风格迁移实现一致）：
 * - preprocessing：ImageNet 标准化
 * - conv{块}_{序号}、bn{块}_{序号}（仅`_bn`版本）、relu{块}_{序号}
 * - pool{块}：2x2 最大池化
 */

use tracing::{debug, warn};

use super::preprocessing::Preprocessing;
use super::weights::WeightProvider;
use super::{BackboneOptions, EncoderError, MultiLayerEncoder};
use crate::nn::Module;
use crate::nn::layer::{BatchNorm2d, Conv2d, MaxPool2d, ReLU};

/// VGG 的各种配置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VggArch {
    Vgg11,
    Vgg13,
    Vgg16,
    Vgg19,
}

impl VggArch {
    /// 每个块中的卷积层个数
    const fn convs_per_block(self) -> [usize; 5] {
        match self {
            Self::Vgg11 => [1, 1, 2, 2, 2],
            Self::Vgg13 => [2, 2, 2, 2, 2],
            Self::Vgg16 => [2, 2, 3, 3, 3],
            Self::Vgg19 => [2, 2, 4, 4, 4],
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Vgg11 => "vgg11",
            Self::Vgg13 => "vgg13",
            Self::Vgg16 => "vgg16",
            Self::Vgg19 => "vgg19",
        }
    }
}

const BLOCK_CHANNELS: [usize; 5] = [64, 128, 256, 512, 512];

#[derive(Debug, Clone, PartialEq, Eq)]
enum LayerSpec {
    Preprocessing,
    Conv { in_channels: usize, out_channels: usize },
    BatchNorm { channels: usize },
    ReLU,
    Pool,
}

/// 按顺序列出（层名，层配置）
fn layer_specs(arch: VggArch, batch_norm: bool) -> Vec<(String, LayerSpec)> {
    let mut specs = vec![("preprocessing".to_string(), LayerSpec::Preprocessing)];
    let mut in_channels = 3;
    for (block, (&convs, &out_channels)) in arch
        .convs_per_block()
        .iter()
        .zip(BLOCK_CHANNELS.iter())
        .enumerate()
    {
        let block = block + 1;
        for index in 1..=convs {
            specs.push((
                format!("conv{block}_{index}"),
                LayerSpec::Conv {
                    in_channels,
                    out_channels,
                },
            ));
            if batch_norm {
                specs.push((
                    format!("bn{block}_{index}"),
                    LayerSpec::BatchNorm {
                        channels: out_channels,
                    },
                ));
            }
            specs.push((format!("relu{block}_{index}"), LayerSpec::ReLU));
            in_channels = out_channels;
        }
        specs.push((format!("pool{block}"), LayerSpec::Pool));
    }
    specs
}

/// VGG 的全部层名
pub fn vgg_layer_names(arch: VggArch, batch_norm: bool) -> Vec<String> {
    layer_specs(arch, batch_norm)
        .into_iter()
        .map(|(name, _)| name)
        .collect()
}

/// 构建 VGG 多层编码器
///
/// 若`options.required_layers`非空，则只构建到其中最深的层为止（未知层名会在分配权重前报错）
pub fn vgg_multi_layer_encoder(
    arch: VggArch,
    batch_norm: bool,
    options: &BackboneOptions,
) -> Result<MultiLayerEncoder, EncoderError> {
    let mut specs = layer_specs(arch, batch_norm);
    if !options.required_layers.is_empty() {
        let mut deepest = 0;
        for layer in &options.required_layers {
            let position = specs
                .iter()
                .position(|(name, _)| name == layer)
                .ok_or_else(|| EncoderError::UnknownLayer {
                    layer: layer.clone(),
                })?;
            deepest = deepest.max(position);
        }
        specs.truncate(deepest + 1);
    }

    debug!(
        backbone = arch.name(),
        batch_norm,
        layers = specs.len(),
        weights = ?options.weights,
        "构建 VGG 编码器"
    );

    if !options.weights.is_pretrained() {
        warn!(
            backbone = arch.name(),
            weights = ?options.weights,
            "VGG 编码器使用随机权重，感知损失没有意义；请通过`WeightSource::Npz`提供预训练权重"
        );
    }
    let mut provider = WeightProvider::open(&options.weights)?;
    let mut layers: Vec<(String, Box<dyn Module>)> = Vec::with_capacity(specs.len());
    for (name, spec) in specs {
        let module: Box<dyn Module> = match spec {
            LayerSpec::Preprocessing => Box::new(Preprocessing::imagenet()),
            LayerSpec::Conv {
                in_channels,
                out_channels,
            } => Box::new(build_conv(
                &name,
                in_channels,
                out_channels,
                &mut provider,
            )?),
            LayerSpec::BatchNorm { channels } => {
                Box::new(build_batch_norm(&name, channels, &mut provider)?)
            }
            LayerSpec::ReLU => Box::new(ReLU),
            LayerSpec::Pool => Box::new(MaxPool2d::new((2, 2), None)),
        };
        layers.push((name, module));
    }
    MultiLayerEncoder::new(layers)
}

fn build_conv(
    name: &str,
    in_channels: usize,
    out_channels: usize,
    provider: &mut WeightProvider,
) -> Result<Conv2d, EncoderError> {
    Ok(match provider {
        WeightProvider::Random(rng) => {
            Conv2d::new(in_channels, out_channels, (3, 3), (1, 1), (1, 1), true, rng)
        }
        WeightProvider::Npz(reader) => {
            let kernel = WeightProvider::read(
                reader,
                &format!("{name}.weight"),
                &[out_channels, in_channels, 3, 3],
            )?;
            let bias = WeightProvider::read(reader, &format!("{name}.bias"), &[out_channels])?;
            // torchvision 的`_bn`版本中卷积同样带偏置
            Conv2d::from_weights(kernel, Some(bias), (1, 1), (1, 1))?
        }
    })
}

fn build_batch_norm(
    name: &str,
    channels: usize,
    provider: &mut WeightProvider,
) -> Result<BatchNorm2d, EncoderError> {
    let mut layer = BatchNorm2d::new(channels);
    if let WeightProvider::Npz(reader) = provider {
        let key = |suffix: &str| format!("{name}.{suffix}");
        layer.set_weight(WeightProvider::read(reader, &key("weight"), &[channels])?)?;
        layer.set_bias(WeightProvider::read(reader, &key("bias"), &[channels])?)?;
        let mean = WeightProvider::read(reader, &key("running_mean"), &[channels])?;
        let var = WeightProvider::read(reader, &key("running_var"), &[channels])?;
        layer.set_running_stats(mean, var)?;
    }
    Ok(layer)
}
