/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 风格迁移任务：图像变换网络 + 感知损失（内容特征重建 + 多层 Gram 风格损失）
 *
 * 风格图像在构建时绑定一次；每个训练步骤把输入图像设为内容图像，
 * 再对模型输出求感知损失。验证与测试阶段没有可比较的目标，总是报错
 */

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::base::{ConfiguredOptimizers, Options, OptimizerSpec, SchedulerSpec, Task, TaskCore};
use super::{SerializerSpec, StyleTransferConfig, TaskError};
use crate::data::{Batch, DataKey};
use crate::enc::{BackboneOptions, BackboneRegistry, WeightSource};
use crate::loss::{LossDict, PerceptualLoss};
use crate::models::TransformerNet;
use crate::nn::Module;
use crate::ops::{
    FeatureReconstructionOperator, Gram, GramNormalization, GramOperator, LayerWeights,
    MultiLayerEncodingOperator,
};
use crate::tensor::Tensor;
use crate::vision::{DEFAULT_STYLE_IMAGE, DemoImages, ImageSize, read_image};

/// 风格迁移所用的感知损失类型
pub type StyleTransferLoss =
    PerceptualLoss<FeatureReconstructionOperator, MultiLayerEncodingOperator<Gram>>;

/// 风格 Gram 矩阵的归一化方式：除以通道数的平方，与常见参考实现的数值一致
pub const STYLE_GRAM_NORMALIZATION: GramNormalization = GramNormalization::ChannelsSquared;

/// 风格图像来源
#[derive(Debug, Clone, Default)]
pub enum StyleImage {
    /// 示例图像`paint`，短边缩放到`style_image_size`
    #[default]
    Default,
    /// 从文件读取（不缩放）
    Path(PathBuf),
    /// 直接使用给定张量
    Tensor(Tensor),
}

/// 可复现的超参数记录（不含风格图像本身）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleTransferHparams {
    /// `"default"`或`"custom"`
    pub model: String,
    pub backbone: String,
    pub backbone_weights: WeightSource,
    pub content_layer: String,
    pub content_weight: f32,
    pub style_layers: Vec<String>,
    pub style_weight: f32,
    pub optimizer: serde_json::Value,
    pub optimizer_options: Options,
    pub scheduler: Option<serde_json::Value>,
    pub scheduler_options: Options,
    pub learning_rate: f32,
    pub serializer: Option<serde_json::Value>,
    pub style_image_size: u32,
    pub style_image_url: Option<String>,
    pub seed: u64,
}

impl StyleTransferHparams {
    pub fn to_json(&self) -> Result<String, TaskError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// `StyleTransfer`的构建器，未设置的项取默认值
pub struct StyleTransferBuilder {
    style_image: StyleImage,
    model: Option<Box<dyn Module>>,
    config: StyleTransferConfig,
    optimizer: Option<OptimizerSpec>,
    optimizer_options: Options,
    scheduler: Option<SchedulerSpec>,
    scheduler_options: Options,
    serializer: Option<SerializerSpec>,
    registry: Option<BackboneRegistry>,
    demo_images: Option<DemoImages>,
}

impl Default for StyleTransferBuilder {
    fn default() -> Self {
        Self::from_config(StyleTransferConfig::default())
    }
}

impl StyleTransferBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: StyleTransferConfig) -> Self {
        Self {
            style_image: StyleImage::Default,
            model: None,
            config,
            optimizer: None,
            optimizer_options: Options::new(),
            scheduler: None,
            scheduler_options: Options::new(),
            serializer: None,
            registry: None,
            demo_images: None,
        }
    }

    pub fn style_image(mut self, style_image: StyleImage) -> Self {
        self.style_image = style_image;
        self
    }

    pub fn style_image_path<P: Into<PathBuf>>(self, path: P) -> Self {
        self.style_image(StyleImage::Path(path.into()))
    }

    pub fn style_image_tensor(self, image: Tensor) -> Self {
        self.style_image(StyleImage::Tensor(image))
    }

    pub fn model<M: Module + 'static>(mut self, model: M) -> Self {
        self.model = Some(Box::new(model));
        self
    }

    pub fn boxed_model(mut self, model: Box<dyn Module>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn backbone(mut self, backbone: &str) -> Self {
        self.config.backbone = backbone.to_string();
        self
    }

    pub fn backbone_weights(mut self, weights: WeightSource) -> Self {
        self.config.backbone_weights = weights;
        self
    }

    pub fn content_layer(mut self, layer: &str) -> Self {
        self.config.content_layer = layer.to_string();
        self
    }

    pub fn content_weight(mut self, weight: f32) -> Self {
        self.config.content_weight = weight;
        self
    }

    pub fn style_layers<S: AsRef<str>>(mut self, layers: &[S]) -> Self {
        self.config.style_layers = layers.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }

    pub fn style_weight(mut self, weight: f32) -> Self {
        self.config.style_weight = weight;
        self
    }

    pub fn optimizer(mut self, optimizer: OptimizerSpec) -> Self {
        self.optimizer = Some(optimizer);
        self
    }

    pub fn optimizer_options(mut self, options: Options) -> Self {
        self.optimizer_options = options;
        self
    }

    pub fn scheduler(mut self, scheduler: SchedulerSpec) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    pub fn scheduler_options(mut self, options: Options) -> Self {
        self.scheduler_options = options;
        self
    }

    pub fn learning_rate(mut self, learning_rate: f32) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    pub fn serializer(mut self, serializer: SerializerSpec) -> Self {
        self.serializer = Some(serializer);
        self
    }

    pub fn style_image_size(mut self, size: u32) -> Self {
        self.config.style_image_size = size;
        self
    }

    /// 默认风格图像的下载地址与 MD5，缓存中没有时使用
    pub fn style_image_source(mut self, url: &str, md5: Option<&str>) -> Self {
        self.config.style_image_url = Some(url.to_string());
        self.config.style_image_md5 = md5.map(str::to_string);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = seed;
        self
    }

    /// 替换骨干网络注册表（默认为`BackboneRegistry::default()`）
    pub fn registry(mut self, registry: BackboneRegistry) -> Self {
        self.registry = Some(registry);
        self
    }

    /// 替换示例图像集合（默认为`DemoImages::default()`）
    pub fn demo_images(mut self, demo_images: DemoImages) -> Self {
        self.demo_images = Some(demo_images);
        self
    }

    pub fn build(self) -> Result<StyleTransfer, TaskError> {
        let config = self.config;
        let optimizer = self
            .optimizer
            .unwrap_or_else(|| OptimizerSpec::Config(config.optimizer.clone()));
        let scheduler = self
            .scheduler
            .or_else(|| config.scheduler.clone().map(SchedulerSpec::Config));

        let hparams = StyleTransferHparams {
            model: (if self.model.is_some() { "custom" } else { "default" }).to_string(),
            backbone: config.backbone.clone(),
            backbone_weights: config.backbone_weights.clone(),
            content_layer: config.content_layer.clone(),
            content_weight: config.content_weight,
            style_layers: config.style_layers.clone(),
            style_weight: config.style_weight,
            optimizer: optimizer.describe(),
            optimizer_options: self.optimizer_options.clone(),
            scheduler: scheduler.as_ref().map(SchedulerSpec::describe),
            scheduler_options: self.scheduler_options.clone(),
            learning_rate: config.learning_rate,
            serializer: self.serializer.as_ref().map(SerializerSpec::describe),
            style_image_size: config.style_image_size,
            style_image_url: config.style_image_url.clone(),
            seed: config.seed,
        };

        let style_image = match self.style_image {
            StyleImage::Default => {
                let mut demo_images = self.demo_images.unwrap_or_default();
                if let Some(url) = &config.style_image_url {
                    demo_images.set_source(
                        DEFAULT_STYLE_IMAGE,
                        url,
                        config.style_image_md5.as_deref(),
                    )?;
                }
                demo_images.read(
                    DEFAULT_STYLE_IMAGE,
                    Some(ImageSize::Edge(config.style_image_size)),
                )?
            }
            StyleImage::Path(path) => read_image(path, None)?,
            StyleImage::Tensor(image) => image,
        };

        let model = self
            .model
            .unwrap_or_else(|| Box::new(TransformerNet::new(config.seed)));

        let registry = self.registry.unwrap_or_default();
        let mut perceptual_loss = perceptual_loss(&registry, &config)?;
        perceptual_loss.set_style_image(&style_image)?;
        info!(
            backbone = %config.backbone,
            content_layer = %config.content_layer,
            style_layers = ?config.style_layers,
            style_shape = ?style_image.shape(),
            "构建风格迁移任务"
        );

        let core = TaskCore::new(model, config.learning_rate)
            .with_optimizer(optimizer, self.optimizer_options)
            .with_scheduler(scheduler, self.scheduler_options)
            .with_serializer(self.serializer);

        Ok(StyleTransfer {
            core,
            perceptual_loss,
            style_image,
            hparams,
        })
    }
}

/// 组装感知损失：内容层的特征重建损失 + 各风格层的 Gram 损失（层权重求和后乘以风格权重）
///
/// 编码器只构建到内容层与风格层中最深的一层，并在所有算子间共享
pub fn perceptual_loss(
    registry: &BackboneRegistry,
    config: &StyleTransferConfig,
) -> Result<StyleTransferLoss, TaskError> {
    let mut required_layers = vec![config.content_layer.clone()];
    required_layers.extend(config.style_layers.iter().cloned());
    let options = BackboneOptions::default()
        .with_weights(config.backbone_weights.clone())
        .with_required_layers(&required_layers);
    let encoder = Arc::new(registry.get(&config.backbone, &options)?);

    let content_loss = FeatureReconstructionOperator::feature_reconstruction(
        encoder.extract_encoder(&config.content_layer)?,
        config.content_weight,
    );
    let style_loss = MultiLayerEncodingOperator::new(
        &encoder,
        &config.style_layers,
        |encoder, layer_weight| GramOperator::gram(encoder, STYLE_GRAM_NORMALIZATION, layer_weight),
        &LayerWeights::Sum,
        config.style_weight,
    )?;
    Ok(PerceptualLoss::new(content_loss, style_loss))
}

/// 风格迁移任务
pub struct StyleTransfer {
    core: TaskCore,
    perceptual_loss: StyleTransferLoss,
    style_image: Tensor,
    hparams: StyleTransferHparams,
}

impl std::fmt::Debug for StyleTransfer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StyleTransfer")
            .field("hparams", &self.hparams)
            .field("style_shape", &self.style_image.shape())
            .finish()
    }
}

impl StyleTransfer {
    pub fn builder() -> StyleTransferBuilder {
        StyleTransferBuilder::new()
    }

    /// 全部取默认值构建
    pub fn new() -> Result<Self, TaskError> {
        StyleTransferBuilder::new().build()
    }

    pub fn from_config(config: StyleTransferConfig) -> Result<Self, TaskError> {
        StyleTransferBuilder::from_config(config).build()
    }

    pub fn core(&self) -> &TaskCore {
        &self.core
    }

    pub fn core_mut(&mut self) -> &mut TaskCore {
        &mut self.core
    }

    pub fn model(&self) -> &dyn Module {
        self.core.model()
    }

    pub fn model_mut(&mut self) -> &mut dyn Module {
        self.core.model_mut()
    }

    pub fn perceptual_loss(&self) -> &StyleTransferLoss {
        &self.perceptual_loss
    }

    /// 绑定的风格图像
    pub fn style_image(&self) -> &Tensor {
        &self.style_image
    }

    pub fn hparams(&self) -> &StyleTransferHparams {
        &self.hparams
    }

    /// 骨干网络是否加载了预训练权重
    pub fn uses_pretrained_backbone(&self) -> bool {
        self.hparams.backbone_weights.is_pretrained()
    }

    /// 更换风格图像
    pub fn set_style_image(&mut self, image: Tensor) -> Result<(), TaskError> {
        self.perceptual_loss.set_style_image(&image)?;
        self.style_image = image;
        Ok(())
    }

    /// 训练步骤的完整损失明细（内容项与各风格层）
    pub fn training_losses(&mut self, batch: &Batch) -> Result<LossDict, TaskError> {
        let input_image = batch
            .get(DataKey::Input)
            .ok_or(TaskError::MissingBatchKey(DataKey::Input))?;
        self.perceptual_loss.set_content_image(input_image)?;

        let output_image = self.core.forward(input_image)?;
        Ok(self.perceptual_loss.evaluate(&output_image)?)
    }
}

impl Task for StyleTransfer {
    fn forward(&self, input: &Tensor) -> Result<Tensor, TaskError> {
        self.core.forward(input)
    }

    fn training_step(&mut self, batch: &Batch, batch_idx: usize) -> Result<f32, TaskError> {
        let losses = self.training_losses(batch)?;
        let total = losses.total();
        debug!(batch_idx, total, content = ?losses.get("content_loss"), "训练步骤");
        Ok(total)
    }

    fn validation_step(&mut self, _batch: &Batch, _batch_idx: usize) -> Result<f32, TaskError> {
        Err(TaskError::UnsupportedOperation("validation".to_string()))
    }

    fn test_step(&mut self, _batch: &Batch, _batch_idx: usize) -> Result<f32, TaskError> {
        Err(TaskError::UnsupportedOperation("test".to_string()))
    }

    fn configure_optimizers(&mut self) -> Result<ConfiguredOptimizers, TaskError> {
        self.core.configure_optimizers()
    }
}
