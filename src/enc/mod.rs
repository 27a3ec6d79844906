/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 编码器模块：把预训练骨干网络（VGG）包装为可按层名取特征的多层编码器
 */

mod error;
mod multi_layer;
mod preprocessing;
mod registry;
mod vgg;
mod weights;

pub use error::EncoderError;
pub use multi_layer::{MultiLayerEncoder, SingleLayerEncoder};
pub use preprocessing::{IMAGENET_MEAN, IMAGENET_STD, Preprocessing};
pub use registry::{BackboneFactory, BackboneOptions, BackboneRegistry};
pub use vgg::{VggArch, vgg_layer_names, vgg_multi_layer_encoder};
pub use weights::WeightSource;

#[cfg(test)]
mod tests;
