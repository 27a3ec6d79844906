/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 骨干网络注册表：名称 -> 多层编码器工厂
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::vgg::{VggArch, vgg_multi_layer_encoder};
use super::{EncoderError, MultiLayerEncoder, WeightSource};

/// 构建骨干网络时的选项
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BackboneOptions {
    /// 权重来源
    pub weights: WeightSource,
    /// 实际会用到的层；非空时编码器只构建到其中最深的层
    pub required_layers: Vec<String>,
}

impl BackboneOptions {
    pub fn with_weights(mut self, weights: WeightSource) -> Self {
        self.weights = weights;
        self
    }

    pub fn with_required_layers<S: AsRef<str>>(mut self, layers: &[S]) -> Self {
        self.required_layers = layers.iter().map(|l| l.as_ref().to_string()).collect();
        self
    }
}

/// 骨干网络工厂
pub type BackboneFactory =
    Arc<dyn Fn(&BackboneOptions) -> Result<MultiLayerEncoder, EncoderError> + Send + Sync>;

/// 骨干网络注册表
///
/// `default()`已注册`vgg11`、`vgg13`、`vgg16`、`vgg19`及其`_bn`版本
#[derive(Clone)]
pub struct BackboneRegistry {
    factories: BTreeMap<String, BackboneFactory>,
}

impl std::fmt::Debug for BackboneRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackboneRegistry")
            .field("available", &self.available())
            .finish()
    }
}

impl Default for BackboneRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        for arch in [VggArch::Vgg11, VggArch::Vgg13, VggArch::Vgg16, VggArch::Vgg19] {
            for batch_norm in [false, true] {
                let name = if batch_norm {
                    format!("{}_bn", arch.name())
                } else {
                    arch.name().to_string()
                };
                registry.register(&name, move |options| {
                    vgg_multi_layer_encoder(arch, batch_norm, options)
                });
            }
        }
        registry
    }
}

impl BackboneRegistry {
    /// 空注册表
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// 注册（或覆盖）一个骨干网络
    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn(&BackboneOptions) -> Result<MultiLayerEncoder, EncoderError> + Send + Sync + 'static,
    {
        self.factories.insert(name.to_string(), Arc::new(factory));
    }

    /// 按名称构建多层编码器
    pub fn get(
        &self,
        name: &str,
        options: &BackboneOptions,
    ) -> Result<MultiLayerEncoder, EncoderError> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| EncoderError::UnknownBackbone {
                name: name.to_string(),
                available: self.available(),
            })?;
        factory(options)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// 已注册的名称（按字典序）
    pub fn available(&self) -> Vec<String> {
        self.factories.keys().cloned().collect()
    }
}
