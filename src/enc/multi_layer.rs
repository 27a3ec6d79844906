/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 多层编码器：按顺序串联的具名层，一次前向即可取出多个中间层的特征
 */

use std::sync::Arc;

use super::EncoderError;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// 多层编码器
///
/// 由有序的具名层组成（如`preprocessing`、`conv1_1`、`relu1_1`……），构建后不可变，
/// 经`Arc`在内容损失与风格损失之间共享。
pub struct MultiLayerEncoder {
    layers: Vec<(String, Box<dyn Module>)>,
}

impl std::fmt::Debug for MultiLayerEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MultiLayerEncoder")
            .field("layers", &self.layers().collect::<Vec<_>>())
            .finish()
    }
}

impl MultiLayerEncoder {
    /// 由有序的（层名，模块）构建，层名不可重复
    pub fn new(layers: Vec<(String, Box<dyn Module>)>) -> Result<Self, EncoderError> {
        for (index, (name, _)) in layers.iter().enumerate() {
            if layers[..index].iter().any(|(other, _)| other == name) {
                return Err(EncoderError::DuplicateLayer(name.clone()));
            }
        }
        Ok(Self { layers })
    }

    /// 按顺序列出所有层名
    pub fn layers(&self) -> impl Iterator<Item = &str> {
        self.layers.iter().map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn contains(&self, layer: &str) -> bool {
        self.layers.iter().any(|(name, _)| name == layer)
    }

    /// 层在编码器中的位置
    pub fn position(&self, layer: &str) -> Result<usize, EncoderError> {
        self.layers
            .iter()
            .position(|(name, _)| name == layer)
            .ok_or_else(|| EncoderError::UnknownLayer {
                layer: layer.to_string(),
            })
    }

    /// 一次前向得到多个层的特征，返回顺序与`layers`一致；
    /// 只计算到所需的最深层为止
    pub fn encode(&self, input: &Tensor, layers: &[&str]) -> Result<Vec<Tensor>, EncoderError> {
        let positions = layers
            .iter()
            .map(|layer| self.position(layer))
            .collect::<Result<Vec<_>, _>>()?;
        let Some(&deepest) = positions.iter().max() else {
            return Ok(Vec::new());
        };

        let mut encodings: Vec<Option<Tensor>> = vec![None; layers.len()];
        let mut current = input.clone();
        for (index, (_, module)) in self.layers[..=deepest].iter().enumerate() {
            current = module.forward(&current)?;
            for (slot, _) in positions.iter().enumerate().filter(|(_, p)| **p == index) {
                encodings[slot] = Some(current.clone());
            }
        }
        Ok(encodings.into_iter().flatten().collect())
    }

    /// 前向至指定层并返回其特征
    pub fn encode_layer(&self, input: &Tensor, layer: &str) -> Result<Tensor, EncoderError> {
        let mut encodings = self.encode(input, &[layer])?;
        encodings.pop().ok_or_else(|| EncoderError::UnknownLayer {
            layer: layer.to_string(),
        })
    }

    /// 取出绑定到单个层的编码器（共享同一个多层编码器）
    pub fn extract_encoder(
        self: &Arc<Self>,
        layer: &str,
    ) -> Result<SingleLayerEncoder, EncoderError> {
        self.position(layer)?;
        Ok(SingleLayerEncoder {
            multi_layer_encoder: Arc::clone(self),
            layer: layer.to_string(),
        })
    }

    /// 丢弃所需最深层之后的所有层；`layers`为空时保持不变
    pub fn trim(&mut self, layers: &[&str]) -> Result<(), EncoderError> {
        let deepest = layers
            .iter()
            .map(|layer| self.position(layer))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter()
            .max();
        if let Some(deepest) = deepest {
            self.layers.truncate(deepest + 1);
        }
        Ok(())
    }
}

impl Module for MultiLayerEncoder {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        let mut current = input.clone();
        for (_, module) in &self.layers {
            current = module.forward(&current)?;
        }
        Ok(current)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        self.layers.iter().flat_map(|(_, m)| m.parameters()).collect()
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        self.layers
            .iter_mut()
            .flat_map(|(_, m)| m.parameters_mut())
            .collect()
    }
}

/// 单层编码器：多层编码器 + 一个层名
#[derive(Debug, Clone)]
pub struct SingleLayerEncoder {
    multi_layer_encoder: Arc<MultiLayerEncoder>,
    layer: String,
}

impl SingleLayerEncoder {
    pub fn encode(&self, input: &Tensor) -> Result<Tensor, EncoderError> {
        self.multi_layer_encoder.encode_layer(input, &self.layer)
    }

    pub fn layer(&self) -> &str {
        &self.layer
    }

    pub fn multi_layer_encoder(&self) -> &Arc<MultiLayerEncoder> {
        &self.multi_layer_encoder
    }
}
