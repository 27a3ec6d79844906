/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 多层编码算子：在多个编码器层上各挂一个比较算子，按层权重合并
 */

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{EncodingComparisonOperator, Operator, Representation};
use crate::enc::{MultiLayerEncoder, SingleLayerEncoder};
use crate::loss::{LossDict, LossError};
use crate::tensor::Tensor;

/// 各层权重的合并方式
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayerWeights {
    /// 每层权重为1（各层分数直接相加）
    #[default]
    Sum,
    /// 每层权重为 1 / 层数
    Mean,
    /// 逐层指定，个数须与层数一致
    Custom(Vec<f32>),
}

impl LayerWeights {
    pub fn resolve(&self, num_layers: usize) -> Result<Vec<f32>, LossError> {
        match self {
            Self::Sum => Ok(vec![1.0; num_layers]),
            Self::Mean => Ok(vec![1.0 / num_layers.max(1) as f32; num_layers]),
            Self::Custom(weights) if weights.len() == num_layers => Ok(weights.clone()),
            Self::Custom(weights) => Err(LossError::LayerWeightsMismatch {
                weights: weights.len(),
                layers: num_layers,
            }),
        }
    }
}

/// 多层编码算子
///
/// 每次求值只对多层编码器做一次前向。分数以层名为键，
/// 值为`score_weight * layer_weight * 该层分数`。
#[derive(Debug)]
pub struct MultiLayerEncodingOperator<R: Representation> {
    multi_layer_encoder: Arc<MultiLayerEncoder>,
    operators: Vec<EncodingComparisonOperator<R>>,
    score_weight: f32,
}

impl<R: Representation> MultiLayerEncodingOperator<R> {
    /// `get_op`接收（单层编码器，层权重），返回该层的比较算子
    pub fn new<S, F>(
        multi_layer_encoder: &Arc<MultiLayerEncoder>,
        layers: &[S],
        get_op: F,
        layer_weights: &LayerWeights,
        score_weight: f32,
    ) -> Result<Self, LossError>
    where
        S: AsRef<str>,
        F: Fn(SingleLayerEncoder, f32) -> EncodingComparisonOperator<R>,
    {
        if layers.is_empty() {
            return Err(LossError::EmptyLayers);
        }
        let weights = layer_weights.resolve(layers.len())?;
        let operators = layers
            .iter()
            .zip(weights)
            .map(|(layer, weight)| -> Result<_, LossError> {
                let encoder = multi_layer_encoder.extract_encoder(layer.as_ref())?;
                Ok(get_op(encoder, weight))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self {
            multi_layer_encoder: Arc::clone(multi_layer_encoder),
            operators,
            score_weight,
        })
    }

    pub fn layers(&self) -> Vec<&str> {
        self.operators.iter().map(|op| op.encoder().layer()).collect()
    }

    pub fn operators(&self) -> &[EncodingComparisonOperator<R>] {
        &self.operators
    }

    pub fn score_weight(&self) -> f32 {
        self.score_weight
    }

    fn encode(&self, image: &Tensor) -> Result<Vec<Tensor>, LossError> {
        Ok(self.multi_layer_encoder.encode(image, &self.layers())?)
    }
}

impl<R: Representation> Operator for MultiLayerEncodingOperator<R> {
    fn evaluate(&self, input_image: &Tensor) -> Result<LossDict, LossError> {
        let encodings = self.encode(input_image)?;
        let mut scores = LossDict::new();
        for (op, encoding) in self.operators.iter().zip(&encodings) {
            let score = op.evaluate_encoding(encoding)?;
            scores.insert(op.encoder().layer(), self.score_weight * score);
        }
        Ok(scores)
    }

    fn set_target_image(&mut self, image: &Tensor) -> Result<(), LossError> {
        let encodings = self.encode(image)?;
        for (op, encoding) in self.operators.iter_mut().zip(&encodings) {
            op.set_target_encoding(encoding)?;
        }
        Ok(())
    }

    fn has_target_image(&self) -> bool {
        self.operators.iter().all(|op| op.has_target_image())
    }
}
