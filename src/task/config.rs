/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 风格迁移任务的可序列化配置（JSON）
 */

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::TaskError;
use crate::enc::WeightSource;
use crate::nn::{OptimizerConfig, SchedulerConfig};

/// 风格迁移任务的标量超参数与优化器/调度器配置
///
/// 所有字段都有默认值，JSON 中只需写出要改动的项：
/// ```ignore
/// let config = StyleTransferConfig::from_json_str(r#"{"style_weight": 1e9}"#)?;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleTransferConfig {
    pub backbone: String,
    pub backbone_weights: WeightSource,
    pub content_layer: String,
    pub content_weight: f32,
    pub style_layers: Vec<String>,
    pub style_weight: f32,
    pub optimizer: OptimizerConfig,
    pub scheduler: Option<SchedulerConfig>,
    pub learning_rate: f32,
    /// 默认风格图像的短边长度
    pub style_image_size: u32,
    /// 默认风格图像未缓存时的下载地址
    pub style_image_url: Option<String>,
    /// 下载内容的 MD5
    pub style_image_md5: Option<String>,
    /// 默认模型的初始化种子
    pub seed: u64,
}

impl Default for StyleTransferConfig {
    fn default() -> Self {
        Self {
            backbone: "vgg16".to_string(),
            backbone_weights: WeightSource::default(),
            content_layer: "relu2_2".to_string(),
            content_weight: 1e5,
            style_layers: ["relu1_2", "relu2_2", "relu3_3", "relu4_3"]
                .iter()
                .map(|l| l.to_string())
                .collect(),
            style_weight: 1e10,
            optimizer: OptimizerConfig::default(),
            scheduler: None,
            learning_rate: 1e-3,
            style_image_size: 256,
            style_image_url: None,
            style_image_md5: None,
            seed: 0,
        }
    }
}

impl StyleTransferConfig {
    pub fn from_json_str(json: &str) -> Result<Self, TaskError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, TaskError> {
        let file = std::fs::File::open(path)?;
        Ok(serde_json::from_reader(std::io::BufReader::new(file))?)
    }

    pub fn to_json(&self) -> Result<String, TaskError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
