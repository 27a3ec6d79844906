/*
 * @Author       : 老董
 * @Date         : 2025-07-24 16:00:00
 * @LastEditors  : 老董
 * @LastEditTime : 2026-01-27
 * @Description  : 优化器模块，实现 PyTorch 风格的梯度优化算法
 */

mod adam;
mod base;
mod sgd;

pub use adam::Adam;
pub use base::Optimizer;
pub use sgd::SGD;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::NnError;
use crate::utils::json::to_json_value;

/// 选项表（名称 -> 值），如`{"momentum": 0.9}`
pub type ConfigOptions = serde_json::Map<String, serde_json::Value>;

/// 把`options`覆盖到以`name`为标签的配置上；`kind`仅用于报错信息
///
/// 标签`name`不能被选项改写
pub(crate) fn merge_options<T>(config: &T, options: &ConfigOptions, kind: &str) -> Result<T, NnError>
where
    T: Serialize + DeserializeOwned,
{
    let invalid = |e: serde_json::Error| NnError::InvalidConfig(format!("{kind}配置无效：{e}"));
    let mut fields = match to_json_value(config).map_err(invalid)? {
        serde_json::Value::Object(fields) => fields,
        other => {
            return Err(NnError::InvalidConfig(format!(
                "{kind}配置应序列化为对象，实际为{other}"
            )));
        }
    };
    let name = fields.get("name").cloned();
    fields.extend(options.iter().map(|(k, v)| (k.clone(), v.clone())));
    if let Some(name) = name {
        fields.insert("name".to_string(), name);
    }
    serde_json::from_value(serde_json::Value::Object(fields)).map_err(invalid)
}

/// 优化器配置：种类 + 选项，学习率在构建时另行传入
///
/// 序列化形式如`{"name": "adam", "beta1": 0.9}`，未给出的选项取默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "lowercase", deny_unknown_fields)]
pub enum OptimizerConfig {
    Sgd {
        #[serde(default)]
        momentum: f32,
        #[serde(default)]
        weight_decay: f32,
    },
    Adam {
        #[serde(default = "default_beta1")]
        beta1: f32,
        #[serde(default = "default_beta2")]
        beta2: f32,
        #[serde(default = "default_epsilon")]
        epsilon: f32,
        #[serde(default)]
        weight_decay: f32,
    },
}

const fn default_beta1() -> f32 {
    0.9
}

const fn default_beta2() -> f32 {
    0.999
}

const fn default_epsilon() -> f32 {
    1e-8
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        Self::Adam {
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
            weight_decay: 0.0,
        }
    }
}

impl OptimizerConfig {
    /// 按名称（大小写不敏感）与选项构建配置，如`("Adam", {"beta1": 0.5})`
    pub fn from_name(
        name: &str,
        options: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<Self, NnError> {
        let mut value = options.clone();
        value.insert(
            "name".to_string(),
            serde_json::Value::String(name.to_lowercase()),
        );
        serde_json::from_value(serde_json::Value::Object(value))
            .map_err(|e| NnError::InvalidConfig(format!("优化器`{name}`配置无效：{e}")))
    }

    /// 以`options`覆盖当前配置中的同名选项，如`{"weight_decay": 0.5}`
    pub fn with_options(&self, options: &ConfigOptions) -> Result<Self, NnError> {
        merge_options(self, options, "优化器")
    }

    /// 以给定学习率构建优化器实例
    pub fn build(&self, learning_rate: f32) -> Box<dyn Optimizer> {
        match *self {
            Self::Sgd {
                momentum,
                weight_decay,
            } => Box::new(SGD::with_options(learning_rate, momentum, weight_decay)),
            Self::Adam {
                beta1,
                beta2,
                epsilon,
                weight_decay,
            } => Box::new(Adam::with_weight_decay(
                learning_rate,
                beta1,
                beta2,
                epsilon,
                weight_decay,
            )),
        }
    }
}
