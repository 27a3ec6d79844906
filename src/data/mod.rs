//! 批数据
//!
//! 训练/验证/测试/预测各步骤接收的一批样本，按[`DataKey`]存取。
//!
//! # 使用示例
//!
//! ```ignore
//! use only_style::data::{Batch, DataKey};
//!
//! let batch = Batch::from_input(images);
//! let loss = task.training_step(&batch, 0)?;
//! ```

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tensor::Tensor;

#[cfg(test)]
mod tests;

/// 批数据中各项的键
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataKey {
    Input,
    Target,
    Preds,
    Metadata,
}

impl DataKey {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Target => "target",
            Self::Preds => "preds",
            Self::Metadata => "metadata",
        }
    }
}

impl fmt::Display for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 一批样本：按键存放的张量，以及可选的元数据
#[derive(Debug, Clone, Default)]
pub struct Batch {
    tensors: BTreeMap<DataKey, Tensor>,
    metadata: serde_json::Value,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// 只含输入的批
    pub fn from_input(input: Tensor) -> Self {
        Self::new().with(DataKey::Input, input)
    }

    /// 插入一项（链式调用）
    pub fn with(mut self, key: DataKey, tensor: Tensor) -> Self {
        self.insert(key, tensor);
        self
    }

    /// 插入一项，返回被覆盖的旧值
    pub fn insert(&mut self, key: DataKey, tensor: Tensor) -> Option<Tensor> {
        self.tensors.insert(key, tensor)
    }

    pub fn get(&self, key: DataKey) -> Option<&Tensor> {
        self.tensors.get(&key)
    }

    pub fn contains(&self, key: DataKey) -> bool {
        self.tensors.contains_key(&key)
    }

    pub fn keys(&self) -> impl Iterator<Item = DataKey> + '_ {
        self.tensors.keys().copied()
    }

    pub fn metadata(&self) -> &serde_json::Value {
        &self.metadata
    }

    pub fn set_metadata(&mut self, metadata: serde_json::Value) {
        self.metadata = metadata;
    }

    /// 批大小（取输入张量的首维，无输入时为0）
    pub fn len(&self) -> usize {
        self.get(DataKey::Input)
            .and_then(|t| t.shape().first().copied())
            .unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
