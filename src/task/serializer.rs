/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 预测结果的序列化器：把张量转为可落盘/可传输的 JSON 值
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use ndarray::Axis;
use serde_json::{Value, json};

use super::TaskError;
use crate::data::{Batch, DataKey};
use crate::tensor::Tensor;
use crate::vision::write_image;

/// 序列化器 trait
pub trait Serializer: Send + Sync {
    fn serialize(&self, tensor: &Tensor) -> Result<Value, TaskError>;
}

/// 原样记录形状与数据：`{"shape": [...], "data": [...]}`
#[derive(Debug, Default, Clone, Copy)]
pub struct TensorSerializer;

impl Serializer for TensorSerializer {
    fn serialize(&self, tensor: &Tensor) -> Result<Value, TaskError> {
        Ok(json!({
            "shape": tensor.shape(),
            "data": tensor.data_as_slice(),
        }))
    }
}

/// 把`[B, 3, H, W]`张量逐张保存为图像文件，返回文件路径列表
#[derive(Debug)]
pub struct ImageSerializer {
    dir: PathBuf,
    extension: String,
    counter: AtomicUsize,
}

impl ImageSerializer {
    /// 默认保存为 png
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self::with_extension(dir, "png")
    }

    pub fn with_extension<P: Into<PathBuf>>(dir: P, extension: &str) -> Self {
        Self {
            dir: dir.into(),
            extension: extension.trim_start_matches('.').to_string(),
            counter: AtomicUsize::new(0),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// 已写出的图像数
    pub fn count(&self) -> usize {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Serializer for ImageSerializer {
    fn serialize(&self, tensor: &Tensor) -> Result<Value, TaskError> {
        let images: Vec<Tensor> = if tensor.dimension() == 4 {
            tensor
                .view()
                .axis_iter(Axis(0))
                .map(|sample| Tensor::from_array(sample.to_owned()))
                .collect()
        } else {
            vec![tensor.clone()]
        };

        let mut paths = Vec::with_capacity(images.len());
        for image in &images {
            let index = self.counter.fetch_add(1, Ordering::SeqCst);
            let path = self.dir.join(format!("{index:06}.{}", self.extension));
            write_image(image, &path)?;
            paths.push(Value::String(path.display().to_string()));
        }
        Ok(Value::Array(paths))
    }
}

/// 任务的序列化器：单个（作用于预测结果）或按数据键分别指定
pub enum SerializerSpec {
    Single(Box<dyn Serializer>),
    Mapping(BTreeMap<DataKey, Box<dyn Serializer>>),
}

impl SerializerSpec {
    /// 序列化一批数据，结果以数据键为字段名；批中缺失的键被跳过
    pub fn serialize(&self, batch: &Batch) -> Result<Value, TaskError> {
        let mut out = serde_json::Map::new();
        match self {
            Self::Single(serializer) => {
                let preds = batch
                    .get(DataKey::Preds)
                    .ok_or(TaskError::MissingBatchKey(DataKey::Preds))?;
                out.insert(DataKey::Preds.to_string(), serializer.serialize(preds)?);
            }
            Self::Mapping(serializers) => {
                for (key, serializer) in serializers {
                    if let Some(tensor) = batch.get(*key) {
                        out.insert(key.to_string(), serializer.serialize(tensor)?);
                    }
                }
            }
        }
        Ok(Value::Object(out))
    }

    /// 用于超参数记录的描述
    pub fn describe(&self) -> Value {
        match self {
            Self::Single(_) => json!("single"),
            Self::Mapping(serializers) => {
                Value::Array(serializers.keys().map(|k| json!(k.as_str())).collect())
            }
        }
    }
}

impl std::fmt::Debug for SerializerSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "SerializerSpec({})", self.describe())
    }
}
