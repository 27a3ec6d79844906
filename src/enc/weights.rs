/*
 * @Author       : 老董
 * @Date         : 2026-01-27
 * @Description  : 骨干网络权重来源：固定种子的随机权重，或 numpy 的`.npz`存档
 *
 * `.npz`中的键与 PyTorch 的`state_dict`一致，但以层名为前缀：
 * `conv1_1.weight`、`conv1_1.bias`、`bn1_1.running_mean`、`bn1_1.running_var`……
 */

use std::fs::File;
use std::path::{Path, PathBuf};

use ndarray::{ArrayD, IxDyn, OwnedRepr};
use ndarray_npy::NpzReader;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use super::EncoderError;
use crate::tensor::Tensor;

/// 权重来源
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum WeightSource {
    /// 以给定种子随机初始化（Kaiming），同一种子总是得到相同的权重
    Random { seed: u64 },
    /// 从`.npz`存档读取
    Npz { path: PathBuf },
}

impl Default for WeightSource {
    fn default() -> Self {
        Self::Random { seed: 0 }
    }
}

impl WeightSource {
    /// 是否为预训练权重；随机权重只适合测试，提取的特征没有感知意义
    pub const fn is_pretrained(&self) -> bool {
        matches!(self, Self::Npz { .. })
    }
}

/// 构建骨干网络时的权重提供者
pub(crate) enum WeightProvider {
    Random(StdRng),
    Npz(NpzReader<File>),
}

impl WeightProvider {
    pub(crate) fn open(source: &WeightSource) -> Result<Self, EncoderError> {
        Ok(match source {
            WeightSource::Random { seed } => Self::Random(StdRng::seed_from_u64(*seed)),
            WeightSource::Npz { path } => Self::Npz(open_npz(path)?),
        })
    }

    /// 读取名为`key`的数组，形状须为`shape`
    pub(crate) fn read(
        reader: &mut NpzReader<File>,
        key: &str,
        shape: &[usize],
    ) -> Result<Tensor, EncoderError> {
        // numpy.savez 会为每个数组加上`.npy`后缀
        let array: ArrayD<f32> = match reader.by_name::<OwnedRepr<f32>, IxDyn>(&format!("{key}.npy")) {
            Ok(array) => array,
            Err(_) => reader
                .by_name::<OwnedRepr<f32>, IxDyn>(key)
                .map_err(|e| EncoderError::Weights {
                    key: key.to_string(),
                    message: e.to_string(),
                })?,
        };
        if array.shape() != shape {
            return Err(EncoderError::Weights {
                key: key.to_string(),
                message: format!("形状应为{shape:?}，实际为{:?}", array.shape()),
            });
        }
        Ok(Tensor::from_array(array.as_standard_layout().to_owned()))
    }
}

fn open_npz(path: &Path) -> Result<NpzReader<File>, EncoderError> {
    let file = File::open(path)?;
    NpzReader::new(file).map_err(|e| EncoderError::Weights {
        key: path.display().to_string(),
        message: e.to_string(),
    })
}
