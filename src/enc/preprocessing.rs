use crate::nn::functional;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// ImageNet 数据集的按通道均值与标准差（torchvision 预训练模型的输入约定）
pub const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
pub const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// 预处理层：将[0, 1]区间的 RGB 图像按通道标准化
#[derive(Debug, Clone, PartialEq)]
pub struct Preprocessing {
    mean: Vec<f32>,
    std: Vec<f32>,
}

impl Preprocessing {
    pub fn new(mean: &[f32], std: &[f32]) -> Self {
        Self {
            mean: mean.to_vec(),
            std: std.to_vec(),
        }
    }

    pub fn imagenet() -> Self {
        Self::new(&IMAGENET_MEAN, &IMAGENET_STD)
    }
}

impl Module for Preprocessing {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        functional::normalize_channels(input, &self.mean, &self.std)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}
