use crate::nn::functional;
use crate::nn::{Module, NnError};
use crate::tensor::Tensor;

/// 最近邻上采样层
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Upsample {
    scale_factor: usize,
}

impl Upsample {
    pub fn new(scale_factor: usize) -> Self {
        Self { scale_factor }
    }
}

impl Module for Upsample {
    fn forward(&self, input: &Tensor) -> Result<Tensor, NnError> {
        functional::upsample_nearest(input, self.scale_factor)
    }

    fn parameters(&self) -> Vec<&Tensor> {
        vec![]
    }

    fn parameters_mut(&mut self) -> Vec<&mut Tensor> {
        vec![]
    }
}
